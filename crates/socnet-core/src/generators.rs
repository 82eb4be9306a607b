//! Seeded random-graph generators.
//!
//! Synthetic social graphs for tests, benchmarks and sanity checks. Every
//! generator takes an explicit seed and is deterministic for a given seed.
//! Node ids are zero-padded decimal indices (`"007"` for node 7 of 100), so
//! id order equals generation order.
//!
//! | Model | Shape | Parameters |
//! |-------|-------|------------|
//! | [`erdos_renyi`] | Uniform random edges | `n`, edge probability `p` |
//! | [`barabasi_albert`] | Scale-free, hub-dominated | `n`, edges per new node `m` |
//! | [`watts_strogatz`] | Small world, high clustering | `n`, ring degree `k`, rewiring `beta` |
//!
//! All generated graphs are undirected and unweighted.
//!
//! # References
//!
//! - Erdős & Rényi (1959). "On random graphs I"
//! - Barabási & Albert (1999). "Emergence of scaling in random networks"
//! - Watts & Strogatz (1998). "Collective dynamics of 'small-world' networks"

use crate::error::{Error, Result};
use crate::{Edge, Graph, Node};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::BTreeSet;

fn node_ids(n: usize) -> Vec<String> {
    let width = n.saturating_sub(1).to_string().len();
    (0..n).map(|i| format!("{i:0width$}")).collect()
}

fn assemble(n: usize, edges: &BTreeSet<(usize, usize)>) -> Result<Graph> {
    let ids = node_ids(n);
    let nodes = ids.iter().map(|id| Node::new(id.as_str())).collect();
    let edges = edges
        .iter()
        .map(|&(a, b)| Edge::new(ids[a].as_str(), ids[b].as_str()))
        .collect();
    Ok(Graph::build(nodes, edges, false)?)
}

fn check_probability(name: &'static str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::invalid(name, format!("must be within [0, 1], got {p}")))
    }
}

/// G(n, p): each of the `n(n-1)/2` pairs is an edge with probability `p`.
///
/// ```rust
/// use socnet_core::generators::erdos_renyi;
///
/// let g = erdos_renyi(10, 1.0, 7).unwrap();
/// assert_eq!(g.edge_count(), 45);
/// ```
pub fn erdos_renyi(n: usize, p: f64, seed: u64) -> Result<Graph> {
    check_probability("p", p)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = BTreeSet::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.random::<f64>() < p {
                edges.insert((i, j));
            }
        }
    }
    assemble(n, &edges)
}

/// Preferential attachment.
///
/// Starts from a complete graph on `m + 1` nodes; every later node links to
/// `m` distinct existing nodes chosen with probability proportional to degree.
/// Requires `1 <= m < n`.
pub fn barabasi_albert(n: usize, m: usize, seed: u64) -> Result<Graph> {
    if m == 0 || m >= n {
        return Err(Error::invalid("m", format!("must satisfy 1 <= m < n (m = {m}, n = {n})")));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = BTreeSet::new();
    // each endpoint appears once per incident edge
    let mut endpoints: Vec<usize> = Vec::with_capacity(2 * n * m);

    for i in 0..=m {
        for j in (i + 1)..=m {
            edges.insert((i, j));
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    let mut targets = BTreeSet::new();
    for new in (m + 1)..n {
        targets.clear();
        while targets.len() < m {
            targets.insert(endpoints[rng.random_range(0..endpoints.len())]);
        }
        for &t in &targets {
            edges.insert((t, new));
            endpoints.push(t);
            endpoints.push(new);
        }
    }
    assemble(n, &edges)
}

/// Small-world ring.
///
/// Each node starts linked to its `k / 2` nearest neighbours on each side of
/// a ring; each such edge is then rewired with probability `beta` to a
/// uniformly chosen node that is neither itself nor already a neighbour.
/// Requires even `k` with `k < n`.
pub fn watts_strogatz(n: usize, k: usize, beta: f64, seed: u64) -> Result<Graph> {
    if k % 2 != 0 || k >= n {
        return Err(Error::invalid("k", format!("must be even and below n (k = {k}, n = {n})")));
    }
    check_probability("beta", beta)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let ordered = |a: usize, b: usize| if a < b { (a, b) } else { (b, a) };
    let mut edges = BTreeSet::new();
    for i in 0..n {
        for step in 1..=(k / 2) {
            edges.insert(ordered(i, (i + step) % n));
        }
    }

    for step in 1..=(k / 2) {
        for i in 0..n {
            let old = ordered(i, (i + step) % n);
            if !edges.contains(&old) || rng.random::<f64>() >= beta {
                continue;
            }
            let degree = edges.iter().filter(|&&(a, b)| a == i || b == i).count();
            if degree >= n - 1 {
                continue;
            }
            let target = loop {
                let t = rng.random_range(0..n);
                if t != i && !edges.contains(&ordered(i, t)) {
                    break t;
                }
            };
            edges.remove(&old);
            edges.insert(ordered(i, target));
        }
    }
    assemble(n, &edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[test]
    fn test_ids_are_padded() {
        let g = erdos_renyi(12, 0.0, 1).unwrap();
        let ids: Vec<&str> = g.node_ids().map(NodeId::as_str).collect();
        assert_eq!(ids.first(), Some(&"00"));
        assert_eq!(ids.last(), Some(&"11"));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_same_seed_same_graph() {
        assert_eq!(erdos_renyi(30, 0.2, 42).unwrap(), erdos_renyi(30, 0.2, 42).unwrap());
        assert_eq!(barabasi_albert(40, 2, 42).unwrap(), barabasi_albert(40, 2, 42).unwrap());
        assert_eq!(
            watts_strogatz(30, 4, 0.3, 42).unwrap(),
            watts_strogatz(30, 4, 0.3, 42).unwrap()
        );
    }

    #[test]
    fn test_barabasi_albert_edge_count() {
        let (n, m) = (50, 3);
        let g = barabasi_albert(n, m, 9).unwrap();
        assert_eq!(g.node_count(), n);
        assert_eq!(g.edge_count(), m * (m + 1) / 2 + (n - m - 1) * m);
    }

    #[test]
    fn test_watts_strogatz_preserves_edge_count() {
        let lattice = watts_strogatz(20, 4, 0.0, 3).unwrap();
        assert_eq!(lattice.edge_count(), 40);
        assert!(lattice.node_indices().all(|i| lattice.degree(i) == 4));

        let rewired = watts_strogatz(20, 4, 0.5, 3).unwrap();
        assert_eq!(rewired.edge_count(), 40);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(erdos_renyi(5, 1.5, 0).is_err());
        assert!(barabasi_albert(5, 0, 0).is_err());
        assert!(barabasi_albert(5, 5, 0).is_err());
        assert!(watts_strogatz(10, 3, 0.1, 0).is_err());
        assert!(watts_strogatz(4, 4, 0.1, 0).is_err());
        assert!(watts_strogatz(10, 2, -0.1, 0).is_err());
    }
}
