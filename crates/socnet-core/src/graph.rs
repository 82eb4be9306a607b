use crate::{Edge, EdgeKey, GraphError, Node, NodeId};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// An immutable social-graph snapshot.
///
/// Stored in petgraph's directed graph. Undirected graphs keep one stored edge
/// per pair (oriented by [`EdgeKey`]) and are traversed in both directions.
///
/// Nodes are kept sorted by [`NodeId`], so `NodeIndex::new(i)` is the i-th
/// smallest id. Every deterministic algorithm in this crate visits nodes in
/// index order, which makes results independent of input order.
///
/// # Example
///
/// ```rust
/// use socnet_core::{Edge, Graph, Node};
///
/// let graph = Graph::build(
///     vec![Node::new("A"), Node::new("B"), Node::new("C")],
///     vec![Edge::new("A", "B"), Edge::new("B", "C")],
///     false,
/// )
/// .unwrap();
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert!(graph.contains_edge(&"C".into(), &"B".into()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    directed: bool,

    /// Nodes, sorted by id. Position == petgraph node index.
    nodes: Vec<Node>,

    /// Edges, sorted by key.
    edges: Vec<Edge>,

    /// Map from node id to node index.
    index: HashMap<NodeId, NodeIndex>,

    /// Map from edge key to position in `edges`.
    edge_index: HashMap<EdgeKey, usize>,

    /// The underlying directed graph (node weight = id, edge weight = weight).
    graph: DiGraph<NodeId, f64>,

    /// Undirected view: sorted, de-duplicated neighbors per node.
    neighbors: Vec<Vec<NodeIndex>>,

    /// Directed graphs only: sorted successors / predecessors.
    successors: Vec<Vec<NodeIndex>>,
    predecessors: Vec<Vec<NodeIndex>>,
}

/// Plain wire form of a [`Graph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphData {
    /// Whether edges are directed.
    #[serde(default)]
    pub directed: bool,
    /// Node records.
    pub nodes: Vec<Node>,
    /// Edge records.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        Graph::build(data.nodes, data.edges, data.directed)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        Self {
            directed: graph.directed,
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.directed == other.directed && self.nodes == other.nodes && self.edges == other.edges
    }
}

impl Graph {
    /// Build a graph, validating every invariant up front.
    ///
    /// Fails atomically: on any error nothing is returned.
    ///
    /// - `DuplicateNodeId` if two nodes share an id
    /// - `DanglingEdge` if an edge endpoint is not a node
    /// - `SelfLoop` if source equals target
    /// - `NegativeWeight` if the weight is not a finite positive number
    ///
    /// An edge listed twice (in either orientation, for undirected graphs)
    /// is one logical edge; the last weight wins.
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>, directed: bool) -> Result<Self, GraphError> {
        let mut seen: HashSet<&NodeId> = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(&node.id) {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut weights: BTreeMap<EdgeKey, f64> = BTreeMap::new();
        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if edge.source == edge.target {
                return Err(GraphError::SelfLoop(edge.source.clone()));
            }
            if !(edge.weight.is_finite() && edge.weight > 0.0) {
                return Err(GraphError::NegativeWeight {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    weight: edge.weight,
                });
            }
            weights.insert(edge.key(directed), edge.weight);
        }
        drop(seen);

        let mut nodes = nodes;
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut graph = DiGraph::with_capacity(nodes.len(), weights.len());
        let mut index = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            let idx = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), idx);
        }

        let mut stored = Vec::with_capacity(weights.len());
        let mut edge_index = HashMap::with_capacity(weights.len());
        for (key, weight) in weights {
            let (s, t) = (index[&key.source], index[&key.target]);
            graph.add_edge(s, t, weight);
            edge_index.insert(key.clone(), stored.len());
            stored.push(Edge {
                source: key.source,
                target: key.target,
                weight,
            });
        }

        let n = nodes.len();
        let mut neighbors: Vec<BTreeSet<NodeIndex>> = vec![BTreeSet::new(); n];
        let mut successors: Vec<Vec<NodeIndex>> =
            if directed { vec![Vec::new(); n] } else { Vec::new() };
        let mut predecessors: Vec<Vec<NodeIndex>> =
            if directed { vec![Vec::new(); n] } else { Vec::new() };
        for edge in &stored {
            let (s, t) = (index[&edge.source], index[&edge.target]);
            neighbors[s.index()].insert(t);
            neighbors[t.index()].insert(s);
            if directed {
                successors[s.index()].push(t);
                predecessors[t.index()].push(s);
            }
        }
        for list in successors.iter_mut().chain(predecessors.iter_mut()) {
            list.sort_unstable();
        }

        Ok(Self {
            directed,
            nodes,
            edges: stored,
            index,
            edge_index,
            graph,
            neighbors: neighbors.into_iter().map(|s| s.into_iter().collect()).collect(),
            successors,
            predecessors,
        })
    }

    /// An empty graph.
    pub fn empty(directed: bool) -> Self {
        Self::build(Vec::new(), Vec::new(), directed)
            .unwrap_or_else(|_| unreachable!("an empty graph has nothing to reject"))
    }

    /// Build a graph from id pairs; nodes are the union of endpoints.
    ///
    /// Convenient for tests and examples.
    pub fn from_pairs(pairs: &[(&str, &str)], directed: bool) -> Result<Self, GraphError> {
        let ids: BTreeSet<&str> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        let nodes = ids.into_iter().map(Node::new).collect();
        let edges = pairs.iter().map(|&(a, b)| Edge::new(a, b)).collect();
        Self::build(nodes, edges, directed)
    }

    /// Whether edges are directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of logical edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, sorted by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, sorted by key.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node ids in index order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter().map(|n| &n.id)
    }

    /// Edge keys in sorted order.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.iter().map(|e| e.key(self.directed))
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx.index()])
    }

    /// Node index for an id.
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Id of the node at an index.
    pub fn id_of(&self, idx: NodeIndex) -> &NodeId {
        &self.nodes[idx.index()].id
    }

    /// Whether the node exists.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Whether the edge exists (orientation ignored for undirected graphs).
    pub fn contains_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.edge_weight(source, target).is_some()
    }

    /// Weight of an edge, if present.
    pub fn edge_weight(&self, source: &NodeId, target: &NodeId) -> Option<f64> {
        let key = EdgeKey::new(source.clone(), target.clone(), self.directed);
        self.edge_index.get(&key).map(|&i| self.edges[i].weight)
    }

    /// Neighbors in the undirected view, sorted by index.
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.neighbors[idx.index()]
    }

    /// Nodes reachable in one step following edge direction.
    pub fn out_neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        if self.directed {
            &self.successors[idx.index()]
        } else {
            &self.neighbors[idx.index()]
        }
    }

    /// Nodes with an edge into `idx`.
    pub fn in_neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        if self.directed {
            &self.predecessors[idx.index()]
        } else {
            &self.neighbors[idx.index()]
        }
    }

    /// Whether two nodes are adjacent in the undirected view.
    pub fn are_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.neighbors[a.index()].binary_search(&b).is_ok()
    }

    /// Number of incident edges (in + out for directed graphs).
    pub fn degree(&self, idx: NodeIndex) -> usize {
        if self.directed {
            self.successors[idx.index()].len() + self.predecessors[idx.index()].len()
        } else {
            self.neighbors[idx.index()].len()
        }
    }

    /// Node indices in canonical order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + ExactSizeIterator {
        (0..self.nodes.len()).map(NodeIndex::new)
    }

    /// The underlying petgraph graph.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, f64> {
        &self.graph
    }
}

/// Incremental construction helper; validation happens in [`GraphBuilder::build`].
///
/// ```rust
/// use socnet_core::GraphBuilder;
///
/// let graph = GraphBuilder::undirected()
///     .node("A")
///     .node("B")
///     .weighted_edge("A", "B", 2.0)
///     .build()
///     .unwrap();
/// assert_eq!(graph.edge_weight(&"B".into(), &"A".into()), Some(2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    directed: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Builder for an undirected graph.
    pub fn undirected() -> Self {
        Self::default()
    }

    /// Builder for a directed graph.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    /// Add a node whose label is its id.
    pub fn node(self, id: impl Into<NodeId>) -> Self {
        self.add_node(Node::new(id))
    }

    /// Add a fully specified node.
    pub fn add_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a weight-1 edge.
    pub fn edge(self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        self.add_edge(Edge::new(source, target))
    }

    /// Add a weighted edge.
    pub fn weighted_edge(
        self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        weight: f64,
    ) -> Self {
        self.add_edge(Edge::new(source, target).with_weight(weight))
    }

    /// Add a fully specified edge.
    pub fn add_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Graph, GraphError> {
        Graph::build(self.nodes, self.edges, self.directed)
    }
}
