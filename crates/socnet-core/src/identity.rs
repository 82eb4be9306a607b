//! Stable, anonymized node identity.
//!
//! Snapshots of the same network are compared by node id, so the mapping from
//! a raw external identifier to a node id must be a pure function of that
//! identifier. [`assign_id`] is the lowercase hex SHA-256 digest of the raw
//! id. The digest is one-way: the raw identifier is never stored.
//!
//! A deployment may add a salt ([`Anonymizer::with_salt`]) so ids cannot be
//! recomputed from a guessed raw identifier without it. Salted ids are still
//! deterministic, but only comparable with snapshots ingested under the
//! same salt.

use crate::NodeId;
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash a raw external identifier into a stable node id.
///
/// ```rust
/// use socnet_core::identity::assign_id;
///
/// let a = assign_id("user-42");
/// assert_eq!(a, assign_id("user-42"));
/// assert_ne!(a, assign_id("user-43"));
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[must_use]
pub fn assign_id(raw: &str) -> NodeId {
    Anonymizer::default().assign_id(raw)
}

/// Deterministic one-way id assignment, optionally salted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anonymizer {
    salt: Option<String>,
}

impl Anonymizer {
    /// Unsalted anonymizer (plain SHA-256 of the raw id).
    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymizer that prefixes every raw id with `salt` before hashing.
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: Some(salt.into()),
        }
    }

    /// Whether a salt is configured.
    pub fn is_salted(&self) -> bool {
        self.salt.is_some()
    }

    /// Map a raw external identifier to its stable id.
    #[must_use]
    pub fn assign_id(&self, raw: &str) -> NodeId {
        let mut hasher = Sha256::new();
        if let Some(salt) = &self.salt {
            hasher.update(salt.as_bytes());
            // Separator keeps ("ab", "c") and ("a", "bc") apart.
            hasher.update([0u8]);
        }
        hasher.update(raw.as_bytes());
        NodeId(hex::encode(hasher.finalize()))
    }
}

/// Default display label for an anonymized node: `"User "` plus the first
/// eight hex characters of its id.
pub fn anonymous_label(id: &NodeId) -> String {
    let prefix: String = id.as_str().chars().take(8).collect();
    format!("User {prefix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        assert_eq!(
            assign_id("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic_across_instances() {
        let a = Anonymizer::new().assign_id("alice@example.com");
        let b = Anonymizer::new().assign_id("alice@example.com");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), DIGEST_HEX_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_salt_changes_ids_but_stays_deterministic() {
        let salted = Anonymizer::with_salt("tenant-7");
        assert!(salted.is_salted());
        assert_ne!(salted.assign_id("bob"), assign_id("bob"));
        assert_eq!(salted.assign_id("bob"), Anonymizer::with_salt("tenant-7").assign_id("bob"));
    }

    #[test]
    fn test_salt_separator() {
        let a = Anonymizer::with_salt("ab").assign_id("c");
        let b = Anonymizer::with_salt("a").assign_id("bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_anonymous_label() {
        let id = assign_id("abc");
        assert_eq!(anonymous_label(&id), "User ba7816bf");
    }
}
