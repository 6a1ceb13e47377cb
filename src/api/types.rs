//! Data types exchanged with a suggestion source.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A selectable tag.
///
/// Identity is carried entirely by `id`: two tags with the same id compare
/// equal even if their display names differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Stable unique identifier.
    pub id: u64,
    /// Display label.
    pub name: String,
}

impl Tag {
    /// Create a new tag.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tag_equality_by_id() {
        let a = Tag::new(1, "Electronics");
        let b = Tag::new(1, "Renamed");
        let c = Tag::new(2, "Electronics");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_tag_hash_by_id() {
        let mut set = HashSet::new();
        set.insert(Tag::new(1, "Electronics"));
        set.insert(Tag::new(1, "Electronics (dup)"));
        set.insert(Tag::new(2, "Home Goods"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_tag_serialization() {
        let tag = Tag::new(3, "Apparel");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"id":3,"name":"Apparel"}"#);

        let parsed: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Apparel");
    }
}
