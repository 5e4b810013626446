use serde::{Deserialize, Serialize};

/// Identity of a view entry: a collection namespace plus a key within it.
///
/// Collections are purely a prefix partitioning keys; they carry no
/// behavior of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewKey {
    pub collection: String,
    pub key: String,
}

impl ViewKey {
    /// Creates a view key for `key` within `collection`.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ViewKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.collection, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_key_display() {
        let key = ViewKey::new("data", "1");
        assert_eq!(key.to_string(), "data:1");
    }

    #[test]
    fn view_key_equality_and_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(ViewKey::new("data", "1"), 1);
        assert_eq!(map.get(&ViewKey::new("data", "1")), Some(&1));
        assert_eq!(map.get(&ViewKey::new("other", "1")), None);
    }
}
