use std::collections::HashMap;

use common::ViewKey;

/// A pending mutation for one view entry.
///
/// Merges are resolved eagerly against the current effective value, so a
/// merged key also carries a `Put` by the time it reaches the scope.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingOp {
    /// Store this value at commit.
    Put(serde_json::Value),
    /// Remove the entry at commit.
    Delete,
}

/// Per-event write buffer.
///
/// At most one pending operation per key; recording a second operation
/// for a key replaces the first. Commit order is the order keys were
/// first touched.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    order: Vec<ViewKey>,
    ops: HashMap<ViewKey, PendingOp>,
}

impl Scope {
    pub(crate) fn record(&mut self, key: ViewKey, op: PendingOp) {
        if !self.ops.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.ops.insert(key, op);
    }

    pub(crate) fn get(&self, key: &ViewKey) -> Option<&PendingOp> {
        self.ops.get(key)
    }

    /// Pending operations in first-touch order.
    pub(crate) fn ops(&self) -> impl Iterator<Item = (&ViewKey, &PendingOp)> {
        self.order
            .iter()
            .filter_map(|key| self.ops.get(key).map(|op| (key, op)))
    }

    /// Consumes the scope, yielding operations in first-touch order.
    pub(crate) fn into_ops(self) -> impl Iterator<Item = (ViewKey, PendingOp)> {
        let Scope { order, mut ops } = self;
        order
            .into_iter()
            .filter_map(move |key| ops.remove(&key).map(|op| (key, op)))
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_record_replaces_but_keeps_first_touch_order() {
        let mut scope = Scope::default();
        scope.record(ViewKey::new("data", "1"), PendingOp::Put(serde_json::json!(1)));
        scope.record(ViewKey::new("data", "2"), PendingOp::Put(serde_json::json!(2)));
        scope.record(ViewKey::new("data", "1"), PendingOp::Delete);

        let ops: Vec<_> = scope.into_ops().collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].0, ViewKey::new("data", "1"));
        assert_eq!(ops[0].1, PendingOp::Delete);
        assert_eq!(ops[1].0, ViewKey::new("data", "2"));
    }

    #[test]
    fn get_returns_latest_op() {
        let mut scope = Scope::default();
        let key = ViewKey::new("data", "1");
        scope.record(key.clone(), PendingOp::Put(serde_json::json!(1)));
        scope.record(key.clone(), PendingOp::Put(serde_json::json!(2)));

        assert_eq!(scope.get(&key), Some(&PendingOp::Put(serde_json::json!(2))));
        assert_eq!(scope.len(), 1);
    }
}
