//! Context data carried alongside the current state.
//!
//! Actions never mutate context in place. They return a patch which the
//! runtime shallow-merges into a running snapshot: top-level fields present
//! in the patch overwrite the snapshot, everything else is kept.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// Auxiliary data carried by a machine and updated through patches.
///
/// # Example
///
/// ```rust
/// use machina::core::Context;
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Counter {
///     count: u32,
///     label: String,
/// }
///
/// #[derive(Default)]
/// struct CounterPatch {
///     count: Option<u32>,
///     label: Option<String>,
/// }
///
/// impl Context for Counter {
///     type Patch = CounterPatch;
///
///     fn merge(&mut self, patch: CounterPatch) {
///         if let Some(count) = patch.count {
///             self.count = count;
///         }
///         if let Some(label) = patch.label {
///             self.label = label;
///         }
///     }
/// }
///
/// let mut ctx = Counter { count: 1, label: "clicks".into() };
/// ctx.merge(CounterPatch { count: Some(2), ..Default::default() });
/// assert_eq!(ctx, Counter { count: 2, label: "clicks".into() });
/// ```
pub trait Context: Clone + Debug + Default + Send + Sync {
    /// Partial update produced by an action.
    type Patch;

    /// Shallow-merge `patch` into `self`.
    fn merge(&mut self, patch: Self::Patch);
}

impl Context for () {
    type Patch = ();

    fn merge(&mut self, _patch: ()) {}
}

impl<K, V> Context for HashMap<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Debug + Send + Sync,
{
    type Patch = HashMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

impl<K, V> Context for BTreeMap<K, V>
where
    K: Ord + Clone + Debug + Send + Sync,
    V: Clone + Debug + Send + Sync,
{
    type Patch = BTreeMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

/// Untyped JSON object context, merged key by key.
impl Context for serde_json::Map<String, serde_json::Value> {
    type Patch = serde_json::Map<String, serde_json::Value>;

    fn merge(&mut self, patch: Self::Patch) {
        for (key, value) in patch {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn json_merge_keeps_sibling_keys() {
        let mut ctx = object(json!({ "a": 1, "b": 2 }));
        ctx.merge(object(json!({ "b": 3, "c": 4 })));

        assert_eq!(Value::Object(ctx), json!({ "a": 1, "b": 3, "c": 4 }));
    }

    #[test]
    fn json_merge_is_shallow() {
        let mut ctx = object(json!({ "user": { "name": "ada", "age": 36 } }));
        ctx.merge(object(json!({ "user": { "name": "grace" } })));

        assert_eq!(Value::Object(ctx), json!({ "user": { "name": "grace" } }));
    }

    #[test]
    fn map_merge_overwrites_and_extends() {
        let mut ctx: HashMap<&str, i32> = HashMap::from([("x", 1), ("y", 2)]);
        ctx.merge(HashMap::from([("x", 10), ("z", 3)]));

        assert_eq!(ctx.get("x"), Some(&10));
        assert_eq!(ctx.get("y"), Some(&2));
        assert_eq!(ctx.get("z"), Some(&3));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut ctx: BTreeMap<String, u8> = BTreeMap::from([("k".to_string(), 7)]);
        let before = ctx.clone();
        ctx.merge(BTreeMap::new());

        assert_eq!(ctx, before);
    }
}
