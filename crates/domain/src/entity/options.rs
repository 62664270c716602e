//! Per-namespace extension options attached to an entity.
//!
//! Several independent consumers share the same mapping, each under its own
//! namespace key. This crate only ever reads or writes [`SNAPSHOT_NAMESPACE`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Namespace key owned by the snapshot integration.
pub const SNAPSHOT_NAMESPACE: &str = "ha_snapshot";

/// Key holding the label list inside [`SNAPSHOT_NAMESPACE`].
pub const LABELS_KEY: &str = "labels";

/// Open-ended `namespace → options` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityOptions(BTreeMap<String, Value>);

impl EntityOptions {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the options object stored under `namespace`.
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&Map<String, Value>> {
        self.0.get(namespace).and_then(Value::as_object)
    }

    /// Replace the whole value of one namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>, options: Value) -> Self {
        self.0.insert(namespace.into(), options);
        self
    }

    /// Labels stored under [`SNAPSHOT_NAMESPACE`].
    ///
    /// Missing namespace, missing key, or a non-list value all yield an empty
    /// list; non-string items are ignored.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.namespace(SNAPSHOT_NAMESPACE)
            .and_then(|ns| ns.get(LABELS_KEY))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Return a copy whose label list is replaced by `labels`.
    ///
    /// Only `[SNAPSHOT_NAMESPACE][LABELS_KEY]` changes: other namespaces and
    /// other keys inside the snapshot namespace are carried over as-is.
    #[must_use]
    pub fn with_labels(&self, labels: &[String]) -> Self {
        let mut next = self.clone();
        let mut namespace = next
            .namespace(SNAPSHOT_NAMESPACE)
            .cloned()
            .unwrap_or_default();
        namespace.insert(
            LABELS_KEY.to_string(),
            Value::Array(labels.iter().cloned().map(Value::String).collect()),
        );
        next.0
            .insert(SNAPSHOT_NAMESPACE.to_string(), Value::Object(namespace));
        next
    }

    /// Whether no namespace is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options_from(value: Value) -> EntityOptions {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn should_return_empty_labels_when_namespace_missing() {
        let options = options_from(json!({"sensor": {"display_precision": 1}}));
        assert!(options.labels().is_empty());
    }

    #[test]
    fn should_return_empty_labels_when_value_is_not_a_list() {
        let options = options_from(json!({"ha_snapshot": {"labels": "Lighting"}}));
        assert!(options.labels().is_empty());
    }

    #[test]
    fn should_ignore_non_string_labels() {
        let options = options_from(json!({"ha_snapshot": {"labels": ["Lighting", 3, null, "Kitchen"]}}));
        assert_eq!(options.labels(), vec!["Lighting", "Kitchen"]);
    }

    #[test]
    fn should_replace_labels_and_preserve_sibling_namespaces() {
        let options = options_from(json!({
            "sensor": {"display_precision": 1},
            "ha_snapshot": {"labels": ["Old"], "note": "keep me"}
        }));

        let next = options.with_labels(&["Lighting".to_string()]);

        assert_eq!(next.labels(), vec!["Lighting"]);
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({
                "sensor": {"display_precision": 1},
                "ha_snapshot": {"labels": ["Lighting"], "note": "keep me"}
            })
        );
    }

    #[test]
    fn should_create_namespace_when_setting_labels_on_empty_options() {
        let next = EntityOptions::new().with_labels(&["Security".to_string()]);
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({"ha_snapshot": {"labels": ["Security"]}})
        );
    }

    #[test]
    fn should_replace_namespace_value_when_it_is_not_an_object() {
        let options = options_from(json!({"ha_snapshot": "legacy"}));
        let next = options.with_labels(&["Lighting".to_string()]);
        assert_eq!(next.labels(), vec!["Lighting"]);
    }

    #[test]
    fn should_leave_original_untouched_when_setting_labels() {
        let options = EntityOptions::new();
        let _ = options.with_labels(&["Security".to_string()]);
        assert!(options.is_empty());
    }
}
