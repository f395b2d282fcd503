//! Per-source payload transforms
//!
//! A transform maps the raw decoded payload to a normalized record set.
//! Transforms are pure: no I/O, no shared state. They are selected per
//! source by the `TransformSpec` in the registry.

use std::collections::BTreeMap;

use muninn_core::types::TransformSpec;
use serde_json::Value;

use crate::error::TransformError;

/// A pure payload-to-record-set mapping
pub trait Transform: Send + Sync {
    /// Apply the transform to a decoded payload
    fn apply(&self, payload: Value) -> Result<Vec<Value>, TransformError>;
}

/// Build the transform implementation for a spec
pub fn from_spec(spec: &TransformSpec) -> Box<dyn Transform> {
    match spec {
        TransformSpec::Identity => Box::new(Identity),
        TransformSpec::FieldMap { fields } => Box::new(FieldMap {
            fields: fields.clone(),
        }),
    }
}

/// Pass records through unchanged
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, payload: Value) -> Result<Vec<Value>, TransformError> {
        records(payload)
    }
}

/// Rename fields on every record; unmapped fields pass through untouched
pub struct FieldMap {
    fields: BTreeMap<String, String>,
}

impl FieldMap {
    /// Create a field map from old-name to new-name pairs
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl Transform for FieldMap {
    fn apply(&self, payload: Value) -> Result<Vec<Value>, TransformError> {
        let mut result = records(payload)?;

        for (index, record) in result.iter_mut().enumerate() {
            let Some(object) = record.as_object_mut() else {
                return Err(TransformError::NotAnObject { index });
            };

            for (old, new) in &self.fields {
                if let Some(value) = object.remove(old) {
                    object.insert(new.clone(), value);
                }
            }
        }

        Ok(result)
    }
}

/// Normalize a payload into a record set
///
/// Arrays become their elements; a top-level object becomes a
/// single-record set. Scalars have no record interpretation.
fn records(payload: Value) -> Result<Vec<Value>, TransformError> {
    match payload {
        Value::Array(items) => Ok(items),
        object @ Value::Object(_) => Ok(vec![object]),
        other => Err(TransformError::UnsupportedPayload {
            kind: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_map(pairs: &[(&str, &str)]) -> FieldMap {
        FieldMap::new(
            pairs
                .iter()
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_identity_passes_array_through() {
        let payload = json!([{"id": 1}, {"id": 2}]);
        let result = Identity.apply(payload).unwrap();
        assert_eq!(result, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_identity_wraps_object_as_single_record() {
        let payload = json!({"id": 1});
        let result = Identity.apply(payload).unwrap();
        assert_eq!(result, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_identity_rejects_scalar_payload() {
        let err = Identity.apply(json!(42)).unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnsupportedPayload { kind: "number" }
        ));
    }

    #[test]
    fn test_field_map_renames_mapped_fields() {
        let transform = field_map(&[("name", "nombre")]);
        let payload = json!([{"id": 1, "name": "A", "email": "a@x.com"}]);

        let result = transform.apply(payload).unwrap();

        assert_eq!(
            result,
            vec![json!({"id": 1, "nombre": "A", "email": "a@x.com"})]
        );
    }

    #[test]
    fn test_field_map_leaves_unmapped_fields_untouched() {
        let transform = field_map(&[("missing", "renamed")]);
        let payload = json!([{"id": 1, "name": "A"}]);

        let result = transform.apply(payload).unwrap();

        assert_eq!(result, vec![json!({"id": 1, "name": "A"})]);
    }

    #[test]
    fn test_field_map_applies_to_every_record() {
        let transform = field_map(&[("n", "value")]);
        let payload = json!([{"n": 1}, {"n": 2}, {"n": 3}]);

        let result = transform.apply(payload).unwrap();

        assert_eq!(
            result,
            vec![
                json!({"value": 1}),
                json!({"value": 2}),
                json!({"value": 3})
            ]
        );
    }

    #[test]
    fn test_field_map_rejects_non_object_record() {
        let transform = field_map(&[("a", "b")]);
        let payload = json!([{"a": 1}, "not an object"]);

        let err = transform.apply(payload).unwrap_err();
        assert!(matches!(err, TransformError::NotAnObject { index: 1 }));
    }

    #[test]
    fn test_from_spec_builds_matching_transform() {
        let identity = from_spec(&TransformSpec::Identity);
        assert_eq!(
            identity.apply(json!([{"id": 1}])).unwrap(),
            vec![json!({"id": 1})]
        );

        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "nombre".to_string());
        let mapped = from_spec(&TransformSpec::FieldMap { fields });
        assert_eq!(
            mapped.apply(json!([{"name": "A"}])).unwrap(),
            vec![json!({"nombre": "A"})]
        );
    }
}
