use crate::errors::{invalid_input, Result};
use crate::model::value::Value;
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Returns true for keys that carry node metadata rather than predicates
/// (`@id`, `@value`, `@language`, `@type`, ...)
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with('@')
}

/// A subject and its predicates
///
/// Predicates are kept in a `BTreeMap` so every walk over them is in
/// ascending name order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object {
    id: String,
    predicates: BTreeMap<String, Vec<Value>>,
}

impl Object {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            predicates: BTreeMap::new(),
        }
    }

    /// Builder form of [`Object::set`]
    pub fn with(mut self, predicate: impl Into<String>, values: Vec<Value>) -> Self {
        self.set(predicate, values);
        self
    }

    /// Replace the value list of a predicate. An empty list keeps the
    /// predicate present with no values.
    pub fn set(&mut self, predicate: impl Into<String>, values: Vec<Value>) {
        self.predicates.insert(predicate.into(), values);
    }

    /// Append one value to a predicate, creating it if needed
    pub fn push(&mut self, predicate: impl Into<String>, value: Value) {
        self.predicates.entry(predicate.into()).or_default().push(value);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn values(&self, predicate: &str) -> Option<&[Value]> {
        self.predicates.get(predicate).map(Vec::as_slice)
    }

    pub fn has_predicate(&self, predicate: &str) -> bool {
        self.predicates.contains_key(predicate)
    }

    /// Predicates in ascending name order
    pub fn predicates(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.predicates
            .iter()
            .map(|(p, values)| (p.as_str(), values.as_slice()))
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Parse one object of a snapshot.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the node is not an object, `@id` is missing or not
    /// a string, a predicate name is empty, or a value node is malformed.
    pub fn from_json(node: &Json) -> Result<Self> {
        let map = node.as_object().ok_or_else(|| {
            invalid_input(
                "parse_object",
                format!("snapshot entries must be objects, got: {}", node),
            )
        })?;

        let id = match map.get("@id") {
            Some(Json::String(id)) => id.clone(),
            Some(other) => {
                return Err(invalid_input(
                    "parse_object",
                    format!("`@id` must be a string, got: {}", other),
                ))
            }
            None => return Err(invalid_input("parse_object", "object lacks `@id`")),
        };

        let mut object = Object::new(id);
        for (key, raw) in map {
            if is_reserved_key(key) {
                continue;
            }
            if key.is_empty() {
                return Err(invalid_input("parse_object", "empty predicate name")
                    .with_subject(object.id.clone()));
            }
            let values = parse_value_list(raw)
                .map_err(|e| e.with_subject(object.id.clone()).with_predicate(key.clone()))?;
            object.set(key.clone(), values);
        }

        Ok(object)
    }

    /// Canonical JSON node: `@id` plus one array per predicate
    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        map.insert("@id".to_string(), Json::String(self.id.clone()));
        for (predicate, values) in &self.predicates {
            map.insert(
                predicate.clone(),
                Json::Array(values.iter().map(Value::to_json).collect()),
            );
        }
        Json::Object(map)
    }
}

/// A predicate's raw JSON may be a list, a single node, or null (empty)
fn parse_value_list(raw: &Json) -> Result<Vec<Value>> {
    match raw {
        Json::Null => Ok(Vec::new()),
        Json::Array(items) => items.iter().map(Value::from_json).collect(),
        single => Ok(vec![Value::from_json(single)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VtErrorKind;
    use serde_json::json;

    #[test]
    fn test_reserved_keys_are_not_predicates() {
        let obj = Object::from_json(&json!({
            "@id": "s1",
            "@type": "Person",
            "name": [{"@value": "Alice"}]
        }))
        .unwrap();

        assert_eq!(obj.id(), "s1");
        assert_eq!(obj.predicate_count(), 1);
        assert!(!obj.has_predicate("@type"));
    }

    #[test]
    fn test_single_node_and_null_predicates() {
        let obj = Object::from_json(&json!({
            "@id": "s1",
            "name": {"@value": "Alice"},
            "tags": null
        }))
        .unwrap();

        assert_eq!(obj.values("name"), Some(&[Value::literal("Alice")][..]));
        assert_eq!(obj.values("tags"), Some(&[][..]));
    }

    #[test]
    fn test_missing_id_is_invalid_input() {
        let err = Object::from_json(&json!({"name": "Alice"})).unwrap_err();
        assert_eq!(err.kind(), VtErrorKind::InvalidInput);
    }

    #[test]
    fn test_bad_value_carries_context() {
        let err = Object::from_json(&json!({"@id": "s1", "name": [[1]]})).unwrap_err();
        assert_eq!(err.subject(), Some("s1"));
        assert_eq!(err.predicate(), Some("name"));
    }

    #[test]
    fn test_predicates_iterate_sorted() {
        let obj = Object::new("s")
            .with("zeta", vec![])
            .with("alpha", vec![])
            .with("mid", vec![]);
        let names: Vec<&str> = obj.predicates().map(|(p, _)| p).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
