use crate::errors::{invalid_input, Result};
use crate::model::object::Object;
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// Full state of a subject collection at one version
///
/// Objects are unique by `@id` and kept in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    objects: BTreeMap<String, Object>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from objects.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if two objects share an `@id`.
    pub fn from_objects(objects: impl IntoIterator<Item = Object>) -> Result<Self> {
        let mut snapshot = Snapshot::new();
        for object in objects {
            snapshot.insert(object)?;
        }
        Ok(snapshot)
    }

    /// Add an object.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if an object with the same `@id` is already present.
    pub fn insert(&mut self, object: Object) -> Result<()> {
        if self.objects.contains_key(object.id()) {
            return Err(
                invalid_input("snapshot_insert", "duplicate `@id` in snapshot")
                    .with_subject(object.id()),
            );
        }
        self.objects.insert(object.id().to_string(), object);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Objects in ascending `@id` order
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Parse a snapshot from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the snapshot is null or not an array, or any object
    /// is malformed (see [`Object::from_json`]).
    pub fn from_json(root: &Json) -> Result<Self> {
        let items = match root {
            Json::Null => return Err(invalid_input("parse_snapshot", "snapshot is null")),
            Json::Array(items) => items,
            other => {
                return Err(invalid_input(
                    "parse_snapshot",
                    format!("snapshot must be a JSON array, got: {}", other),
                ))
            }
        };

        let mut snapshot = Snapshot::new();
        for item in items {
            snapshot.insert(Object::from_json(item)?)?;
        }
        Ok(snapshot)
    }

    /// Parse a snapshot from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the bytes are not valid JSON or not a valid snapshot.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root: Json = serde_json::from_slice(bytes).map_err(|e| {
            invalid_input("parse_snapshot", format!("snapshot is not valid JSON: {}", e))
        })?;
        Self::from_json(&root)
    }

    /// Canonical JSON form: objects sorted by id, predicates sorted by name
    pub fn to_json(&self) -> Json {
        Json::Array(self.objects.values().map(Object::to_json).collect())
    }
}
