//! Value interning boundary.
//!
//! Strings, values and triples are deduplicated into stable integer ids by
//! the backing store. Every operation is get-or-create: equal input always
//! returns the same id. [`MemoryInterner`] is the in-process implementation
//! used for dry runs and tests; the SQLite implementation lives in
//! `vtriple-store`.

use crate::errors::Result;
use crate::model::{Value, ValueKind};
use std::collections::HashMap;

/// Identifier handed out by an [`Interner`]
pub type InternId = i64;

/// Storage form of a [`Value`]: absent language/datatype are empty strings
/// so equal values always map to one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectTuple {
    pub kind: ValueKind,
    pub value: String,
    pub language: String,
    pub datatype: String,
}

impl From<&Value> for ObjectTuple {
    fn from(value: &Value) -> Self {
        ObjectTuple {
            kind: value.kind(),
            value: value.lexical().to_string(),
            language: value.language().unwrap_or_default().to_string(),
            datatype: value.datatype().unwrap_or_default().to_string(),
        }
    }
}

impl ObjectTuple {
    pub fn to_value(&self) -> Value {
        Value::from_parts(self.kind, self.value.clone(), &self.language, &self.datatype)
    }
}

/// Interned `(subject, predicate?, object?)` key.
///
/// `(s, None, None)` marks a bare subject and `(s, Some(p), None)` a
/// predicate with no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripleKey {
    pub subject: InternId,
    pub predicate: Option<InternId>,
    pub object: Option<InternId>,
}

/// Get-or-create id allocation against a backing store.
///
/// Implementations must never hand out two ids for equal input, including
/// under concurrent callers; `&mut self` lets in-process implementations
/// rely on the caller for serialization.
pub trait Interner {
    /// # Errors
    ///
    /// `StorageUnavailable` if the backing store cannot be reached.
    fn intern_string(&mut self, s: &str) -> Result<InternId>;

    /// # Errors
    ///
    /// `StorageUnavailable` if the backing store cannot be reached.
    fn intern_object(&mut self, object: &ObjectTuple) -> Result<InternId>;

    /// # Errors
    ///
    /// `StorageUnavailable` if the backing store cannot be reached.
    fn intern_triple(&mut self, key: TripleKey) -> Result<InternId>;

    /// Intern a value via its storage tuple.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the backing store cannot be reached.
    fn intern_value(&mut self, value: &Value) -> Result<InternId> {
        self.intern_object(&ObjectTuple::from(value))
    }

    /// Intern every part of a triple and then the triple itself.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the backing store cannot be reached.
    fn intern_triple_parts(
        &mut self,
        subject: &str,
        predicate: Option<&str>,
        value: Option<&Value>,
    ) -> Result<InternId> {
        let subject = self.intern_string(subject)?;
        let predicate = predicate.map(|p| self.intern_string(p)).transpose()?;
        let object = value.map(|v| self.intern_value(v)).transpose()?;
        self.intern_triple(TripleKey {
            subject,
            predicate,
            object,
        })
    }
}

impl<I: Interner + ?Sized> Interner for &mut I {
    fn intern_string(&mut self, s: &str) -> Result<InternId> {
        (**self).intern_string(s)
    }

    fn intern_object(&mut self, object: &ObjectTuple) -> Result<InternId> {
        (**self).intern_object(object)
    }

    fn intern_triple(&mut self, key: TripleKey) -> Result<InternId> {
        (**self).intern_triple(key)
    }
}

/// In-memory interner; ids start at 1 and are dense per table.
#[derive(Debug, Default, Clone)]
pub struct MemoryInterner {
    strings: HashMap<String, InternId>,
    string_rows: Vec<String>,
    objects: HashMap<ObjectTuple, InternId>,
    object_rows: Vec<ObjectTuple>,
    triples: HashMap<TripleKey, InternId>,
    triple_rows: Vec<TripleKey>,
}

impl MemoryInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(&self, id: InternId) -> Option<&str> {
        row(&self.string_rows, id).map(String::as_str)
    }

    pub fn object(&self, id: InternId) -> Option<&ObjectTuple> {
        row(&self.object_rows, id)
    }

    pub fn triple(&self, id: InternId) -> Option<TripleKey> {
        row(&self.triple_rows, id).copied()
    }

    /// Id of an already interned string, without creating one
    pub fn lookup_string(&self, s: &str) -> Option<InternId> {
        self.strings.get(s).copied()
    }

    pub fn string_count(&self) -> usize {
        self.string_rows.len()
    }

    pub fn object_count(&self) -> usize {
        self.object_rows.len()
    }

    pub fn triple_count(&self) -> usize {
        self.triple_rows.len()
    }
}

fn row<T>(rows: &[T], id: InternId) -> Option<&T> {
    usize::try_from(id)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| rows.get(i))
}

fn next_id<T>(rows: &[T]) -> InternId {
    rows.len() as InternId + 1
}

impl Interner for MemoryInterner {
    fn intern_string(&mut self, s: &str) -> Result<InternId> {
        if let Some(id) = self.strings.get(s) {
            return Ok(*id);
        }
        let id = next_id(&self.string_rows);
        self.strings.insert(s.to_string(), id);
        self.string_rows.push(s.to_string());
        Ok(id)
    }

    fn intern_object(&mut self, object: &ObjectTuple) -> Result<InternId> {
        if let Some(id) = self.objects.get(object) {
            return Ok(*id);
        }
        let id = next_id(&self.object_rows);
        self.objects.insert(object.clone(), id);
        self.object_rows.push(object.clone());
        Ok(id)
    }

    fn intern_triple(&mut self, key: TripleKey) -> Result<InternId> {
        if let Some(id) = self.triples.get(&key) {
            return Ok(*id);
        }
        let id = next_id(&self.triple_rows);
        self.triples.insert(key, id);
        self.triple_rows.push(key);
        Ok(id)
    }
}
