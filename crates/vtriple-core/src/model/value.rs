use crate::errors::{invalid_input, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// A single value held by a predicate
///
/// Equality is structural over every field: two literals with the same text
/// but different language or datatype are different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Value {
    /// Inline datum, optionally tagged with a language and/or datatype
    Literal {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },
    /// Reference to another subject
    Resource { uri: String },
}

/// Discriminant of a [`Value`], persisted alongside interned objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Literal,
    Resource,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Literal => "literal",
            ValueKind::Resource => "resource",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "literal" => Some(ValueKind::Literal),
            "resource" => Some(ValueKind::Resource),
            _ => None,
        }
    }
}

impl Value {
    /// Plain literal with no language or datatype
    pub fn literal(text: impl Into<String>) -> Self {
        Value::Literal {
            text: text.into(),
            language: None,
            datatype: None,
        }
    }

    /// Literal tagged with a language; an empty tag means untagged
    pub fn lang_literal(text: impl Into<String>, language: impl Into<String>) -> Self {
        Value::Literal {
            text: text.into(),
            language: non_empty(language.into()),
            datatype: None,
        }
    }

    /// Literal tagged with a datatype; an empty datatype means untyped
    pub fn typed_literal(text: impl Into<String>, datatype: impl Into<String>) -> Self {
        Value::Literal {
            text: text.into(),
            language: None,
            datatype: non_empty(datatype.into()),
        }
    }

    pub fn resource(uri: impl Into<String>) -> Self {
        Value::Resource { uri: uri.into() }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Literal { .. } => ValueKind::Literal,
            Value::Resource { .. } => ValueKind::Resource,
        }
    }

    /// The literal text or resource uri
    pub fn lexical(&self) -> &str {
        match self {
            Value::Literal { text, .. } => text,
            Value::Resource { uri } => uri,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Value::Literal { language, .. } => language.as_deref(),
            Value::Resource { .. } => None,
        }
    }

    pub fn datatype(&self) -> Option<&str> {
        match self {
            Value::Literal { datatype, .. } => datatype.as_deref(),
            Value::Resource { .. } => None,
        }
    }

    /// Rebuild a value from its stored parts.
    ///
    /// Storage keeps absent language/datatype as empty strings, so empty
    /// parts are folded back to `None`.
    pub fn from_parts(kind: ValueKind, lexical: String, language: &str, datatype: &str) -> Self {
        match kind {
            ValueKind::Literal => Value::Literal {
                text: lexical,
                language: non_empty(language.to_string()),
                datatype: non_empty(datatype.to_string()),
            },
            ValueKind::Resource => Value::Resource { uri: lexical },
        }
    }

    /// Parse a single value node.
    ///
    /// Accepted forms: `{"@value": ..., "@language"?, "@type"?}`,
    /// `{"@id": ...}`, or a bare string/number/bool scalar which becomes a
    /// plain literal.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the node is null, an array, or an object without
    /// `@value`/`@id`, or when a tag is not a string.
    pub fn from_json(node: &Json) -> Result<Self> {
        match node {
            Json::Object(map) => value_from_node(map),
            Json::Null | Json::Array(_) => Err(invalid_input(
                "parse_value",
                format!("value node must be an object or scalar, got: {}", node),
            )),
            scalar => Ok(Value::literal(scalar_text(scalar).unwrap_or_default())),
        }
    }

    /// Canonical JSON node for this value
    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        match self {
            Value::Literal {
                text,
                language,
                datatype,
            } => {
                map.insert("@value".to_string(), Json::String(text.clone()));
                if let Some(language) = language {
                    map.insert("@language".to_string(), Json::String(language.clone()));
                }
                if let Some(datatype) = datatype {
                    map.insert("@type".to_string(), Json::String(datatype.clone()));
                }
            }
            Value::Resource { uri } => {
                map.insert("@id".to_string(), Json::String(uri.clone()));
            }
        }
        Json::Object(map)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Literal {
                text,
                language,
                datatype,
            } => {
                write!(f, "{:?}", text)?;
                if let Some(language) = language {
                    write!(f, "@{}", language)?;
                }
                if let Some(datatype) = datatype {
                    write!(f, "^^<{}>", datatype)?;
                }
                Ok(())
            }
            Value::Resource { uri } => write!(f, "<{}>", uri),
        }
    }
}

fn value_from_node(map: &Map<String, Json>) -> Result<Value> {
    if let Some(raw) = map.get("@value") {
        let text = scalar_text(raw).ok_or_else(|| {
            invalid_input(
                "parse_value",
                format!("`@value` must be a string, number or bool, got: {}", raw),
            )
        })?;
        return Ok(Value::Literal {
            text,
            language: optional_tag(map, "@language")?,
            datatype: optional_tag(map, "@type")?,
        });
    }

    if let Some(raw) = map.get("@id") {
        let uri = raw.as_str().ok_or_else(|| {
            invalid_input(
                "parse_value",
                format!("resource `@id` must be a string, got: {}", raw),
            )
        })?;
        return Ok(Value::resource(uri));
    }

    Err(invalid_input(
        "parse_value",
        "value node has neither `@value` nor `@id`",
    ))
}

fn optional_tag(map: &Map<String, Json>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(non_empty(s.clone())),
        Some(other) => Err(invalid_input(
            "parse_value",
            format!("`{}` must be a string, got: {}", key, other),
        )),
    }
}

fn scalar_text(raw: &Json) -> Option<String> {
    match raw {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
