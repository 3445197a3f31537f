//! JSON fact files such as `/etc/rhsm/facts/virt_uuid.facts`.

use hostfacts_core::{FactParser, ParseError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// A flat JSON object of facts.
///
/// ```
/// use hostfacts_parsers::facts::JsonFacts;
///
/// let facts = JsonFacts::parse_str(r#"{"virt.uuid": "4546B285", "uname.machine": "x86"}"#).unwrap();
/// assert_eq!(facts.len(), 2);
/// assert_eq!(facts.get_str("uname.machine"), Some("x86"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonFacts {
    data: Map<String, Value>,
}

impl JsonFacts {
    /// Parses content lines joined back together as one JSON document.
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidJson`] for malformed or empty content,
    /// [`ParseError::NotAnObject`] when the document is not an object.
    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let joined = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse_str(&joined)
    }

    /// Parses raw JSON content.
    ///
    /// # Errors
    ///
    /// Same as [`parse_lines`](JsonFacts::parse_lines).
    pub fn parse_str(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(data) => Ok(Self { data }),
            _ => Err(ParseError::NotAnObject),
        }
    }

    /// Looks up a fact by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns a fact only when it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Returns `true` if the fact is present.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of facts.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the object had no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Facts from `/etc/rhsm/facts/virt_uuid.facts`.
#[deprecated(note = "parse subscription-manager facts with `JsonFacts` instead")]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VirtUuidFacts {
    facts: JsonFacts,
}

#[allow(deprecated)]
impl VirtUuidFacts {
    /// The `virt.uuid` fact.
    pub fn virt_uuid(&self) -> Option<&str> {
        self.facts.get_str("virt.uuid")
    }

    /// The `uname.machine` fact.
    pub fn machine(&self) -> Option<&str> {
        self.facts.get_str("uname.machine")
    }

    /// All facts in the file.
    pub fn facts(&self) -> &JsonFacts {
        &self.facts
    }
}

#[allow(deprecated)]
impl FactParser for VirtUuidFacts {
    const SPEC: &'static str = "virt_uuid_facts";

    fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        warn!("VirtUuidFacts is deprecated, parse subscription-manager facts with JsonFacts instead");
        Ok(Self {
            facts: JsonFacts::parse_lines(lines)?,
        })
    }
}
