use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A (collection name, object id) pair identifying a document.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    collection: String,
    id: Uuid,
}

impl Link {
    /// Builds a link from an already-parsed [`Uuid`].
    pub fn new(collection: impl Into<String>, id: Uuid) -> Result<Self> {
        let collection = collection.into();
        if collection.is_empty() {
            return Err(Error::EmptyCollectionName);
        }
        Ok(Self { collection, id })
    }

    /// Builds a link from a UUID-shaped textual token.
    pub fn parse(collection: impl Into<String>, id: &str) -> Result<Self> {
        let id = Uuid::parse_str(id).map_err(|_| Error::InvalidLinkId {
            token: id.to_string(),
        })?;
        Self::new(collection, id)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|", self.collection, self.id)
    }
}

/// The tagged union at the heart of the wire format.
///
/// See the module-level documentation of the crate for the full wire grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Number(String),
    String(String),
    Bool(bool),
    Null,
    /// Seconds since the Unix epoch, held as text.
    Timestamp(String),
    Link(Link),
    Vector(Vec<Value>),
    /// Iterated in key-sorted order by virtue of `BTreeMap`.
    Map(BTreeMap<String, Value>),
    /// A single `field -> value` update payload, as carried by `update`.
    FieldUpdate(String, Box<Value>),
    /// Projection primitive: keep the field as-is.
    Keep,
    /// Projection primitive: substitute the document's value at `path`.
    FieldRef(String),
}

impl Value {
    /// Validates that `text` is a signed/fractional decimal literal.
    pub fn verify_number(text: &str) -> Result<()> {
        let mut chars = text.chars().peekable();
        if chars.peek() == Some(&'-') {
            chars.next();
        }
        let mut saw_digit = false;
        let mut saw_dot = false;
        for c in chars {
            if c.is_ascii_digit() {
                saw_digit = true;
            } else if c == '.' && !saw_dot {
                saw_dot = true;
            } else {
                return Err(Error::InvalidArgument {
                    expected: "decimal literal",
                    found: "malformed number",
                });
            }
        }
        if !saw_digit {
            return Err(Error::InvalidArgument {
                expected: "decimal literal",
                found: "empty or sign-only text",
            });
        }
        Ok(())
    }

    pub fn number(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        Self::verify_number(&text)?;
        Ok(Self::Number(text))
    }

    /// Convenience constructor from any Rust integer/float via its `Display` impl.
    pub fn number_from(n: impl fmt::Display) -> Self {
        Self::Number(n.to_string())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn null() -> Self {
        Self::Null
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(secs: u64) -> Self {
        Self::Timestamp(secs.to_string())
    }

    pub fn link(link: Link) -> Self {
        Self::Link(link)
    }

    pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Vector(items.into_iter().collect())
    }

    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    pub fn field_update(field: impl Into<String>, value: Value) -> Self {
        Self::FieldUpdate(field.into(), Box::new(value))
    }

    pub fn keep() -> Self {
        Self::Keep
    }

    pub fn field_ref(path: impl Into<String>) -> Self {
        Self::FieldRef(path.into())
    }

    /// Inserts `key -> value` in place. Only valid on a `Map`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        match self {
            Value::Map(map) => {
                map.insert(key.into(), value);
                Ok(())
            }
            other => Err(Error::InvalidArgument {
                expected: "Map",
                found: other.tag_name(),
            }),
        }
    }

    pub fn tag_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Null => "Null",
            Value::Timestamp(_) => "Timestamp",
            Value::Link(_) => "Link",
            Value::Vector(_) => "Vector",
            Value::Map(_) => "Map",
            Value::FieldUpdate(_, _) => "FieldUpdate",
            Value::Keep => "Keep",
            Value::FieldRef(_) => "FieldRef",
        }
    }

    fn tag_ordinal(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Timestamp(_) => 4,
            Value::Link(_) => 5,
            Value::Vector(_) => 6,
            Value::Map(_) => 7,
            Value::FieldUpdate(_, _) => 8,
            Value::Keep => 9,
            Value::FieldRef(_) => 10,
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Number(s) => s
                .parse()
                .map_err(|_| Error::UnsupportedConversion("as_i64")),
            _ => Err(Error::UnsupportedConversion("as_i64")),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        match self {
            Value::Number(s) => s
                .parse()
                .map_err(|_| Error::UnsupportedConversion("as_u64")),
            Value::Timestamp(s) => s
                .parse()
                .map_err(|_| Error::UnsupportedConversion("as_u64")),
            _ => Err(Error::UnsupportedConversion("as_u64")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Number(s) => s
                .parse()
                .map_err(|_| Error::UnsupportedConversion("as_f64")),
            _ => Err(Error::UnsupportedConversion("as_f64")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(Error::UnsupportedConversion("as_bool")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            _ => Err(Error::UnsupportedConversion("as_str")),
        }
    }

    pub fn as_link(&self) -> Result<&Link> {
        match self {
            Value::Link(link) => Ok(link),
            _ => Err(Error::UnsupportedConversion("as_link")),
        }
    }

    pub fn as_vector(&self) -> Result<&[Value]> {
        match self {
            Value::Vector(items) => Ok(items),
            _ => Err(Error::UnsupportedConversion("as_vector")),
        }
    }

    pub fn as_map(&self) -> Result<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            _ => Err(Error::UnsupportedConversion("as_map")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(text) => write!(f, "n|{text}|"),
            Value::String(text) => write!(f, "s|{text}|"),
            Value::Bool(true) => write!(f, "b|true|"),
            Value::Bool(false) => write!(f, "b|false|"),
            Value::Null => write!(f, "null"),
            Value::Timestamp(secs) => write!(f, "utc|{secs}|"),
            Value::Link(link) => write!(f, "{link}"),
            Value::Vector(items) => {
                write!(f, "v[")?;
                for item in items {
                    write!(f, "{item},")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "m{{")?;
                for (key, value) in map {
                    write!(f, "s|{key}|:{value},")?;
                }
                write!(f, "}}")
            }
            Value::FieldUpdate(field, value) => write!(f, "value|{field}|:{value}"),
            Value::Keep => write!(f, "keep"),
            Value::FieldRef(path) => write!(f, "value|{path}|"),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Link(a), Link(b)) => a.cmp(b),
            (Vector(a), Vector(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.cmp(b),
            (FieldUpdate(fa, va), FieldUpdate(fb, vb)) => fa.cmp(fb).then_with(|| va.cmp(vb)),
            (Keep, Keep) => Ordering::Equal,
            (FieldRef(a), FieldRef(b)) => a.cmp(b),
            _ => self.tag_ordinal().cmp(&other.tag_ordinal()),
        }
    }
}
