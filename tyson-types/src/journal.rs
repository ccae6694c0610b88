#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collection::CollectionView;
use crate::error::{Error, Result};
use crate::value::Value;

/// The operation kind named by a response's meta section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaKind {
    Insert,
    Get,
    Find,
    Update,
    None,
}

impl MetaKind {
    /// Maps the wire token that appears before `{` in the meta section
    /// (e.g. `insert_meta`) to a `MetaKind`. Unrecognized tokens map to
    /// `MetaKind::None`.
    pub fn from_wire_token(token: &str) -> Self {
        match token {
            "insert_meta" => MetaKind::Insert,
            "get_meta" => MetaKind::Get,
            "find_meta" => MetaKind::Find,
            "update_meta" => MetaKind::Update,
            _ => MetaKind::None,
        }
    }
}

/// The parsed meta section of a response: an operation kind plus a `Map`
/// payload carrying at least a `count` field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Meta {
    kind: MetaKind,
    payload: Value,
}

impl Meta {
    pub fn new(kind: MetaKind, payload: Value) -> Result<Self> {
        payload.as_map().map_err(|_| Error::InvalidArgument {
            expected: "Map",
            found: payload.tag_name(),
        })?;
        Ok(Self { kind, payload })
    }

    pub fn kind(&self) -> MetaKind {
        self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The `count` field of the meta payload, as an unsigned integer.
    pub fn count(&self) -> Result<u64> {
        self.payload
            .as_map()
            .ok()
            .and_then(|map| map.get("count"))
            .ok_or(Error::UnsupportedConversion("count"))?
            .as_u64()
    }
}

/// A parsed response envelope, immutable after parse.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Journal {
    ok: bool,
    data: CollectionView,
    meta: Meta,
}

impl Journal {
    pub fn new(ok: bool, data: CollectionView, meta: Meta) -> Self {
        Self { ok, data, meta }
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn data(&self) -> &CollectionView {
        &self.data
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}
