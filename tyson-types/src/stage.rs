use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::comparator::Comparator;
use crate::value::{Link, Value};

const COMMON_PREDECESSORS: &[&str] = &["find", "get", "sort", "limit", "offset"];
const COMMON_SUCCESSORS: &[&str] = &["find", "get", "sort", "limit", "offset", "update", "delete"];

/// A sort primitive: an ascending or descending field path.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortItem {
    Asc(String),
    Desc(String),
}

impl fmt::Display for SortItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortItem::Asc(field) => write!(f, "asc(value|{field}|)"),
            SortItem::Desc(field) => write!(f, "desc(value|{field}|)"),
        }
    }
}

/// The kind of an `update` operation's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateKind {
    Inc,
    Set,
}

impl UpdateKind {
    fn name(self) -> &'static str {
        match self {
            UpdateKind::Inc => "inc",
            UpdateKind::Set => "set",
        }
    }
}

/// One `update` operation: an `inc`/`set` kind paired with a field-update payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpdateOp {
    kind: UpdateKind,
    payload: Value,
}

impl UpdateOp {
    /// `payload` must be a `Value::FieldUpdate`.
    pub fn new(kind: UpdateKind, payload: Value) -> Result<Self, crate::error::Error> {
        if !matches!(payload, Value::FieldUpdate(_, _)) {
            return Err(crate::error::Error::InvalidArgument {
                expected: "FieldUpdate",
                found: payload.tag_name(),
            });
        }
        Ok(Self { kind, payload })
    }

    pub fn inc(payload: Value) -> Result<Self, crate::error::Error> {
        Self::new(UpdateKind::Inc, payload)
    }

    pub fn set(payload: Value) -> Result<Self, crate::error::Error> {
        Self::new(UpdateKind::Set, payload)
    }
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.kind.name(), self.payload)
    }
}

/// One operation in a pipeline.
///
/// Each variant knows its own wire form (`Display`), whether it may start a
/// pipeline, and the stage names allowed immediately before/after it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stage {
    Insert(Vec<Value>),
    Get(Vec<Link>),
    Find(Vec<Comparator>),
    Sort(Vec<SortItem>),
    Limit(u64),
    Offset(u64),
    Update(Vec<UpdateOp>),
    Delete,
    Project(Vec<(String, Value)>),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Insert(_) => "insert",
            Stage::Get(_) => "get",
            Stage::Find(_) => "find",
            Stage::Sort(_) => "sort",
            Stage::Limit(_) => "limit",
            Stage::Offset(_) => "offset",
            Stage::Update(_) => "update",
            Stage::Delete => "delete",
            Stage::Project(_) => "project",
        }
    }

    pub fn can_start_pipeline(&self) -> bool {
        matches!(self, Stage::Insert(_) | Stage::Get(_) | Stage::Find(_))
    }

    pub fn allowed_predecessors(&self) -> &'static [&'static str] {
        match self {
            Stage::Insert(_) => &[],
            _ => COMMON_PREDECESSORS,
        }
    }

    pub fn allowed_successors(&self) -> &'static [&'static str] {
        match self {
            Stage::Insert(_) | Stage::Update(_) | Stage::Delete | Stage::Project(_) => &[],
            _ => COMMON_SUCCESSORS,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Insert(values) => {
                write!(f, "insert[")?;
                for value in values {
                    write!(f, "{value},")?;
                }
                write!(f, "]")
            }
            Stage::Get(links) => {
                write!(f, "get[")?;
                for link in links {
                    write!(f, "{link},")?;
                }
                write!(f, "]")
            }
            Stage::Find(comparators) => {
                write!(f, "find[")?;
                for comparator in comparators {
                    write!(f, "{comparator},")?;
                }
                write!(f, "]")
            }
            Stage::Sort(items) => {
                write!(f, "sort[")?;
                for item in items {
                    write!(f, "{item},")?;
                }
                write!(f, "]")
            }
            Stage::Limit(k) => write!(f, "limit(n|{k}|)"),
            Stage::Offset(k) => write!(f, "offset(n|{k}|)"),
            Stage::Update(ops) => {
                write!(f, "update[")?;
                for op in ops {
                    write!(f, "{op},")?;
                }
                write!(f, "]")
            }
            Stage::Delete => write!(f, "delete"),
            Stage::Project(fields) => {
                write!(f, "project{{")?;
                for (key, value) in fields {
                    write!(f, "s|{key}|:{value},")?;
                }
                write!(f, "}}")
            }
        }
    }
}
