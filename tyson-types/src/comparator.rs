use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

const ROOT: &str = "root";

/// A predicate node used inside `find`.
///
/// `eq`/`neq`/`gt`/`gte`/`lt`/`lte` compare a field path (defaulting to the
/// literal `root`) against a value. `and`/`or` combine sub-comparators.
/// `not` carries only a field path, never a value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Comparator {
    Eq(String, Value),
    Neq(String, Value),
    Gt(String, Value),
    Gte(String, Value),
    Lt(String, Value),
    Lte(String, Value),
    And(Vec<Comparator>),
    Or(Vec<Comparator>),
    Not(String),
}

macro_rules! field_default_ctors {
    ($(($variant:ident, $bare:ident, $field:ident)),* $(,)?) => {
        $(
            pub fn $bare(value: Value) -> Self {
                Self::$variant(ROOT.to_string(), value)
            }

            pub fn $field(field: impl Into<String>, value: Value) -> Self {
                Self::$variant(field.into(), value)
            }
        )*
    };
}

impl Comparator {
    field_default_ctors!(
        (Eq, eq, eq_field),
        (Neq, neq, neq_field),
        (Gt, gt, gt_field),
        (Gte, gte, gte_field),
        (Lt, lt, lt_field),
        (Lte, lte, lte_field),
    );

    pub fn and(items: impl IntoIterator<Item = Comparator>) -> Self {
        Self::And(items.into_iter().collect())
    }

    pub fn or(items: impl IntoIterator<Item = Comparator>) -> Self {
        Self::Or(items.into_iter().collect())
    }

    pub fn not(field: impl Into<String>) -> Self {
        Self::Not(field.into())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Comparator::Eq(_, _) => "eq",
            Comparator::Neq(_, _) => "neq",
            Comparator::Gt(_, _) => "gt",
            Comparator::Gte(_, _) => "gte",
            Comparator::Lt(_, _) => "lt",
            Comparator::Lte(_, _) => "lte",
            Comparator::And(_) => "and",
            Comparator::Or(_) => "or",
            Comparator::Not(_) => "not",
        }
    }
}

fn fmt_binary(f: &mut fmt::Formatter<'_>, name: &str, field: &str, value: &Value) -> fmt::Result {
    if field == ROOT {
        write!(f, "{name}{{root: {value}}}")
    } else {
        write!(f, "{name}{{value|{field}|: {value}}}")
    }
}

fn fmt_sequence(f: &mut fmt::Formatter<'_>, name: &str, items: &[Comparator]) -> fmt::Result {
    write!(f, "{name}[")?;
    for item in items {
        write!(f, "{item},")?;
    }
    write!(f, "]")
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Eq(field, value) => fmt_binary(f, "eq", field, value),
            Comparator::Neq(field, value) => fmt_binary(f, "neq", field, value),
            Comparator::Gt(field, value) => fmt_binary(f, "gt", field, value),
            Comparator::Gte(field, value) => fmt_binary(f, "gte", field, value),
            Comparator::Lt(field, value) => fmt_binary(f, "lt", field, value),
            Comparator::Lte(field, value) => fmt_binary(f, "lte", field, value),
            Comparator::And(items) => fmt_sequence(f, "and", items),
            Comparator::Or(items) => fmt_sequence(f, "or", items),
            Comparator::Not(field) => write!(f, "not(value|{field}|)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_field_omits_value_path() {
        let c = Comparator::gt(Value::number("5").unwrap());
        assert_eq!(c.to_string(), "gt{root: n|5|}");
    }

    #[test]
    fn explicit_field_uses_value_path() {
        let c = Comparator::lte_field("num", Value::number("50").unwrap());
        assert_eq!(c.to_string(), "lte{value|num|: n|50|}");
    }

    #[test]
    fn and_of_two_comparators() {
        let c = Comparator::and([
            Comparator::gt_field("num", Value::number("5").unwrap()),
            Comparator::lte_field("num", Value::number("50").unwrap()),
        ]);
        assert_eq!(
            c.to_string(),
            "and[gt{value|num|: n|5|},lte{value|num|: n|50|},]"
        );
    }

    #[test]
    fn not_carries_only_a_path() {
        let c = Comparator::not("active");
        assert_eq!(c.to_string(), "not(value|active|)");
    }
}
