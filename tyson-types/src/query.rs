use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::stage::{SortItem, Stage, UpdateOp};
use crate::value::{Link, Value};

/// A pre-populated sequence of comparators for the `find` stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Find(Vec<Comparator>);

macro_rules! find_root_ctors {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(value: Value) -> Self {
                Self(vec![Comparator::$name(value)])
            }
        )*
    };
}

impl Find {
    pub fn new() -> Self {
        Self::default()
    }

    find_root_ctors!(eq, neq, gt, gte, lt, lte);

    pub fn and(items: impl IntoIterator<Item = Comparator>) -> Self {
        Self(vec![Comparator::and(items)])
    }

    pub fn or(items: impl IntoIterator<Item = Comparator>) -> Self {
        Self(vec![Comparator::or(items)])
    }

    pub fn push(mut self, comparator: Comparator) -> Self {
        self.0.push(comparator);
        self
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.0
    }
}

/// A pre-populated sequence of sort primitives for the `sort` stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sort(Vec<SortItem>);

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(fields.into_iter().map(|f| SortItem::Asc(f.into())).collect())
    }

    pub fn desc(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|f| SortItem::Desc(f.into()))
                .collect(),
        )
    }

    pub fn push_asc(mut self, field: impl Into<String>) -> Self {
        self.0.push(SortItem::Asc(field.into()));
        self
    }

    pub fn push_desc(mut self, field: impl Into<String>) -> Self {
        self.0.push(SortItem::Desc(field.into()));
        self
    }

    pub fn items(&self) -> &[SortItem] {
        &self.0
    }
}

/// An ordered list of stages bound to a collection name.
///
/// Stages are appended one at a time; each append is validated against the
/// transition table in place, so an invalid pipeline can never be built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Query {
    collection: String,
    stages: Vec<Stage>,
}

impl Query {
    pub fn new(collection: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        if collection.is_empty() {
            return Err(Error::EmptyCollectionName);
        }
        Ok(Self {
            collection,
            stages: Vec::new(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    fn validate_append(&self, stage: &Stage) -> Result<()> {
        match self.stages.last() {
            None => {
                if stage.can_start_pipeline() {
                    Ok(())
                } else {
                    log::debug!("rejected pipeline start with `{}`", stage.name());
                    Err(Error::CannotStartPipeline { stage: stage.name() })
                }
            }
            Some(prev) => {
                let forward_ok = prev.allowed_successors().contains(&stage.name());
                let backward_ok = stage.allowed_predecessors().contains(&prev.name());
                if forward_ok && backward_ok {
                    Ok(())
                } else {
                    log::debug!(
                        "rejected transition `{}` -> `{}`",
                        prev.name(),
                        stage.name()
                    );
                    Err(Error::PipelineTransition {
                        prev: prev.name(),
                        next: stage.name(),
                    })
                }
            }
        }
    }

    pub fn append(mut self, stage: Stage) -> Result<Self> {
        self.validate_append(&stage)?;
        self.stages.push(stage);
        Ok(self)
    }

    pub fn insert(self, values: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.append(Stage::Insert(values.into_iter().collect()))
    }

    /// Every element must be a `Value::Link`; anything else is rejected.
    pub fn get(self, values: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut links = Vec::new();
        for value in values {
            match value {
                Value::Link(link) => links.push(link),
                other => {
                    return Err(Error::InvalidArgument {
                        expected: "Link",
                        found: other.tag_name(),
                    })
                }
            }
        }
        self.append(Stage::Get(links))
    }

    pub fn get_links(self, links: impl IntoIterator<Item = Link>) -> Result<Self> {
        self.append(Stage::Get(links.into_iter().collect()))
    }

    pub fn find(self, find: Find) -> Result<Self> {
        self.append(Stage::Find(find.0))
    }

    pub fn sort(self, sort: Sort) -> Result<Self> {
        self.append(Stage::Sort(sort.0))
    }

    pub fn limit(self, k: u64) -> Result<Self> {
        self.append(Stage::Limit(k))
    }

    pub fn offset(self, k: u64) -> Result<Self> {
        self.append(Stage::Offset(k))
    }

    pub fn update(self, ops: impl IntoIterator<Item = UpdateOp>) -> Result<Self> {
        self.append(Stage::Update(ops.into_iter().collect()))
    }

    pub fn delete(self) -> Result<Self> {
        self.append(Stage::Delete)
    }

    pub fn project(self, fields: impl IntoIterator<Item = (String, Value)>) -> Result<Self> {
        self.append(Stage::Project(fields.into_iter().collect()))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection|{}|:", self.collection)?;
        match self.stages.as_slice() {
            [single] => write!(f, "{single}")?,
            many => {
                write!(f, "q[")?;
                for stage in many {
                    write!(f, "{stage},")?;
                }
                write!(f, "]")?;
            }
        }
        write!(f, ";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_scalar() {
        let q = Query::new("test")
            .unwrap()
            .insert([Value::number("10").unwrap()])
            .unwrap();
        assert_eq!(q.to_string(), "collection|test|:insert[n|10|,];");
    }

    #[test]
    fn insert_heterogeneous() {
        let q = Query::new("test")
            .unwrap()
            .insert([
                Value::number("10").unwrap(),
                Value::string("fizzbuzz"),
                Value::bool(false),
            ])
            .unwrap();
        assert_eq!(
            q.to_string(),
            "collection|test|:insert[n|10|,s|fizzbuzz|,b|false|,];"
        );
    }

    #[test]
    fn get_by_link() {
        let link = Value::Link(Link::parse("test", "b2279b93-00b3-4b44-9670-82a76922c0da").unwrap());
        let q = Query::new("test").unwrap().get([link]).unwrap();
        assert_eq!(
            q.to_string(),
            "collection|test|:get[test|b2279b93-00b3-4b44-9670-82a76922c0da|,];"
        );
    }

    #[test]
    fn get_rejects_non_link() {
        let err = Query::new("test").unwrap().get([Value::Null]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn find_with_and_of_two_comparators() {
        let find = Find::and([
            Comparator::gt_field("num", Value::number("5").unwrap()),
            Comparator::lte_field("num", Value::number("50").unwrap()),
        ]);
        let q = Query::new("test").unwrap().find(find).unwrap();
        assert_eq!(
            q.to_string(),
            "collection|test|:find[and[gt{value|num|: n|5|},lte{value|num|: n|50|},],];"
        );
    }

    #[test]
    fn find_sort_limit_offset_pipeline() {
        let q = Query::new("test")
            .unwrap()
            .find(Find::gt(Value::number("5").unwrap()))
            .unwrap()
            .sort(Sort::desc(["a", "b"]))
            .unwrap()
            .limit(6)
            .unwrap()
            .offset(2)
            .unwrap();
        assert_eq!(
            q.to_string(),
            "collection|test|:q[find[gt{root: n|5|},],sort[desc(value|a|),desc(value|b|),],limit(n|6|),offset(n|2|),];"
        );
    }

    #[test]
    fn empty_find_serializes_with_empty_brackets() {
        let q = Query::new("c").unwrap().find(Find::new()).unwrap();
        assert_eq!(q.to_string(), "collection|c|:find[];");
    }

    #[test]
    fn project_follows_get_and_reshapes_fields() {
        let link = Value::Link(Link::parse("test", "b2279b93-00b3-4b44-9670-82a76922c0da").unwrap());
        let q = Query::new("test")
            .unwrap()
            .get([link])
            .unwrap()
            .project([
                ("name".to_string(), Value::keep()),
                ("email".to_string(), Value::field_ref("contact.email")),
            ])
            .unwrap();
        assert_eq!(
            q.to_string(),
            "collection|test|:q[get[test|b2279b93-00b3-4b44-9670-82a76922c0da|,],project{s|name|:keep,s|email|:value|contact.email|,},];"
        );
    }

    #[test]
    fn project_cannot_start_a_pipeline() {
        let err = Query::new("test")
            .unwrap()
            .project([("name".to_string(), Value::keep())])
            .unwrap_err();
        assert!(matches!(err, Error::CannotStartPipeline { .. }));
    }

    #[test]
    fn insert_cannot_follow_anything() {
        let q = Query::new("c")
            .unwrap()
            .find(Find::new())
            .unwrap();
        let err = q.insert([Value::Null]).unwrap_err();
        assert!(matches!(err, Error::PipelineTransition { .. }));
    }

    #[test]
    fn sort_cannot_start_a_pipeline() {
        let err = Query::new("c")
            .unwrap()
            .sort(Sort::asc(["a"]))
            .unwrap_err();
        assert!(matches!(err, Error::CannotStartPipeline { stage: "sort" }));
    }

    #[test]
    fn delete_is_terminal() {
        let q = Query::new("c").unwrap().find(Find::new()).unwrap().delete().unwrap();
        let err = q.limit(1).unwrap_err();
        assert!(matches!(err, Error::PipelineTransition { .. }));
    }

    #[test]
    fn empty_collection_name_rejected() {
        assert!(Query::new("").is_err());
    }
}
