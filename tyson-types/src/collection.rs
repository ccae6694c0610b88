#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::{Link, Value};

/// A view over a parsed response's data section.
///
/// Exactly one of `ids`/`objects` is non-empty for any given response: the
/// server answers `get`/`find` with either an `ids[...]` or an
/// `objects{...}` shape, never both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollectionView {
    #[default]
    Empty,
    Ids(Vec<Link>),
    Objects(Vec<(Link, Value)>),
}

impl CollectionView {
    pub fn ids(&self, collection: &str) -> Vec<&Link> {
        match self {
            CollectionView::Ids(ids) => ids
                .iter()
                .filter(|link| link.collection() == collection)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn id(&self, id: Uuid) -> Option<&Link> {
        match self {
            CollectionView::Ids(ids) => ids.iter().find(|link| link.id() == id),
            _ => None,
        }
    }

    pub fn id_in(&self, collection: &str, id: Uuid) -> Option<&Link> {
        match self {
            CollectionView::Ids(ids) => ids
                .iter()
                .find(|link| link.collection() == collection && link.id() == id),
            _ => None,
        }
    }

    pub fn objects(&self, collection: &str) -> Vec<&(Link, Value)> {
        match self {
            CollectionView::Objects(objects) => objects
                .iter()
                .filter(|(link, _)| link.collection() == collection)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn object(&self, id: Uuid) -> Option<&(Link, Value)> {
        match self {
            CollectionView::Objects(objects) => objects.iter().find(|(link, _)| link.id() == id),
            _ => None,
        }
    }

    pub fn object_in(&self, collection: &str, id: Uuid) -> Option<&(Link, Value)> {
        match self {
            CollectionView::Objects(objects) => objects
                .iter()
                .find(|(link, _)| link.collection() == collection && link.id() == id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(collection: &str, id: &str) -> Link {
        Link::parse(collection, id).unwrap()
    }

    #[test]
    fn objects_filters_by_collection_preserving_order() {
        let view = CollectionView::Objects(vec![
            (
                link("a", "4339ace2-9ab3-4c79-b557-f9b78d66b7f9"),
                Value::Null,
            ),
            (
                link("b", "b2279b93-00b3-4b44-9670-82a76922c0da"),
                Value::Null,
            ),
            (
                link("a", "00000000-0000-0000-0000-000000000001"),
                Value::Null,
            ),
        ]);

        let a_objects = view.objects("a");
        assert_eq!(a_objects.len(), 2);
        assert_eq!(a_objects[0].0.id().to_string(), "4339ace2-9ab3-4c79-b557-f9b78d66b7f9");
        assert_eq!(a_objects[1].0.id().to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn ids_lookup_by_collection_and_uuid() {
        let uuid: Uuid = "4339ace2-9ab3-4c79-b557-f9b78d66b7f9".parse().unwrap();
        let view = CollectionView::Ids(vec![link("test", "4339ace2-9ab3-4c79-b557-f9b78d66b7f9")]);

        assert!(view.id(uuid).is_some());
        assert!(view.id_in("test", uuid).is_some());
        assert!(view.id_in("other", uuid).is_none());
    }
}
