#![deny(missing_debug_implementations)]

//! Data model for the TySON document database wire protocol: the tagged
//! `Value` union, the comparator tree used by `find`, the stage/pipeline
//! builder, and the parsed response types (`Journal`, `Meta`,
//! `CollectionView`).
//!
//! Parsing wire text into these types, and encoding a [`query::Query`] for
//! transmission, lives in the `tyson-codec` crate; this crate only knows how
//! to construct, validate, and [`std::fmt::Display`] its own types.

pub mod collection;
pub mod comparator;
pub mod config;
pub mod error;
pub mod journal;
pub mod query;
pub mod stage;
pub mod value;

pub use collection::CollectionView;
pub use comparator::Comparator;
pub use config::Config;
pub use error::{Error, Result};
pub use journal::{Journal, Meta, MetaKind};
pub use query::{Find, Query, Sort};
pub use stage::{SortItem, Stage, UpdateKind, UpdateOp};
pub use value::{Link, Value};
