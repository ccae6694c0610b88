use thiserror::Error;

/// Errors raised while constructing or composing the typed data model.
///
/// Parsing and transport failures are not represented here; they live in
/// `tyson_codec::Error`, which wraps this type via `#[from]`.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("expected a value of tag `{expected}`, found `{found}`")]
    InvalidArgument {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{0}` is not a valid numeric conversion target for this value")]
    UnsupportedConversion(&'static str),

    #[error("collection name must not be empty")]
    EmptyCollectionName,

    #[error("`{token}` is not a UUID-shaped token")]
    InvalidLinkId { token: String },

    #[error("cannot start a pipeline with `{stage}`")]
    CannotStartPipeline { stage: &'static str },

    #[error("`{next}` cannot follow `{prev}`")]
    PipelineTransition {
        prev: &'static str,
        next: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
