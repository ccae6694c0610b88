use nom::error::{ErrorKind, FromExternalError, ParseError as NomParseError};
use thiserror::Error;

/// The nom-facing parse error, carrying the offending slice and a reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TysonParseError<'a> {
    pub input: &'a str,
    pub kind: TysonErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TysonErrorKind {
    UnknownTag,
    UnterminatedPrimitive,
    UnbalancedBrackets,
    BadNumber { detail: String },
    BadLink { detail: String },
    MissingColon,
    UnexpectedTrailingInput,
    Nom(ErrorKind),
}

impl<'a> NomParseError<&'a str> for TysonParseError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: TysonErrorKind::Nom(kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> FromExternalError<&'a str, std::num::ParseIntError> for TysonParseError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, e: std::num::ParseIntError) -> Self {
        Self {
            input,
            kind: TysonErrorKind::BadNumber {
                detail: e.to_string(),
            },
        }
    }
}

/// The crate-level error type surfaced to callers of `tyson-codec`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Types(#[from] tyson_types::Error),

    #[error("malformed TySON near `{excerpt}`: {detail}")]
    Parse { excerpt: String, detail: String },
}

impl Error {
    pub(crate) fn parse(input: &str, detail: impl Into<String>) -> Self {
        let excerpt: String = input.chars().take(32).collect();
        Error::Parse {
            excerpt,
            detail: detail.into(),
        }
    }
}

impl<'a> From<TysonParseError<'a>> for Error {
    fn from(e: TysonParseError<'a>) -> Self {
        let detail = match &e.kind {
            TysonErrorKind::UnknownTag => "unknown type tag".to_string(),
            TysonErrorKind::UnterminatedPrimitive => "primitive is missing its closing `|`".to_string(),
            TysonErrorKind::UnbalancedBrackets => "unbalanced brackets".to_string(),
            TysonErrorKind::BadNumber { detail } => format!("bad number: {detail}"),
            TysonErrorKind::BadLink { detail } => format!("bad link: {detail}"),
            TysonErrorKind::MissingColon => "map entry is missing its `:`".to_string(),
            TysonErrorKind::UnexpectedTrailingInput => "unexpected trailing input".to_string(),
            TysonErrorKind::Nom(kind) => format!("{kind:?}"),
        };
        Error::parse(e.input, detail)
    }
}

impl<'a> From<nom::Err<TysonParseError<'a>>> for Error {
    fn from(e: nom::Err<TysonParseError<'a>>) -> Self {
        match e {
            nom::Err::Incomplete(_) => Error::parse("", "incomplete input"),
            nom::Err::Error(e) | nom::Err::Failure(e) => e.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
