//! Encoding typed values back to TySON wire text.
//!
//! Serialization itself is owned by `tyson_types` (each type implements
//! [`std::fmt::Display`] producing its exact wire form); this module only
//! supplies the `Encoder` trait so callers reach for the same
//! `Decoder`/`Encoder` pairing used throughout the crate.

use std::fmt;

use tyson_types::Query;

pub trait Encoder {
    type Message<'a>
    where
        Self: 'a;

    fn encode(&self, message: &Self::Message<'_>) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCodec;

impl Encoder for QueryCodec {
    type Message<'a> = Query;

    fn encode(&self, message: &Query) -> String {
        message.to_string()
    }
}

/// Encodes anything that implements [`fmt::Display`] per the wire grammar.
/// Used by [`crate::connection::Connection::send`].
pub(crate) fn encode_wire(value: &impl fmt::Display) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyson_types::Value;

    #[test]
    fn query_codec_encodes_via_display() {
        let query = Query::new("test").unwrap().insert([Value::number("10").unwrap()]).unwrap();
        assert_eq!(QueryCodec.encode(&query), "collection|test|:insert[n|10|,];");
    }
}
