//! Wire codec for the TySON protocol: parsing responses, encoding
//! queries, and driving a transport through a single request/reply.
//!
//! Typed values and query construction live in `tyson-types`; this crate
//! owns everything that touches wire text.
#![deny(missing_debug_implementations)]

pub mod connection;
pub mod decode;
pub mod encode;
pub mod error;
pub mod response;

#[cfg(test)]
mod testing;

pub use connection::{Connection, Transport};
pub use decode::{decode_value, Decoder, ValueCodec};
pub use encode::{Encoder, QueryCodec};
pub use error::Error;
pub use response::decode_journal;

pub use tyson_types::*;
