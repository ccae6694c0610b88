//! Small helpers shared by the `#[cfg(test)]` modules in this crate.

use tyson_types::Value;

use crate::decode::decode_value;
use crate::encode::encode_wire;

/// Asserts that `wire` decodes to `expected`.
pub(crate) fn assert_decodes_to(wire: &str, expected: &Value) {
    let got = decode_value(wire).unwrap_or_else(|e| panic!("failed to decode `{wire}`: {e}"));
    assert_eq!(&got, expected, "decoding `{wire}`");
}

/// Asserts that `value` round-trips through encode then decode unchanged.
pub(crate) fn assert_round_trips(value: &Value) {
    let wire = encode_wire(value);
    let back = decode_value(&wire).unwrap_or_else(|e| panic!("failed to decode `{wire}`: {e}"));
    assert_eq!(&back, value, "round-tripping through `{wire}`");
}
