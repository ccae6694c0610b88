//! Parsing TySON text into [`tyson_types::Value`].
//!
//! The grammar requires bracket-depth tracking wherever a `Vector`/`Map`
//! body is split into its top-level elements; a naive split on `,` would
//! corrupt any input containing a nested `Vector`/`Map`/comparator.

use std::collections::BTreeMap;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    IResult,
};

use tyson_types::{Link, Value};

use crate::error::{Error, TysonErrorKind, TysonParseError};

pub(crate) type TysonResult<'a, O> = IResult<&'a str, O, TysonParseError<'a>>;

/// Splits `input` at every top-level occurrence of `delim`, tracking
/// `[]{}()` bracket depth. A trailing empty split (from the mandatory
/// trailing comma before a closing bracket) is dropped.
pub(crate) fn split_top_level(input: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth -= 1,
            c if c == delim && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    let rest = &input[start..];
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

/// Splits `input` at the first top-level occurrence of `delim`.
pub(crate) fn split_first_top_level(input: &str, delim: char) -> Option<(&str, &str)> {
    let mut depth: i32 = 0;
    for (i, c) in input.char_indices() {
        match c {
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth -= 1,
            c if c == delim && depth == 0 => {
                return Some((&input[..i], &input[i + c.len_utf8()..]));
            }
            _ => {}
        }
    }
    None
}

/// Given `input` starting immediately after an opening bracket already
/// consumed by the caller, returns `(body, remainder)` where `body` is
/// everything up to the matching closing bracket (tracking nested
/// `[]{}()` uniformly, since well-formed TySON never interleaves
/// mismatched pairs) and `remainder` is everything after it.
pub(crate) fn matching_bracket(input: &str) -> TysonResult<'_, &str> {
    let mut depth: i32 = 1;
    for (i, c) in input.char_indices() {
        match c {
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + c.len_utf8()..], &input[..i]));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Failure(TysonParseError {
        input,
        kind: TysonErrorKind::UnbalancedBrackets,
    }))
}

/// Extracts a primitive's body: everything up to (and including
/// consuming) the next `|`. Strings containing a literal `|` are not
/// representable by this grammar; this mirrors the wire format itself,
/// not a parser shortcut.
fn primitive_body(input: &str) -> TysonResult<'_, &str> {
    match input.find('|') {
        Some(pos) => Ok((&input[pos + 1..], &input[..pos])),
        None => Err(nom::Err::Failure(TysonParseError {
            input,
            kind: TysonErrorKind::UnterminatedPrimitive,
        })),
    }
}

fn tag_char(input: &str, c: char) -> TysonResult<'_, char> {
    char::<&str, TysonParseError<'_>>(c)(input)
}

fn value_or_field_ref_or_update(input: &str) -> TysonResult<'_, Value> {
    let (rest, _) = tag("value|")(input)?;
    let (rest, path) = primitive_body(rest)?;
    match tag_char(rest, ':') {
        Ok((rest, _)) => {
            let (rest, value) = tyson_value(rest)?;
            Ok((rest, Value::FieldUpdate(path.to_string(), Box::new(value))))
        }
        Err(_) => Ok((rest, Value::FieldRef(path.to_string()))),
    }
}

fn timestamp(input: &str) -> TysonResult<'_, Value> {
    let (rest, _) = alt((tag("uts"), tag("utc")))(input)?;
    let (rest, _) = tag_char(rest, '|')?;
    let (rest, body) = primitive_body(rest)?;
    Ok((rest, Value::Timestamp(body.to_string())))
}

fn vector(input: &str) -> TysonResult<'_, Value> {
    log::trace!("entering vector parser ({} bytes)", input.len());
    let (rest, _) = tag("v[")(input)?;
    let (rest, body) = matching_bracket(rest)?;
    let items = split_top_level(body, ',')
        .into_iter()
        .map(parse_complete)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| nom::Err::Failure(TysonParseError {
            input: body,
            kind: e,
        }))?;
    Ok((rest, Value::Vector(items)))
}

fn map(input: &str) -> TysonResult<'_, Value> {
    log::trace!("entering map parser ({} bytes)", input.len());
    let (rest, _) = tag("m{")(input)?;
    let (rest, body) = matching_bracket(rest)?;
    let mut out = BTreeMap::new();
    for entry in split_top_level(body, ',') {
        let (key_text, value_text) = split_first_top_level(entry, ':').ok_or(nom::Err::Failure(
            TysonParseError {
                input: entry,
                kind: TysonErrorKind::MissingColon,
            },
        ))?;
        // Map keys are themselves wire-encoded `Value`s (in practice `String`).
        let key = parse_complete(key_text)
            .ok()
            .and_then(|v| v.as_str().ok().map(str::to_string))
            .ok_or(nom::Err::Failure(TysonParseError {
                input: key_text,
                kind: TysonErrorKind::UnknownTag,
            }))?;
        let value = parse_complete(value_text).map_err(|kind| {
            nom::Err::Failure(TysonParseError {
                input: value_text,
                kind,
            })
        })?;
        out.entry(key).or_insert(value);
    }
    Ok((rest, Value::Map(out)))
}

fn primitive(input: &str) -> TysonResult<'_, Value> {
    let pipe_pos = input.find('|').ok_or(nom::Err::Failure(TysonParseError {
        input,
        kind: TysonErrorKind::UnknownTag,
    }))?;
    let tag_str = &input[..pipe_pos];
    let rest = &input[pipe_pos + 1..];
    match tag_str {
        "n" => {
            let (rest, body) = primitive_body(rest)?;
            tyson_types::Value::verify_number(body).map_err(|_| {
                nom::Err::Failure(TysonParseError {
                    input: body,
                    kind: TysonErrorKind::BadNumber {
                        detail: "not a decimal literal".to_string(),
                    },
                })
            })?;
            Ok((rest, Value::Number(body.to_string())))
        }
        "s" => {
            let (rest, body) = primitive_body(rest)?;
            Ok((rest, Value::String(body.to_string())))
        }
        "b" => {
            let (rest, body) = primitive_body(rest)?;
            Ok((rest, Value::Bool(body == "true")))
        }
        "" => Err(nom::Err::Failure(TysonParseError {
            input,
            kind: TysonErrorKind::UnknownTag,
        })),
        collection => {
            let (rest, id) = primitive_body(rest)?;
            let link = Link::parse(collection, id).map_err(|e| {
                nom::Err::Failure(TysonParseError {
                    input: id,
                    kind: TysonErrorKind::BadLink {
                        detail: e.to_string(),
                    },
                })
            })?;
            Ok((rest, Value::Link(link)))
        }
    }
}

/// `true` if `rest` is empty or starts with a character that can follow a
/// complete top-level value (a delimiter or closing bracket). Used to tell
/// a bare `null`/`keep` token apart from the prefix of a longer token, e.g.
/// a `Link` whose collection is named `"nullable"` or `"keeper"`.
fn token_boundary(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => matches!(c, ',' | ']' | '}' | ')' | ';'),
    }
}

/// Parses one TySON value from the front of `input`, returning the
/// unconsumed remainder. Dispatch follows §4.1: `null`, `keep`,
/// `uts`/`utc` timestamp, `v[`, `m{`, `value|`, else a tag-delimited
/// primitive or link.
pub fn tyson_value(input: &str) -> TysonResult<'_, Value> {
    if let Some(rest) = input.strip_prefix("null") {
        if token_boundary(rest) {
            return Ok((rest, Value::Null));
        }
    }
    if let Some(rest) = input.strip_prefix("keep") {
        if token_boundary(rest) {
            return Ok((rest, Value::Keep));
        }
    }
    if input.starts_with("uts") || input.starts_with("utc") {
        return timestamp(input);
    }
    if input.starts_with("v[") {
        return vector(input);
    }
    if input.starts_with("m{") {
        return map(input);
    }
    if input.starts_with("value|") {
        return value_or_field_ref_or_update(input);
    }
    primitive(input)
}

fn parse_complete(input: &str) -> std::result::Result<Value, TysonErrorKind> {
    let input = input.trim();
    match tyson_value(input) {
        Ok((rest, value)) if rest.is_empty() => Ok(value),
        Ok(_) => Err(TysonErrorKind::UnexpectedTrailingInput),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.kind),
        Err(nom::Err::Incomplete(_)) => Err(TysonErrorKind::UnterminatedPrimitive),
    }
}

/// A parser/encoder pair for one message kind, mirroring the
/// `Decoder`/`Encoder` split used throughout this crate.
pub trait Decoder {
    type Message<'a>;

    fn decode<'a>(&self, input: &'a str) -> crate::error::Result<(&'a str, Self::Message<'a>)>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ValueCodec;

impl Decoder for ValueCodec {
    type Message<'a> = Value;

    fn decode<'a>(&self, input: &'a str) -> crate::error::Result<(&'a str, Value)> {
        log::trace!("decoding value from {} bytes", input.len());
        tyson_value(input).map_err(|e| {
            let offset = match &e {
                nom::Err::Error(inner) | nom::Err::Failure(inner) => {
                    input.len().saturating_sub(inner.input.len())
                }
                nom::Err::Incomplete(_) => input.len(),
            };
            log::debug!("value decode failed at byte {offset}: {e:?}");
            Error::from(e)
        })
    }
}

/// Parses `input` as a single, complete TySON value (no trailing bytes).
pub fn decode_value(input: &str) -> crate::error::Result<Value> {
    let (rest, value) = ValueCodec.decode(input.trim())?;
    if !rest.is_empty() {
        return Err(Error::parse(rest, "unexpected trailing input"));
    }
    Ok(value)
}
