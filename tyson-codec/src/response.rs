//! Splitting and parsing the server's response envelope into a
//! [`tyson_types::Journal`].
//!
//! `result:<ok|err>[response{s|data|:<data>,s|meta|:<meta>,},];`
//!
//! The split between the data and meta sections, and the end of the
//! envelope, is located by walking bracket depth from the `response{`
//! opening rather than by searching for a literal `,}]` suffix: the
//! latter mislocates the end whenever the meta section's own map body
//! happens to contain that substring.

use tyson_types::{CollectionView, Journal, Link, Meta, MetaKind, Value};

use crate::decode::{decode_value, matching_bracket, split_first_top_level, split_top_level};
use crate::error::Error;

/// Parses one complete response envelope.
pub fn decode_journal(input: &str) -> crate::error::Result<Journal> {
    let input = input.trim();
    log::debug!("decoding response envelope ({} bytes)", input.len());

    let bracket_pos = input
        .find('[')
        .ok_or_else(|| Error::parse(input, "missing `[` after result word"))?;
    let ok = input[..bracket_pos].contains("ok");

    let after_bracket = &input[bracket_pos + 1..];
    let after_response_tag = after_bracket
        .strip_prefix("response{")
        .ok_or_else(|| Error::parse(after_bracket, "missing `response{`"))?;
    let (_, body) = matching_bracket(after_response_tag)?;

    let mut data_section: Option<CollectionView> = None;
    let mut meta_section: Option<Meta> = None;

    for entry in split_top_level(body, ',') {
        let (key, value_text) = split_first_top_level(entry, ':')
            .ok_or_else(|| Error::parse(entry, "missing `:` in response entry"))?;
        match key {
            "s|data|" => data_section = Some(decode_data_section(value_text)?),
            "s|meta|" => meta_section = Some(decode_meta_section(value_text)?),
            other => log::debug!("ignoring unknown response entry key `{other}`"),
        }
    }

    if !ok {
        log::warn!("response reported ok=false");
    }

    let data = data_section.ok_or_else(|| Error::parse(body, "response is missing a data section"))?;
    let meta = meta_section.ok_or_else(|| Error::parse(body, "response is missing a meta section"))?;

    Ok(Journal::new(ok, data, meta))
}

fn decode_link_token(text: &str) -> crate::error::Result<Link> {
    match decode_value(text.trim())? {
        Value::Link(link) => Ok(link),
        other => Err(Error::parse(
            text,
            format!("expected a Link, found {}", other.tag_name()),
        )),
    }
}

fn decode_data_section(text: &str) -> crate::error::Result<CollectionView> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix("objects{") {
        let (_, body) = matching_bracket(rest)?;
        let mut objects = Vec::new();
        for entry in split_top_level(body, ',') {
            let (link_text, value_text) = split_first_top_level(entry, ':')
                .ok_or_else(|| Error::parse(entry, "object entry is missing `:`"))?;
            objects.push((decode_link_token(link_text)?, decode_value(value_text.trim())?));
        }
        Ok(CollectionView::Objects(objects))
    } else if let Some(rest) = text.strip_prefix("ids[") {
        let (_, body) = matching_bracket(rest)?;
        let ids = split_top_level(body, ',')
            .into_iter()
            .map(decode_link_token)
            .collect::<crate::error::Result<Vec<_>>>()?;
        Ok(CollectionView::Ids(ids))
    } else {
        Err(Error::parse(
            text,
            "data section is neither `objects{...}` nor `ids[...]`",
        ))
    }
}

fn decode_meta_section(text: &str) -> crate::error::Result<Meta> {
    let text = text.trim();
    let brace_pos = text
        .find('{')
        .ok_or_else(|| Error::parse(text, "meta section is missing `{`"))?;
    let kind = MetaKind::from_wire_token(&text[..brace_pos]);
    let map_wire = format!("m{}", &text[brace_pos..]);
    let payload = decode_value(&map_wire)?;
    Ok(Meta::new(kind, payload)?)
}
