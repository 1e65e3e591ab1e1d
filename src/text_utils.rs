use std::borrow::Cow;
use std::ops::Index;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str) -> Option<T> {
    num_str.parse::<T>().ok()
}

/// Takes the calendar date written in an ISO-8601 timestamp.
///
/// Only the `YYYY-MM-DD` prefix is read, so `2024-01-05T23:30:00-05:00` is the 5th of January
/// no matter which timezone renders it.
pub fn parse_created_date(buf: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})").unwrap();
    }

    let caps = DATE_REGEX.captures(buf)?;
    let y: i32 = to_int(caps.index(1))?;
    let m: u32 = to_int(caps.index(2))?;
    let d: u32 = to_int(caps.index(3))?;

    NaiveDate::from_ymd_opt(y, m, d)
}

/// US English long form, e.g. "January 5, 2024"
pub fn format_display_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn display_date_from_timestamp(created_at: &str) -> Option<String> {
    parse_created_date(created_at).map(|d| format_display_date(&d))
}

/// Checks whether the text reads like a "Month D, YYYY" date.
pub fn is_display_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text.trim(), "%B %d, %Y").is_ok()
}

/// Trims and drops blank values.
pub fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Collapses runs of whitespace (including non-breaking spaces) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|x| !x.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Named references rich text editors write besides the XML ones.
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("nbsp", "\u{a0}"),
    ("bull", "\u{2022}"),
    ("middot", "\u{b7}"),
    ("ndash", "\u{2013}"),
    ("mdash", "\u{2014}"),
    ("hellip", "\u{2026}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201c}"),
    ("rdquo", "\u{201d}"),
    ("copy", "\u{a9}"),
];

fn resolve_entity(name: &str) -> Option<&'static str> {
    quick_xml::escape::resolve_predefined_entity(name).or_else(|| {
        HTML_ENTITIES.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    })
}

/// Decodes character references in a text node.
///
/// Unknown references or a stray '&' make the decoder give up, and the text is then kept as written.
pub fn decode_entities(text: &str) -> Cow<str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    match quick_xml::escape::unescape_with(text, resolve_entity) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(text),
    }
}
