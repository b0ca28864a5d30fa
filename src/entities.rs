//! HTML character reference decoding, following the HTML standard's rules for
//! text outside of tags: semicolon-less legacy names, the Windows-1252 remap
//! of C1 references, and U+FFFD for null, surrogate and out-of-range values.

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Names the standard still recognises without a trailing `;`.
const LEGACY_NAMES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 meaning of numeric references 0x80..=0x9F.
const C1_REMAP: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

#[derive(Debug, Clone)]
pub struct EntityDecoder {
    reference: Regex,
}

impl EntityDecoder {
    pub fn new() -> Result<Self> {
        let reference = Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)")
            .context("failed to compile character reference pattern")?;
        Ok(Self { reference })
    }

    /// Unescape every character reference in `encoded`. Unknown names are kept as-is.
    pub fn decode<'a>(&self, encoded: &'a str) -> Cow<'a, str> {
        if !encoded.contains('&') {
            return Cow::Borrowed(encoded);
        }
        self.reference.replace_all(encoded, |caps: &Captures| expand(&caps[1]))
    }
}

fn expand(reference: &str) -> String {
    match reference.strip_prefix('#') {
        Some(number) => numeric(number).map(String::from).unwrap_or_default(),
        None => named(reference),
    }
}

fn numeric(number: &str) -> Option<char> {
    let number = number.trim_end_matches(';');
    let value = match number.strip_prefix(&['x', 'X'][..]) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    }
    // only overflow can fail here; treat it as out of range
    .unwrap_or(u32::MAX);

    match value {
        0x00 => Some('\u{FFFD}'),
        0x0D => Some('\r'),
        0x80..=0x9F => Some(C1_REMAP[(value - 0x80) as usize]),
        0xD800..=0xDFFF | 0x11_0000..=u32::MAX => Some('\u{FFFD}'),
        // noncharacters and disallowed controls are dropped
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => None,
        v if v & 0xFFFE == 0xFFFE => None,
        v => Some(char::from_u32(v).unwrap_or('\u{FFFD}')),
    }
}

fn named(reference: &str) -> String {
    let exact = match reference.strip_suffix(';') {
        Some(name) => lookup(name),
        None if LEGACY_NAMES.contains(&reference) => lookup(reference),
        None => None,
    };
    if let Some(value) = exact {
        return value.to_string();
    }
    // longest legacy prefix wins, e.g. `&notit;` -> `¬it;`
    for end in (2..reference.len()).rev() {
        if !reference.is_char_boundary(end) { continue; }
        let prefix = &reference[..end];
        if LEGACY_NAMES.contains(&prefix) {
            if let Some(value) = lookup(prefix) {
                return format!("{}{}", value, &reference[end..]);
            }
        }
    }
    format!("&{}", reference)
}

fn lookup(name: &str) -> Option<&'static str> {
    let table = &html_escape::NAMED_ENTITIES;
    table
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name.as_bytes()))
        .ok()
        .map(|i| table[i].1)
}

/// One-shot helper for callers that do not keep a decoder around.
pub fn unescape(encoded: &str) -> Result<Cow<'_, str>> {
    Ok(EntityDecoder::new()?.decode(encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn un(s: &str) -> String {
        unescape(s).unwrap().into_owned()
    }

    #[test]
    fn decodes_quotes_and_ampersands() {
        assert_eq!(un("{&quot;a&quot;:&quot;x &amp; y&quot;}"), r#"{"a":"x & y"}"#);
    }

    #[test]
    fn decodes_apostrophe_forms() {
        assert_eq!(un("it&#039;s"), "it's");
        assert_eq!(un("it&apos;s"), "it's");
        assert_eq!(un("it&#x27;s"), "it's");
    }

    #[test]
    fn decodes_named_entities_beyond_xml() {
        assert_eq!(un("caf&eacute; &lt;b&gt;"), "café <b>");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(un(r#"{"already":"json"}"#), r#"{"already":"json"}"#);
    }

    #[test]
    fn legacy_names_without_semicolon() {
        assert_eq!(un("&quot"), "\"");
        assert_eq!(un("a &amp b"), "a & b");
        assert_eq!(un("&notit;"), "¬it;");
        assert_eq!(un("&ampfoo"), "&foo");
        // not a legacy name, so it needs its semicolon
        assert_eq!(un("&apos"), "&apos");
    }

    #[test]
    fn numeric_without_semicolon() {
        assert_eq!(un("it&#39s"), "it's");
        assert_eq!(un("&#x41&#66"), "AB");
    }

    #[test]
    fn invalid_numbers_become_replacement_char() {
        assert_eq!(un("&#0;"), "\u{FFFD}");
        assert_eq!(un("&#x110000;"), "\u{FFFD}");
        assert_eq!(un("&#xD800;"), "\u{FFFD}");
        assert_eq!(un("&#99999999999;"), "\u{FFFD}");
    }

    #[test]
    fn c1_references_use_windows_1252() {
        assert_eq!(un("&#x80;"), "€");
        assert_eq!(un("&#150;"), "\u{2013}");
        assert_eq!(un("&#x81;"), "\u{81}");
    }

    #[test]
    fn disallowed_code_points_are_dropped() {
        assert_eq!(un("a&#1;b&#xFFFF;c&#x7f;d"), "abcd");
        assert_eq!(un("&#13;"), "\r");
    }

    #[test]
    fn unknown_names_are_kept() {
        assert_eq!(un("&bogus; & &#;"), "&bogus; & &#;");
    }

    #[test]
    fn semicolonless_quoting_yields_json() {
        assert_eq!(un("{&quotdata&quot:[1]}"), r#"{"data":[1]}"#);
    }
}
