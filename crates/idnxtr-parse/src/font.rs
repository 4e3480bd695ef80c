//! Font-aware string decoding.
//!
//! A shown string is a sequence of character codes, not text. Codes are
//! turned into Unicode through the font's `/ToUnicode` CMap when it has one,
//! and otherwise through its `/Encoding`: composite (Type0) fonts use
//! two-byte codes, simple fonts one byte per code with an optional
//! `/Differences` overlay on a base encoding.

use std::collections::HashMap;

use crate::content::decode_pdf_string;
use crate::lopdf_backend::{resolve, stream_bytes};

/// Parsed `/ToUnicode` CMap: character code to Unicode string.
///
/// Only the `bfchar` and `bfrange` sections are read; values are UTF-16BE
/// hex strings and may map one code to several characters (ligatures).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToUnicode {
    mappings: HashMap<u32, String>,
}

impl ToUnicode {
    /// Parse CMap program text. Malformed entries are skipped.
    pub fn parse(data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            for line in section.lines() {
                if let [src, dst, ..] = hex_tokens(line).as_slice() {
                    if let (Some(code), Some(value)) = (hex_code(src), utf16be_hex(dst)) {
                        mappings.insert(code, value);
                    }
                }
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            for line in section.lines() {
                parse_bfrange_line(line, &mut mappings);
            }
        }

        Self { mappings }
    }

    /// Unicode text of a code, if mapped.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Bodies between each `begin`/`end` keyword pair.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        let Some(stop) = body.find(end) else {
            break;
        };
        found.push(&body[..stop]);
        rest = &body[stop + end.len()..];
    }
    found
}

fn hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start + 1..].find('>') else {
            break;
        };
        tokens.push(&rest[start + 1..start + 1 + len]);
        rest = &rest[start + len + 2..];
    }
    tokens
}

fn hex_code(hex: &str) -> Option<u32> {
    u32::from_str_radix(hex.trim(), 16).ok()
}

/// Decode UTF-16BE code units written as hex digits.
fn utf16be_hex(hex: &str) -> Option<String> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = if digits.len() == 2 {
        format!("00{digits}")
    } else {
        digits
    };
    if digits.is_empty() || digits.len() % 4 != 0 {
        return None;
    }
    let units = digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| u16::from_str_radix(std::str::from_utf8(chunk).ok()?, 16).ok())
        .collect::<Option<Vec<u16>>>()?;
    String::from_utf16(&units).ok()
}

/// `<lo> <hi> <dst>` or `<lo> <hi> [<dst1> <dst2> ...]`.
fn parse_bfrange_line(line: &str, mappings: &mut HashMap<u32, String>) {
    if let Some(bracket) = line.find('[') {
        let (head, tail) = line.split_at(bracket);
        let (Some(lo), Some(hi)) = (
            hex_tokens(head).first().and_then(|t| hex_code(t)),
            hex_tokens(head).get(1).and_then(|t| hex_code(t)),
        ) else {
            return;
        };
        for (code, dst) in (lo..=hi).zip(hex_tokens(tail)) {
            if let Some(value) = utf16be_hex(dst) {
                mappings.insert(code, value);
            }
        }
        return;
    }

    let tokens = hex_tokens(line);
    let [lo, hi, dst, ..] = tokens.as_slice() else {
        return;
    };
    let (Some(lo), Some(hi), Some(dst)) = (hex_code(lo), hex_code(hi), utf16be_hex(dst)) else {
        return;
    };
    if hi < lo || hi - lo > 0xFFFF {
        return;
    }
    // The last UTF-16 unit is incremented across the range.
    let mut units: Vec<u16> = dst.encode_utf16().collect();
    let Some(last) = units.pop() else {
        return;
    };
    for offset in 0..=(hi - lo) {
        let Some(unit) = u16::try_from(u32::from(last) + offset).ok() else {
            break;
        };
        units.push(unit);
        if let Ok(value) = String::from_utf16(&units) {
            mappings.insert(lo + offset, value);
        }
        units.pop();
    }
}

/// Single-byte base encoding of a simple font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseEncoding {
    #[default]
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"WinAnsiEncoding" | b"StandardEncoding" => Some(BaseEncoding::WinAnsi),
            b"MacRomanEncoding" => Some(BaseEncoding::MacRoman),
            _ => None,
        }
    }

    fn decode_byte(self, byte: u8) -> char {
        let encoding = match self {
            BaseEncoding::WinAnsi => encoding_rs::WINDOWS_1252,
            BaseEncoding::MacRoman => encoding_rs::MACINTOSH,
        };
        encoding
            .decode_without_bom_handling(&[byte])
            .0
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// Turns the bytes of a shown string into text for one font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDecoder {
    /// Bytes per character code: 2 for composite fonts, 1 otherwise.
    code_width: usize,
    to_unicode: Option<ToUnicode>,
    base: BaseEncoding,
    differences: HashMap<u8, char>,
}

impl Default for FontDecoder {
    fn default() -> Self {
        Self::simple(BaseEncoding::default(), HashMap::new())
    }
}

impl FontDecoder {
    /// A simple font with a base encoding and `/Differences` overlay.
    pub fn simple(base: BaseEncoding, differences: HashMap<u8, char>) -> Self {
        Self {
            code_width: 1,
            base,
            differences,
            to_unicode: None,
        }
    }

    /// A composite font with two-byte codes.
    pub fn composite() -> Self {
        Self {
            code_width: 2,
            ..Self::default()
        }
    }

    pub fn with_to_unicode(mut self, to_unicode: ToUnicode) -> Self {
        self.to_unicode = Some(to_unicode);
        self
    }

    pub fn is_composite(&self) -> bool {
        self.code_width == 2
    }

    /// Build a decoder from a font dictionary.
    pub fn from_dict(doc: &lopdf::Document, font: &lopdf::Dictionary) -> Self {
        let subtype = font.get(b"Subtype").and_then(|o| o.as_name()).unwrap_or(b"");
        let mut decoder = if subtype == b"Type0" {
            Self::composite()
        } else {
            let (base, differences) = simple_encoding(doc, font);
            Self::simple(base, differences)
        };

        let to_unicode = font.get(b"ToUnicode").map(|o| resolve(doc, o));
        if let Ok(lopdf::Object::Stream(stream)) = to_unicode {
            let cmap = ToUnicode::parse(&stream_bytes(stream));
            if !cmap.is_empty() {
                decoder.to_unicode = Some(cmap);
            }
        }
        decoder
    }

    /// Decode the raw bytes of a `Tj`/`TJ` string.
    pub fn decode(&self, bytes: &[u8]) -> String {
        if self.code_width == 1 && self.to_unicode.is_none() && self.differences.is_empty() {
            return match self.base {
                BaseEncoding::WinAnsi => decode_pdf_string(bytes),
                BaseEncoding::MacRoman => bytes.iter().map(|&b| self.base.decode_byte(b)).collect(),
            };
        }

        let width = self.code_width;
        let mut text = String::new();
        // A trailing partial code is dropped.
        for chunk in bytes.chunks_exact(width) {
            let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
            if let Some(mapped) = self.to_unicode.as_ref().and_then(|m| m.lookup(code)) {
                text.push_str(mapped);
            } else if width == 2 {
                text.push(
                    char::from_u32(code)
                        .filter(|c| !c.is_control())
                        .unwrap_or(char::REPLACEMENT_CHARACTER),
                );
            } else {
                let byte = chunk[0];
                text.push(
                    self.differences
                        .get(&byte)
                        .copied()
                        .unwrap_or_else(|| self.base.decode_byte(byte)),
                );
            }
        }
        text
    }
}

fn simple_encoding(
    doc: &lopdf::Document,
    font: &lopdf::Dictionary,
) -> (BaseEncoding, HashMap<u8, char>) {
    let Ok(encoding) = font.get(b"Encoding") else {
        return (BaseEncoding::default(), HashMap::new());
    };
    match resolve(doc, encoding) {
        lopdf::Object::Name(name) => (
            BaseEncoding::from_name(name).unwrap_or_default(),
            HashMap::new(),
        ),
        lopdf::Object::Dictionary(dict) => {
            let base = dict
                .get(b"BaseEncoding")
                .and_then(|o| o.as_name())
                .ok()
                .and_then(BaseEncoding::from_name)
                .unwrap_or_default();
            let differences = match dict.get(b"Differences").map(|o| resolve(doc, o)) {
                Ok(lopdf::Object::Array(items)) => parse_differences(items),
                _ => HashMap::new(),
            };
            (base, differences)
        }
        _ => (BaseEncoding::default(), HashMap::new()),
    }
}

/// `[code /name /name ... code /name ...]`: each number starts a run of
/// consecutive codes.
fn parse_differences(items: &[lopdf::Object]) -> HashMap<u8, char> {
    let mut differences = HashMap::new();
    let mut code: Option<u32> = None;
    for item in items {
        match item {
            lopdf::Object::Integer(start) => code = u32::try_from(*start).ok(),
            lopdf::Object::Name(name) => {
                if let Some(current) = code {
                    if let (Ok(byte), Some(ch)) = (
                        u8::try_from(current),
                        glyph_name_to_char(&String::from_utf8_lossy(name)),
                    ) {
                        differences.insert(byte, ch);
                    }
                    code = Some(current + 1);
                }
            }
            _ => {}
        }
    }
    differences
}

/// Unicode character of an Adobe glyph name. Covers `uniXXXX`, `uXXXX`,
/// single ASCII letters and the names used for digits, punctuation and the
/// Latin-1 letters found in Indonesian place names.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let hex = name.strip_prefix("uni").or_else(|| name.strip_prefix('u'));
    if let Some(code) = hex
        .filter(|hex| (4..=6).contains(&hex.len()))
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
    {
        return char::from_u32(code);
    }

    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            return Some(ch);
        }
    }

    let ch = match name {
        "space" | "nbspace" => ' ',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "period" => '.',
        "comma" => ',',
        "colon" => ':',
        "semicolon" => ';',
        "hyphen" | "minus" => '-',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "slash" => '/',
        "backslash" => '\\',
        "parenleft" => '(',
        "parenright" => ')',
        "bracketleft" => '[',
        "bracketright" => ']',
        "quotesingle" => '\'',
        "quoteright" => '\u{2019}',
        "quoteleft" => '\u{2018}',
        "quotedbl" => '"',
        "quotedblleft" => '\u{201C}',
        "quotedblright" => '\u{201D}',
        "degree" => '°',
        "ampersand" => '&',
        "percent" => '%',
        "numbersign" => '#',
        "asterisk" => '*',
        "plus" => '+',
        "equal" => '=',
        "underscore" => '_',
        "exclam" => '!',
        "question" => '?',
        "at" => '@',
        "eacute" => 'é',
        "egrave" => 'è',
        "Eacute" => 'É',
        "Egrave" => 'È',
        "aacute" => 'á',
        "agrave" => 'à',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "iacute" => 'í',
        "ntilde" => 'ñ',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMAP: &[u8] = b"/CIDInit /ProcSet findresource begin
begincmap
1 begincodespacerange <0000> <FFFF> endcodespacerange
2 beginbfchar
<0003> <002E>
<0010> <00660069>
endbfchar
2 beginbfrange
<0001> <0002> <0031>
<0020> <0022> [<0041> <0042> <0043>]
endbfrange
endcmap";

    #[test]
    fn bfchar_and_bfrange() {
        let cmap = ToUnicode::parse(CMAP);
        assert_eq!(cmap.lookup(0x0001), Some("1"));
        assert_eq!(cmap.lookup(0x0002), Some("2"));
        assert_eq!(cmap.lookup(0x0003), Some("."));
        assert_eq!(cmap.lookup(0x0010), Some("fi"));
        assert_eq!(cmap.lookup(0x0021), Some("B"));
        assert_eq!(cmap.lookup(0x0099), None);
        assert_eq!(cmap.len(), 7);
    }

    #[test]
    fn malformed_cmap_is_empty() {
        assert!(ToUnicode::parse(b"beginbfchar <zz> <0041> endbfchar").is_empty());
        assert!(ToUnicode::parse(b"garbage").is_empty());
    }

    #[test]
    fn composite_codes_are_two_bytes() {
        let decoder = FontDecoder::composite().with_to_unicode(ToUnicode::parse(CMAP));
        assert!(decoder.is_composite());
        assert_eq!(decoder.decode(&[0x00, 0x01, 0x00, 0x03, 0x00, 0x02]), "1.2");
        // Unmapped codes fall back to the code point, odd trailing byte dropped.
        assert_eq!(decoder.decode(&[0x00, 0x41, 0x00]), "A");
    }

    #[test]
    fn differences_override_base_encoding() {
        let differences = parse_differences(&[
            lopdf::Object::Integer(65),
            lopdf::Object::Name(b"one".to_vec()),
            lopdf::Object::Name(b"period".to_vec()),
            lopdf::Object::Integer(200),
            lopdf::Object::Name(b"uni00B0".to_vec()),
        ]);
        let decoder = FontDecoder::simple(BaseEncoding::WinAnsi, differences);
        assert_eq!(decoder.decode(b"AB1C\xC8"), "1.1C°");
    }

    #[test]
    fn plain_simple_font_is_winansi() {
        let decoder = FontDecoder::default();
        assert_eq!(decoder.decode(b"01\xB012"), "01°12");
    }

    #[test]
    fn mac_roman_base() {
        let decoder = FontDecoder::simple(BaseEncoding::MacRoman, HashMap::new());
        assert_eq!(decoder.decode(b"Kab\x8e"), "Kabé");
    }

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_char("uni0041"), Some('A'));
        assert_eq!(glyph_name_to_char("u1F600"), Some('😀'));
        assert_eq!(glyph_name_to_char("g"), Some('g'));
        assert_eq!(glyph_name_to_char("seven"), Some('7'));
        assert_eq!(glyph_name_to_char("g123"), None);
    }
}
