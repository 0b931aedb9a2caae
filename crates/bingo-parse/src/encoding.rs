//! Single-byte font encodings.
//!
//! Covers what simple Type1/TrueType fonts in generated documents use:
//! WinAnsiEncoding, StandardEncoding and /Differences overrides. Codes with
//! no specific mapping fall back to Latin-1.

/// Named base encoding of a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    #[default]
    WinAnsi,
    Standard,
    /// Anything else: bytes read as Latin-1.
    Latin1,
}

impl BaseEncoding {
    /// Encoding for an /Encoding or /BaseEncoding name.
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"WinAnsiEncoding" => BaseEncoding::WinAnsi,
            b"StandardEncoding" => BaseEncoding::Standard,
            _ => BaseEncoding::Latin1,
        }
    }

    pub fn decode(self, code: u8) -> char {
        match (self, code) {
            (BaseEncoding::WinAnsi, 0x80..=0x9F) => {
                WIN_ANSI_HIGH[usize::from(code - 0x80)].unwrap_or('\u{FFFD}')
            }
            (BaseEncoding::Standard, b'\'') => '\u{2019}',
            (BaseEncoding::Standard, b'`') => '\u{2018}',
            _ => char::from(code),
        }
    }
}

/// A base encoding with per-code overrides.
#[derive(Debug, Clone, Default)]
pub struct FontEncoding {
    base: BaseEncoding,
    differences: Vec<(u8, char)>,
}

impl FontEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        Self {
            base,
            differences: Vec::new(),
        }
    }

    /// Apply a /Differences array already split into `(code, glyph name)`
    /// pairs. Unknown glyph names are ignored.
    pub fn with_differences<'a>(mut self, entries: impl IntoIterator<Item = (u8, &'a str)>) -> Self {
        for (code, name) in entries {
            if let Some(ch) = glyph_name_to_char(name) {
                self.differences.retain(|(c, _)| *c != code);
                self.differences.push((code, ch));
            }
        }
        self
    }

    pub fn decode(&self, code: u8) -> char {
        self.differences
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, ch)| *ch)
            .unwrap_or_else(|| self.base.decode(code))
    }
}

/// Unicode for a glyph name: `uniXXXX`, single ASCII letters, and the
/// spelled-out digit and punctuation names.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c);
        }
    }
    GLYPH_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
}

static GLYPH_NAMES: &[(&str, char)] = &[
    ("space", ' '),
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
    ("period", '.'),
    ("comma", ','),
    ("colon", ':'),
    ("semicolon", ';'),
    ("hyphen", '-'),
    ("underscore", '_'),
    ("numbersign", '#'),
    ("slash", '/'),
    ("parenleft", '('),
    ("parenright", ')'),
    ("quotesingle", '\''),
    ("quoteright", '\u{2019}'),
    ("quoteleft", '\u{2018}'),
    ("endash", '\u{2013}'),
    ("emdash", '\u{2014}'),
    ("bullet", '\u{2022}'),
];

#[rustfmt::skip]
static WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        for enc in [BaseEncoding::WinAnsi, BaseEncoding::Standard, BaseEncoding::Latin1] {
            assert_eq!(enc.decode(b'7'), '7');
            assert_eq!(enc.decode(b'C'), 'C');
        }
    }

    #[test]
    fn win_ansi_high_range() {
        assert_eq!(BaseEncoding::WinAnsi.decode(0x80), '\u{20AC}');
        assert_eq!(BaseEncoding::WinAnsi.decode(0x81), '\u{FFFD}');
        assert_eq!(BaseEncoding::WinAnsi.decode(0xE9), 'é');
        assert_eq!(BaseEncoding::Latin1.decode(0x80), '\u{80}');
    }

    #[test]
    fn standard_quotes() {
        assert_eq!(BaseEncoding::Standard.decode(b'\''), '\u{2019}');
        assert_eq!(BaseEncoding::from_name(b"StandardEncoding"), BaseEncoding::Standard);
        assert_eq!(BaseEncoding::from_name(b"MacRomanEncoding"), BaseEncoding::Latin1);
    }

    #[test]
    fn differences_override_base() {
        let enc = FontEncoding::new(BaseEncoding::WinAnsi)
            .with_differences([(65, "one"), (66, "uni0041"), (67, "notaglyph"), (65, "two")]);
        assert_eq!(enc.decode(65), '2');
        assert_eq!(enc.decode(66), 'A');
        assert_eq!(enc.decode(67), 'C');
    }

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_char("seven"), Some('7'));
        assert_eq!(glyph_name_to_char("x"), Some('x'));
        assert_eq!(glyph_name_to_char("uni20AC"), Some('\u{20AC}'));
        assert_eq!(glyph_name_to_char("florin"), None);
    }
}
