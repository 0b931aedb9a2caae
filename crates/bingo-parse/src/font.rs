//! Simple (single-byte) font loading: widths, descent and encoding.

use crate::encoding::{BaseEncoding, FontEncoding};
use crate::lopdf_backend::{object_to_f64, resolve};
use crate::standard_fonts::{self, StandardFont};

/// Descent used when the font has no descriptor, in 1/1000 em units.
const DEFAULT_DESCENT: f64 = -250.0;

/// Width used when neither /Widths nor a standard face covers a code.
const DEFAULT_WIDTH: f64 = 600.0;

/// A font resolved from a page's /Font resources.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// /BaseFont without its subset tag.
    pub base_font: String,
    first_char: u32,
    widths: Vec<f64>,
    standard: Option<&'static StandardFont>,
    missing_width: f64,
    /// Descent in 1/1000 em units (negative, below the baseline).
    pub descent: f64,
    encoding: FontEncoding,
}

impl LoadedFont {
    /// Stand-in for a font that could not be resolved.
    pub fn fallback(name: &str) -> Self {
        Self {
            base_font: name.to_string(),
            first_char: 0,
            widths: Vec::new(),
            standard: None,
            missing_width: DEFAULT_WIDTH,
            descent: DEFAULT_DESCENT,
            encoding: FontEncoding::default(),
        }
    }

    /// A standard face with no embedded metrics.
    pub fn standard(base_font: &str) -> Self {
        Self {
            standard: standard_fonts::lookup(base_font),
            ..Self::fallback(standard_fonts::strip_subset_prefix(base_font))
        }
    }

    /// Glyph width of `code` in 1/1000 em units.
    pub fn width(&self, code: u32) -> f64 {
        let explicit = code
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied();
        match (explicit, self.standard) {
            (Some(w), _) => w,
            (None, Some(face)) => face.width(code),
            (None, None) => self.missing_width,
        }
    }

    /// Text for a byte code.
    pub fn decode(&self, code: u8) -> char {
        self.encoding.decode(code)
    }
}

/// Read a simple font dictionary.
pub fn load_font(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> LoadedFont {
    let base_font = dict
        .get(b"BaseFont")
        .ok()
        .and_then(|o| resolve(doc, o).as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_default();

    let mut font = LoadedFont::standard(&base_font);

    font.first_char = dict
        .get(b"FirstChar")
        .ok()
        .and_then(|o| object_to_f64(resolve(doc, o)).ok())
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0);

    if let Some(widths) = dict
        .get(b"Widths")
        .ok()
        .and_then(|o| resolve(doc, o).as_array().ok())
    {
        font.widths = widths
            .iter()
            .map(|o| object_to_f64(resolve(doc, o)).unwrap_or(0.0))
            .collect();
    }

    if let Some(descriptor) = dict
        .get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
    {
        let number = |key: &[u8]| {
            descriptor
                .get(key)
                .ok()
                .and_then(|o| object_to_f64(resolve(doc, o)).ok())
        };
        if let Some(descent) = number(b"Descent") {
            font.descent = descent;
        }
        if let Some(missing) = number(b"MissingWidth") {
            font.missing_width = missing;
        }
    }

    font.encoding = dict
        .get(b"Encoding")
        .ok()
        .map(|o| load_encoding(doc, resolve(doc, o)))
        .unwrap_or_default();

    font
}

fn load_encoding(doc: &lopdf::Document, obj: &lopdf::Object) -> FontEncoding {
    if let Ok(name) = obj.as_name() {
        return FontEncoding::new(BaseEncoding::from_name(name));
    }
    let Ok(dict) = obj.as_dict() else {
        return FontEncoding::default();
    };
    let base = dict
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(BaseEncoding::from_name)
        .unwrap_or_default();

    let mut entries: Vec<(u8, String)> = Vec::new();
    if let Some(diffs) = dict
        .get(b"Differences")
        .ok()
        .and_then(|o| resolve(doc, o).as_array().ok())
    {
        let mut code: Option<u32> = None;
        for item in diffs {
            match item {
                lopdf::Object::Integer(n) => code = u32::try_from(*n).ok(),
                lopdf::Object::Name(name) => {
                    if let Some(c) = code {
                        if let Ok(byte) = u8::try_from(c) {
                            entries.push((byte, String::from_utf8_lossy(name).into_owned()));
                        }
                        code = Some(c + 1);
                    }
                }
                _ => {}
            }
        }
    }

    FontEncoding::new(base).with_differences(entries.iter().map(|(c, n)| (*c, n.as_str())))
}
