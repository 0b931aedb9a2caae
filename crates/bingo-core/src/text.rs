use crate::geometry::BBox;

/// A single glyph placed on a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name.
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
    /// Whether the character is upright (not rotated).
    pub upright: bool,
    /// Raw character code from the PDF content stream.
    pub char_code: u32,
}

impl Char {
    /// True when the glyph carries only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
