//! Callbacks emitted by the content stream interpreter.

use bingo_core::{Char, Ctm};

use crate::char_extraction::char_from_event;

/// One glyph shown by `Tj`, `TJ`, `'` or `"`.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// Raw byte code from the string operand.
    pub char_code: u32,
    /// Decoded text.
    pub unicode: String,
    /// Base font name.
    pub font_name: String,
    pub font_size: f64,
    /// Text matrix at the moment the glyph was shown.
    pub text_matrix: Ctm,
    /// Current transformation matrix.
    pub ctm: Ctm,
    /// Glyph advance width in 1/1000 em units.
    pub displacement: f64,
    /// Horizontal scaling as a factor.
    pub h_scaling: f64,
    pub rise: f64,
    /// Font descent in 1/1000 em units.
    pub descent: f64,
}

/// Receives interpreter output.
pub trait ContentHandler {
    /// Called when a glyph is shown.
    fn on_char(&mut self, _event: CharEvent) {}

    /// Called for problems the interpreter recovers from.
    fn on_warning(&mut self, _message: String) {}
}

/// Collects [`Char`]s in top-left page coordinates.
#[derive(Debug, Clone)]
pub struct CharCollector {
    page_height: f64,
    chars: Vec<Char>,
    warnings: Vec<String>,
}

impl CharCollector {
    pub fn new(page_height: f64) -> Self {
        Self {
            page_height,
            chars: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_chars(self) -> Vec<Char> {
        self.chars
    }
}

impl ContentHandler for CharCollector {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(char_from_event(&event, self.page_height));
    }

    fn on_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}
