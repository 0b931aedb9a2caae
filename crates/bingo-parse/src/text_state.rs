//! Text state tracked while interpreting a content stream.

use bingo_core::Ctm;

/// Text parameters that belong to the graphics state (saved by `q`,
/// restored by `Q`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    /// `Tc`: extra space after every glyph.
    pub char_spacing: f64,
    /// `Tw`: extra space after each single-byte code 32.
    pub word_spacing: f64,
    /// `Tz`: horizontal scaling in percent.
    pub h_scaling: f64,
    /// `TL`: distance between baselines.
    pub leading: f64,
    /// Resource name from `Tf`.
    pub font_name: String,
    pub font_size: f64,
    /// `Ts`: baseline shift.
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

impl TextParams {
    /// Horizontal scaling as a factor (1.0 = 100%).
    pub fn h_scale(&self) -> f64 {
        self.h_scaling / 100.0
    }
}

/// Text and line matrices of the current text object.
///
/// Both reset to identity on `BT`. `Tm` replaces them; `Td`/`TD`/`T*`
/// translate the line matrix and copy it into the text matrix; showing
/// glyphs advances only the text matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMatrices {
    text: Ctm,
    line: Ctm,
}

impl TextMatrices {
    pub fn text_matrix(&self) -> Ctm {
        self.text
    }

    pub fn line_matrix(&self) -> Ctm {
        self.line
    }

    /// `BT`.
    pub fn begin(&mut self) {
        *self = Self::default();
    }

    /// `Tm`.
    pub fn set(&mut self, m: Ctm) {
        self.text = m;
        self.line = m;
    }

    /// `Td`.
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.line = Ctm::translation(tx, ty).concat(&self.line);
        self.text = self.line;
    }

    /// `T*` with the current leading.
    pub fn next_line(&mut self, leading: f64) {
        self.move_line(0.0, -leading);
    }

    /// Move the text matrix `tx` units along the baseline.
    pub fn advance(&mut self, tx: f64) {
        self.text = Ctm::translation(tx, 0.0).concat(&self.text);
    }
}
