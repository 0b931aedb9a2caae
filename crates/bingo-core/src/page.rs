//! Page text access used by the card extraction strategies.

use crate::geometry::BBox;
use crate::lines::words_to_text;
use crate::text::Char;
use crate::words::{Word, WordExtractor, WordOptions};

/// Read-only text access to one page.
///
/// Coordinates are top-left origin. The `_within` variants keep only
/// characters whose box lies entirely inside the given box.
pub trait PageSource {
    /// 1-based page number.
    fn page_number(&self) -> usize;
    /// Page width in points.
    fn width(&self) -> f64;
    /// Page height in points.
    fn height(&self) -> f64;
    /// Full page text, lines separated by `\n`.
    fn extract_text(&self) -> String;
    /// Text of the characters fully inside `bbox`.
    fn extract_text_within(&self, bbox: BBox) -> String;
    /// All words on the page in reading order.
    fn extract_words(&self) -> Vec<Word>;
    /// Words built from the characters fully inside `bbox`.
    fn extract_words_within(&self, bbox: BBox) -> Vec<Word>;
}

/// A page held in memory as a list of positioned characters.
#[derive(Debug, Clone)]
pub struct TextPage {
    index: usize,
    width: f64,
    height: f64,
    chars: Vec<Char>,
    word_options: WordOptions,
}

impl TextPage {
    /// Create a page from its 0-based index, size and characters.
    pub fn new(index: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self {
            index,
            width,
            height,
            chars,
            word_options: WordOptions::default(),
        }
    }

    /// Replace the word grouping tolerances.
    pub fn with_word_options(mut self, options: WordOptions) -> Self {
        self.word_options = options;
        self
    }

    /// 0-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Characters fully contained in `bbox`.
    pub fn chars_within(&self, bbox: BBox) -> Vec<Char> {
        self.chars
            .iter()
            .filter(|c| bbox.contains(&c.bbox))
            .cloned()
            .collect()
    }

    fn text_of(&self, chars: &[Char]) -> String {
        let words = WordExtractor::extract(chars, &self.word_options);
        words_to_text(&words, self.word_options.y_tolerance)
    }
}

impl PageSource for TextPage {
    fn page_number(&self) -> usize {
        self.index + 1
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn extract_text(&self) -> String {
        self.text_of(&self.chars)
    }

    fn extract_text_within(&self, bbox: BBox) -> String {
        self.text_of(&self.chars_within(bbox))
    }

    fn extract_words(&self) -> Vec<Word> {
        WordExtractor::extract(&self.chars, &self.word_options)
    }

    fn extract_words_within(&self, bbox: BBox) -> Vec<Word> {
        WordExtractor::extract(&self.chars_within(bbox), &self.word_options)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::page;
    use super::*;

    #[test]
    fn page_number_is_one_based() {
        let p = page(2, 612.0, 792.0, &[]);
        assert_eq!(p.index(), 2);
        assert_eq!(p.page_number(), 3);
    }

    #[test]
    fn extract_text_orders_lines() {
        let p = page(0, 612.0, 792.0, &[("BINGO", 100.0, 50.0), ("CARD00001", 100.0, 70.0)]);
        assert_eq!(p.extract_text(), "BINGO\nCARD00001");
    }

    #[test]
    fn within_keeps_fully_contained_chars_only() {
        let p = page(0, 612.0, 792.0, &[("42", 100.0, 100.0), ("7", 200.0, 100.0)]);
        // "42" spans x 100..112; the box cuts the second digit.
        let partial = BBox::new(95.0, 95.0, 110.0, 115.0);
        assert_eq!(p.extract_text_within(partial), "4");

        let full = BBox::new(95.0, 95.0, 120.0, 115.0);
        let words = p.extract_words_within(full);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "42");
    }

    #[test]
    fn empty_region_gives_empty_results() {
        let p = page(0, 612.0, 792.0, &[("42", 100.0, 100.0)]);
        let nowhere = BBox::new(300.0, 300.0, 400.0, 400.0);
        assert_eq!(p.extract_text_within(nowhere), "");
        assert!(p.extract_words_within(nowhere).is_empty());
    }
}
