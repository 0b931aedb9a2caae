//! Line assembly: grouping words into reading-order lines of text.

use crate::geometry::BBox;
use crate::words::Word;

/// A line of words sharing a vertical band.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Words in left-to-right order.
    pub words: Vec<Word>,
    /// Union of the word boxes.
    pub bbox: BBox,
}

impl TextLine {
    /// Words joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Group words into lines whose vertical midpoints lie within `y_tolerance`.
///
/// Lines come out top-to-bottom, words within a line left-to-right.
pub fn cluster_words_into_lines(words: &[Word], y_tolerance: f64) -> Vec<TextLine> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for word in sorted {
        let mid = word.bbox.center_y();
        match lines
            .iter_mut()
            .find(|line| (mid - line.bbox.center_y()).abs() <= y_tolerance)
        {
            Some(line) => {
                line.bbox = line.bbox.union(&word.bbox);
                line.words.push(word.clone());
            }
            None => lines.push(TextLine {
                words: vec![word.clone()],
                bbox: word.bbox,
            }),
        }
    }

    for line in &mut lines {
        line.words.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));
    lines
}

/// Render words as text: words separated by spaces, lines by newlines.
pub fn words_to_text(words: &[Word], y_tolerance: f64) -> String {
    cluster_words_into_lines(words, y_tolerance)
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Word {
        Word {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x1, bottom),
        }
    }

    #[test]
    fn joins_words_and_lines() {
        let words = vec![
            word("CARD00007", 100.0, 50.0, 160.0, 60.0),
            word("12", 60.0, 100.0, 70.0, 108.0),
            word("BINGO", 10.0, 20.0, 60.0, 34.0),
            word("3", 20.0, 101.0, 26.0, 109.0),
        ];
        assert_eq!(words_to_text(&words, 3.0), "BINGO\nCARD00007\n3 12");
    }

    #[test]
    fn separate_bands_stay_separate() {
        let words = vec![
            word("a", 10.0, 100.0, 16.0, 110.0),
            word("b", 10.0, 115.0, 16.0, 125.0),
        ];
        let lines = cluster_words_into_lines(&words, 3.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "a");
        assert_eq!(lines[1].bbox, BBox::new(10.0, 115.0, 16.0, 125.0));
    }

    #[test]
    fn empty_words_give_empty_text() {
        assert_eq!(words_to_text(&[], 3.0), "");
    }
}
