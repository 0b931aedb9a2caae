//! Glyph bounding boxes from interpreter events.

use bingo_core::{BBox, Char, Ctm, Point};

use crate::handler::CharEvent;

/// Build a [`Char`] with a top-left origin bbox.
///
/// The glyph box spans the advance width horizontally and
/// `descent ..= 1000 + descent` vertically in glyph space, so its height
/// equals the font size. It is mapped through
/// `[size·Th 0 0 size 0 rise] × Tm × CTM` and flipped against `page_height`.
pub fn char_from_event(event: &CharEvent, page_height: f64) -> Char {
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix.concat(&event.text_matrix).concat(&event.ctm);

    let width = event.displacement / 1000.0;
    let descent = event.descent / 1000.0;
    let ascent = 1.0 + descent;
    let corners = [
        Point::new(0.0, descent),
        Point::new(width, descent),
        Point::new(width, ascent),
        Point::new(0.0, ascent),
    ]
    .map(|p| trm.transform_point(p));

    let (min_x, max_x, min_y, max_y) = corners.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
    );

    Char {
        text: event.unicode.clone(),
        bbox: BBox::new(min_x, page_height - max_y, max_x, page_height - min_y),
        fontname: event.font_name.clone(),
        size: event.font_size,
        upright: trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6,
        char_code: event.char_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: "A".to_string(),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: Ctm::translation(72.0, 720.0),
            ctm: Ctm::identity(),
            displacement: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            descent: -250.0,
        }
    }

    fn approx(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 0.01, "expected {expected}, got {actual}");
    }

    #[test]
    fn horizontal_glyph() {
        let ch = char_from_event(&event(), 792.0);
        approx(ch.bbox.x0, 72.0);
        approx(ch.bbox.x1, 80.004);
        approx(ch.bbox.top, 63.0);
        approx(ch.bbox.bottom, 75.0);
        assert_eq!(ch.text, "A");
        assert!(ch.upright);
    }

    #[test]
    fn rise_lifts_the_box() {
        let ch = char_from_event(&CharEvent { rise: 5.0, ..event() }, 792.0);
        approx(ch.bbox.top, 58.0);
        approx(ch.bbox.bottom, 70.0);
    }

    #[test]
    fn ctm_scale_applies() {
        let ch = char_from_event(
            &CharEvent {
                ctm: Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0),
                text_matrix: Ctm::translation(10.0, 10.0),
                ..event()
            },
            792.0,
        );
        approx(ch.bbox.x0, 20.0);
        approx(ch.bbox.width(), 16.008);
        approx(ch.bbox.height(), 24.0);
    }

    #[test]
    fn horizontal_scaling_narrows() {
        let ch = char_from_event(&CharEvent { h_scaling: 0.5, ..event() }, 792.0);
        approx(ch.bbox.width(), 4.002);
    }

    #[test]
    fn rotated_glyph_is_not_upright() {
        let ch = char_from_event(
            &CharEvent {
                text_matrix: Ctm::new(0.0, 1.0, -1.0, 0.0, 100.0, 100.0),
                ..event()
            },
            792.0,
        );
        assert!(!ch.upright);
    }
}
