//! Printable card sheets.
//!
//! Cards are laid out four to a page with the same [`PageLayout`] the
//! structured reader crops, so a rendered sheet reads back to the same cards.
//! [`render_winner`] prints a single card with its called cells highlighted
//! and struck through.

use bingo_core::{
    COLUMN_LETTERS, Card, CardGeometry, FREE_CELL, GRID_SIZE, LETTER, LayoutOptions, MarkState,
    PageLayout, PdfError,
};
use bingo_parse::standard_fonts;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::debug;

const REGULAR: (&str, &str) = ("F1", "Helvetica");
const BOLD: (&str, &str) = ("F2", "Helvetica-Bold");

const TITLE_SIZE: f64 = 14.0;
const SERIAL_SIZE: f64 = 10.0;
const LETTERS_SIZE: f64 = 10.0;
const NUMBER_SIZE: f64 = 8.0;

/// Label printed in the free cell.
const FREE_LABEL: &str = "FREE";

/// Fill behind marked cells (light yellow) and the strike-through colour.
const HIGHLIGHT_RGB: [f64; 3] = [1.0, 0.95, 0.55];
const STRIKE_RGB: [f64; 3] = [0.8, 0.0, 0.0];

/// Options for [`render_cards`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Printed at the top of every card.
    pub title: String,
    /// Page width and height in points.
    pub page_size: (f64, f64),
    pub layout: LayoutOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "BINGO".to_string(),
            page_size: LETTER,
            layout: LayoutOptions::default(),
        }
    }
}

/// Render `cards` as a PDF, four per page in row-major order.
///
/// Missing numbers leave their cell blank. An empty slice yields a document
/// with no pages.
///
/// # Errors
///
/// Returns [`PdfError::WriteError`] if the page cannot hold the layout or
/// the document cannot be serialized.
pub fn render_cards(cards: &[Card], options: &RenderOptions) -> Result<Vec<u8>, PdfError> {
    let layout = page_layout(options)?;
    let pages: Vec<Content> = cards
        .chunks(layout.cards().count())
        .map(|sheet| sheet_content(sheet, &layout, options))
        .collect();
    debug!(cards = cards.len(), pages = pages.len(), "rendering cards");
    write_document(pages, options.page_size)
}

/// Render one winning card on its own page, in the first card slot.
///
/// Cells set in `marks` get a highlighted background and a line through
/// the number. The page reads back to `card` like any rendered sheet.
///
/// # Errors
///
/// Same as [`render_cards`].
pub fn render_winner(
    card: &Card,
    marks: &MarkState,
    options: &RenderOptions,
) -> Result<Vec<u8>, PdfError> {
    let layout = page_layout(options)?;
    let Some((_, _, geometry)) = layout.cards().next() else {
        return Err(PdfError::WriteError("page layout has no card slots".to_string()));
    };

    let mut ops = Vec::new();
    draw_highlights(&mut ops, &geometry, marks);
    draw_frame(&mut ops, &geometry);
    draw_strikes(&mut ops, &geometry, marks);
    draw_text(&mut ops, card, &geometry, &options.title);
    debug!(serial = %card.serial, "rendering winner card");
    write_document(vec![Content { operations: ops }], options.page_size)
}

fn page_layout(options: &RenderOptions) -> Result<PageLayout, PdfError> {
    let (width, height) = options.page_size;
    PageLayout::new(width, height, &options.layout).ok_or_else(|| {
        PdfError::WriteError(format!("a {width}x{height} page cannot hold the card layout"))
    })
}

/// One page per content stream, sharing the two Helvetica fonts.
fn write_document(pages: Vec<Content>, (width, height): (f64, f64)) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font = |doc: &mut Document, base_font: &str| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        })
    };
    let regular = font(&mut doc, REGULAR.1);
    let bold = font(&mut doc, BOLD.1);
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR.0 => regular,
            BOLD.0 => bold,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for content in pages {
        let content = content
            .encode()
            .map_err(|e| PdfError::WriteError(format!("failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(width), real(height)],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| PdfError::WriteError(format!("failed to write PDF: {e}")))?;
    Ok(buf)
}

fn sheet_content(sheet: &[Card], layout: &PageLayout, options: &RenderOptions) -> Content {
    let mut ops = Vec::new();
    for (card, (_, _, geometry)) in sheet.iter().zip(layout.cards()) {
        draw_frame(&mut ops, &geometry);
        draw_text(&mut ops, card, &geometry, &options.title);
    }
    Content { operations: ops }
}

/// Card outline and the 25 cell rectangles.
fn draw_frame(ops: &mut Vec<Operation>, geometry: &CardGeometry) {
    ops.push(Operation::new("w", vec![real(1.0)]));
    push_rect(ops, geometry.outline());
    ops.push(Operation::new("S", vec![]));

    ops.push(Operation::new("w", vec![real(0.5)]));
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            push_rect(ops, geometry.cell_rect(row, col));
        }
    }
    ops.push(Operation::new("S", vec![]));
}

fn marked_cells(marks: &MarkState) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..GRID_SIZE)
        .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
        .filter(|&(row, col)| marks.marks()[row][col])
}

fn draw_highlights(ops: &mut Vec<Operation>, geometry: &CardGeometry, marks: &MarkState) {
    ops.push(Operation::new("rg", HIGHLIGHT_RGB.iter().copied().map(real).collect()));
    for (row, col) in marked_cells(marks) {
        push_rect(ops, geometry.cell_rect(row, col));
    }
    ops.push(Operation::new("f", vec![]));
    ops.push(Operation::new("g", vec![real(0.0)]));
}

/// A horizontal line through the middle of each marked cell.
fn draw_strikes(ops: &mut Vec<Operation>, geometry: &CardGeometry, marks: &MarkState) {
    ops.push(Operation::new("RG", STRIKE_RGB.iter().copied().map(real).collect()));
    ops.push(Operation::new("w", vec![real(1.5)]));
    for (row, col) in marked_cells(marks) {
        let cell = geometry.cell_rect(row, col);
        let inset = cell.width * 0.15;
        let y = cell.y + cell.height / 2.0;
        ops.push(Operation::new("m", vec![real(cell.x + inset), real(y)]));
        ops.push(Operation::new("l", vec![real(cell.x + cell.width - inset), real(y)]));
    }
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("G", vec![real(0.0)]));
}

fn push_rect(ops: &mut Vec<Operation>, rect: bingo_core::PdfRect) {
    ops.push(Operation::new(
        "re",
        vec![real(rect.x), real(rect.y), real(rect.width), real(rect.height)],
    ));
}

fn draw_text(ops: &mut Vec<Operation>, card: &Card, geometry: &CardGeometry, title: &str) {
    ops.push(Operation::new("BT", vec![]));

    let center = geometry.center_x();
    show_centered(ops, BOLD, TITLE_SIZE, title, center, geometry.title_baseline());
    show_centered(ops, BOLD, SERIAL_SIZE, &card.serial, center, geometry.serial_baseline());

    for (col, letter) in COLUMN_LETTERS.iter().enumerate() {
        let x = geometry.column_center_x(col);
        show_centered(ops, BOLD, LETTERS_SIZE, letter, x, geometry.letters_baseline());
    }

    for row in 0..GRID_SIZE {
        let baseline = geometry.number_baseline(row);
        for col in 0..GRID_SIZE {
            let x = geometry.column_center_x(col);
            if (row, col) == FREE_CELL {
                show_centered(ops, BOLD, NUMBER_SIZE, FREE_LABEL, x, baseline);
            } else if let Some(n) = card.get(row, col) {
                show_centered(ops, REGULAR, NUMBER_SIZE, &n.to_string(), x, baseline);
            }
        }
    }

    ops.push(Operation::new("ET", vec![]));
}

/// Show `text` with its advance width centred on `center_x`.
fn show_centered(
    ops: &mut Vec<Operation>,
    (resource, base_font): (&str, &str),
    size: f64,
    text: &str,
    center_x: f64,
    baseline: f64,
) {
    let bytes = win_ansi_bytes(text);
    let x = center_x - text_width(base_font, &bytes, size) / 2.0;
    ops.push(Operation::new("Tf", vec![Object::Name(resource.into()), real(size)]));
    ops.push(Operation::new(
        "Tm",
        vec![real(1.0), real(0.0), real(0.0), real(1.0), real(x), real(baseline)],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(bytes)]));
}

fn text_width(base_font: &str, bytes: &[u8], size: f64) -> f64 {
    let face = standard_fonts::lookup(base_font);
    let units: f64 = bytes
        .iter()
        .map(|&b| face.map_or(500.0, |f| f.width(u32::from(b))))
        .sum();
    units * size / 1000.0
}

/// Latin-1 bytes for `text`; other characters become `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pdf;
    use bingo_core::{GenerationSession, PageSource, validate_duplicates};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cards(count: usize) -> Vec<Card> {
        let mut rng = StdRng::seed_from_u64(7);
        GenerationSession::new().generate(&mut rng, count)
    }

    #[test]
    fn four_cards_fill_one_page() {
        let bytes = render_cards(&cards(4), &RenderOptions::default()).unwrap();
        let pdf = Pdf::open(&bytes, None).unwrap();
        assert_eq!(pdf.page_count(), 1);
        let page = pdf.page(0).unwrap();
        assert_eq!((page.width(), page.height()), LETTER);
    }

    #[test]
    fn rendered_cards_read_back_identically() {
        let originals = cards(8);
        let bytes = render_cards(&originals, &RenderOptions::default()).unwrap();
        let extracted = Pdf::open(&bytes, None).unwrap().extract_cards();
        assert_eq!(extracted, originals);
        assert!(validate_duplicates(&extracted).is_clean());
    }

    #[test]
    fn partial_last_sheet_leaves_empty_slots() {
        let originals = cards(5);
        let bytes = render_cards(&originals, &RenderOptions::default()).unwrap();
        let extracted = Pdf::open(&bytes, None).unwrap().extract_cards();
        assert_eq!(extracted.len(), 8);
        assert_eq!(extracted[4], originals[4]);
        for empty in &extracted[5..] {
            assert!(empty.numbers().is_empty());
            // The only serial on the page is the printed card's.
            assert_eq!(empty.serial, originals[4].serial);
        }
    }

    #[test]
    fn missing_cells_stay_blank() {
        let mut card = cards(1).remove(0);
        card.matrix[0][0] = None;
        card.matrix[4][3] = None;
        let bytes = render_cards(std::slice::from_ref(&card), &RenderOptions::default()).unwrap();
        let extracted = Pdf::open(&bytes, None).unwrap().extract_cards();
        assert_eq!(extracted[0], card);
    }

    #[test]
    fn title_and_serial_are_printed() {
        let options = RenderOptions {
            title: "Bingo (Friday)".to_string(),
            ..RenderOptions::default()
        };
        let bytes = render_cards(&cards(1), &options).unwrap();
        let text = Pdf::open(&bytes, None).unwrap().page(0).unwrap().extract_text();
        assert!(text.contains("Bingo (Friday)"));
        assert!(text.contains("CARD00001"));
        assert!(text.contains("B I N G O"));
        assert!(text.contains("FREE"));
    }

    #[test]
    fn no_cards_no_pages() {
        let bytes = render_cards(&[], &RenderOptions::default()).unwrap();
        assert_eq!(Pdf::open(&bytes, None).unwrap().page_count(), 0);
    }

    #[test]
    fn tiny_page_is_rejected() {
        let options = RenderOptions {
            page_size: (60.0, 60.0),
            ..RenderOptions::default()
        };
        let err = render_cards(&cards(1), &options).unwrap_err();
        assert!(matches!(err, PdfError::WriteError(_)));
    }

    #[test]
    fn winner_card_reads_back_with_marks_drawn() {
        let card = cards(1).remove(0);
        let called: Vec<u32> = card.matrix[2].iter().flatten().copied().collect();
        let marks = MarkState::from_called(&card, called);
        assert!(marks.is_winner());

        let bytes = render_winner(&card, &marks, &RenderOptions::default()).unwrap();
        let pdf = Pdf::open(&bytes, None).unwrap();
        assert_eq!(pdf.page_count(), 1);
        let text = pdf.page(0).unwrap().extract_text();
        assert!(text.contains("BINGO"));
        assert!(text.contains(&card.serial));

        let extracted = pdf.extract_cards();
        assert_eq!(extracted[0], card);
        for empty in &extracted[1..] {
            assert!(empty.numbers().is_empty());
        }
    }

    #[test]
    fn winner_page_strikes_each_marked_cell() {
        let card = cards(1).remove(0);
        let marks = MarkState::from_called(&card, card.matrix[0].iter().flatten().copied());
        let mut ops = Vec::new();
        let layout = PageLayout::new(LETTER.0, LETTER.1, &LayoutOptions::default()).unwrap();
        let (_, _, geometry) = layout.cards().next().unwrap();
        draw_strikes(&mut ops, &geometry, &marks);
        // Five in the top row plus the free cell.
        assert_eq!(ops.iter().filter(|op| op.operator == "m").count(), 6);
        assert_eq!(ops.iter().filter(|op| op.operator == "l").count(), 6);
    }

    #[test]
    fn winner_rejects_tiny_page() {
        let card = cards(1).remove(0);
        let options = RenderOptions {
            page_size: (60.0, 60.0),
            ..RenderOptions::default()
        };
        let err = render_winner(&card, &MarkState::new(), &options).unwrap_err();
        assert!(matches!(err, PdfError::WriteError(_)));
    }

    #[test]
    fn non_latin_characters_are_replaced() {
        assert_eq!(win_ansi_bytes("Bingo é ☃"), b"Bingo \xE9 ?");
    }
}
