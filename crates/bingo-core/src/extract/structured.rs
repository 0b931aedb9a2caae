use tracing::debug;

use super::{CardStrategy, ExtractOptions, PageContext, StrategyOutcome};
use crate::card::{self, Card, FREE_CELL, GRID_SIZE, Matrix, find_serial, placeholder};
use crate::geometry::BBox;
use crate::layout::CardGeometry;
use crate::page::PageSource;

/// Reads four cards per page by cropping the known layout's cells.
///
/// Applies when the page text mentions `BINGO` or `CARD` (or
/// `assume_layout` is set) and the page is large enough for the layout. A
/// configured `expected_page_size` that the page does not match makes it
/// not applicable. Always yields four cards once applicable; unreadable
/// cells are `None`.
pub struct StructuredStrategy;

impl CardStrategy for StructuredStrategy {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, ctx: &PageContext<'_>, options: &ExtractOptions) -> StrategyOutcome {
        let page = ctx.page;
        if options.rejects_page_size(page.width(), page.height()) {
            debug!(
                page = ctx.page_number(),
                width = page.width(),
                height = page.height(),
                "page size differs from expected size"
            );
            return StrategyOutcome::NotApplicable;
        }
        if !options.assume_layout && !has_layout_marker(&ctx.text) {
            return StrategyOutcome::NotApplicable;
        }
        let Some(layout) = options.page_layout(page.width(), page.height()) else {
            debug!(
                page = ctx.page_number(),
                width = page.width(),
                height = page.height(),
                "page too small for card layout"
            );
            return StrategyOutcome::NotApplicable;
        };

        let cards = layout
            .cards()
            .map(|(row, col, geometry)| read_card(ctx, &geometry, row, col))
            .collect();
        StrategyOutcome::Cards(cards)
    }
}

fn has_layout_marker(text: &str) -> bool {
    let upper = text.to_uppercase();
    upper.contains("BINGO") || upper.contains("CARD")
}

fn read_card(ctx: &PageContext<'_>, geometry: &CardGeometry, row: usize, col: usize) -> Card {
    let mut matrix: Matrix = [[None; GRID_SIZE]; GRID_SIZE];
    for (r, cells) in matrix.iter_mut().enumerate() {
        for (c, cell) in cells.iter_mut().enumerate() {
            if (r, c) != FREE_CELL {
                *cell = read_cell(ctx.page, geometry.cell_bbox(r, c));
            }
        }
    }

    let header = ctx.page.extract_text_within(geometry.header_bbox());
    let serial = find_serial(&header)
        .or_else(|| find_serial(&ctx.text))
        .map(str::to_string)
        .unwrap_or_else(|| placeholder::quadrant(ctx.page_number(), row, col));

    Card::new(serial, matrix)
}

/// Text of the characters fully inside the cell first. When that is empty,
/// a number clipped by the cell border is recovered from the words whose
/// center lies in the cell, nearest the cell's horizontal center.
fn read_cell(page: &dyn PageSource, bbox: BBox) -> Option<u32> {
    let text = page.extract_text_within(bbox);
    let text = text.trim();
    if !text.is_empty() {
        return card::first_integer(text);
    }

    let center = bbox.center_x();
    page.extract_words()
        .iter()
        .filter(|w| bbox.contains_point(w.bbox.center_x(), w.bbox.center_y()))
        .min_by(|a, b| {
            let da = (a.bbox.center_x() - center).abs();
            let db = (b.bbox.center_x() - center).abs();
            da.total_cmp(&db)
        })
        .and_then(|w| card::parse_integer(w.text.trim()))
}
