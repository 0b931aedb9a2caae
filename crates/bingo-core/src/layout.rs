//! Printed card layout: four cards per page in a 2×2 grid.
//!
//! The renderer draws with these rectangles and the structured extractor
//! crops with them, so both sides agree on where every cell lives. Boxes are
//! computed in PDF space (bottom-left origin) and converted to top-left
//! [`BBox`]es for cropping.

use crate::card::GRID_SIZE;
use crate::geometry::BBox;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// US Letter in points.
pub const LETTER: (f64, f64) = (612.0, 792.0);

/// Cards per page along each axis.
pub const CARDS_PER_AXIS: usize = 2;

const GRID_TOP_OFFSET: f64 = 55.0;
const GRID_SIDE_PADDING: f64 = 10.0;
const GRID_RESERVED_HEIGHT: f64 = 60.0;
// Row 0 of the logical grid is header space; rows 1..=5 hold numbers.
const LOGICAL_ROWS: f64 = 6.0;
const CELL_DROP: f64 = 15.0;
const TITLE_OFFSET: f64 = 15.0;
const SERIAL_OFFSET: f64 = 30.0;
const HEADER_BAND_TOP: f64 = 10.0;
const HEADER_BAND_BOTTOM: f64 = 45.0;
const NUMBER_BASELINE_DROP: f64 = 3.0;

/// Page margins in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            margin_x: 0.5 * POINTS_PER_INCH,
            margin_y: 0.5 * POINTS_PER_INCH,
        }
    }
}

/// A rectangle in PDF user space (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    /// Convert to a top-left origin box on a page of the given height.
    pub fn to_bbox(&self, page_height: f64) -> BBox {
        BBox::new(
            self.x,
            page_height - (self.y + self.height),
            self.x + self.width,
            page_height - self.y,
        )
    }
}

/// Card placement on one page size.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    page_width: f64,
    page_height: f64,
    margin_x: f64,
    margin_y: f64,
    card_width: f64,
    card_height: f64,
}

impl PageLayout {
    /// Returns `None` when the page is too small to hold cells of positive size.
    pub fn new(page_width: f64, page_height: f64, options: &LayoutOptions) -> Option<Self> {
        let axis = CARDS_PER_AXIS as f64;
        let card_width = (page_width - 2.0 * options.margin_x) / axis;
        let card_height = (page_height - 2.0 * options.margin_y) / axis;
        let layout = Self {
            page_width,
            page_height,
            margin_x: options.margin_x,
            margin_y: options.margin_y,
            card_width,
            card_height,
        };
        let first = layout.card(0, 0);
        let usable = first.cell_width > 0.0
            && first.cell_height > 0.0
            && first.cell_width.is_finite()
            && first.cell_height.is_finite();
        usable.then_some(layout)
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn card_width(&self) -> f64 {
        self.card_width
    }

    pub fn card_height(&self) -> f64 {
        self.card_height
    }

    /// Geometry of the card in quadrant `(row, col)`; row 0 is the top row.
    pub fn card(&self, row: usize, col: usize) -> CardGeometry {
        let x = self.margin_x + col as f64 * self.card_width;
        let y = self.page_height - self.margin_y - (row as f64 + 1.0) * self.card_height;
        CardGeometry {
            x,
            y,
            width: self.card_width,
            height: self.card_height,
            grid_top: y + self.card_height - GRID_TOP_OFFSET,
            grid_left: x + GRID_SIDE_PADDING,
            cell_width: (self.card_width - 2.0 * GRID_SIDE_PADDING) / GRID_SIZE as f64,
            cell_height: (self.card_height - GRID_RESERVED_HEIGHT) / LOGICAL_ROWS,
            page_height: self.page_height,
        }
    }

    /// All quadrants in row-major order: `(row, col, geometry)`.
    pub fn cards(&self) -> impl Iterator<Item = (usize, usize, CardGeometry)> + '_ {
        (0..CARDS_PER_AXIS)
            .flat_map(|row| (0..CARDS_PER_AXIS).map(move |col| (row, col)))
            .map(|(row, col)| (row, col, self.card(row, col)))
    }
}

/// Geometry of a single card. `x`/`y` is the card's bottom-left corner in
/// PDF space.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub grid_top: f64,
    pub grid_left: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    page_height: f64,
}

impl CardGeometry {
    /// Outline of the whole card.
    pub fn outline(&self) -> PdfRect {
        PdfRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Horizontal center of the card.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn title_baseline(&self) -> f64 {
        self.y + self.height - TITLE_OFFSET
    }

    pub fn serial_baseline(&self) -> f64 {
        self.y + self.height - SERIAL_OFFSET
    }

    /// Column letters sit on the grid top.
    pub fn letters_baseline(&self) -> f64 {
        self.grid_top
    }

    /// Horizontal center of column `col`.
    pub fn column_center_x(&self, col: usize) -> f64 {
        self.grid_left + col as f64 * self.cell_width + self.cell_width / 2.0
    }

    /// Rectangle of cell `(row, col)` in PDF space.
    pub fn cell_rect(&self, row: usize, col: usize) -> PdfRect {
        PdfRect {
            x: self.grid_left + col as f64 * self.cell_width,
            y: self.grid_top - CELL_DROP - (row as f64 + 1.0) * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Cell `(row, col)` as a top-left crop box.
    pub fn cell_bbox(&self, row: usize, col: usize) -> BBox {
        self.cell_rect(row, col).to_bbox(self.page_height)
    }

    /// Baseline of the number printed in cell `(row, col)`.
    pub fn number_baseline(&self, row: usize) -> f64 {
        self.cell_rect(row, 0).y + self.cell_height / 2.0 - NUMBER_BASELINE_DROP
    }

    /// Band under the title holding the serial, in PDF space.
    pub fn header_rect(&self) -> PdfRect {
        PdfRect {
            x: self.x,
            y: self.y + self.height - HEADER_BAND_BOTTOM,
            width: self.width,
            height: HEADER_BAND_BOTTOM - HEADER_BAND_TOP,
        }
    }

    /// Header band as a top-left crop box.
    pub fn header_bbox(&self) -> BBox {
        self.header_rect().to_bbox(self.page_height)
    }
}
