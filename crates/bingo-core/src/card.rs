//! The bingo card model and serial-number helpers.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Cards are 5×5.
pub const GRID_SIZE: usize = 5;

/// Row and column of the free center cell.
pub const FREE_CELL: (usize, usize) = (2, 2);

/// Numbers per column: column `c` holds values in `1 + 15c ..= 15 + 15c`.
pub const COLUMN_SPAN: u32 = 15;

/// Column header letters.
pub const COLUMN_LETTERS: [&str; GRID_SIZE] = ["B", "I", "N", "G", "O"];

/// Cell values, row-major. `None` marks the free center or an unreadable cell.
pub type Matrix = [[Option<u32>; GRID_SIZE]; GRID_SIZE];

static SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CARD[0-9]{5}").expect("valid serial regex"));

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid integer regex"));

/// A bingo card: a serial plus its 5×5 numbers.
///
/// Equality of card *content* is matrix equality; the serial is a label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub serial: String,
    pub matrix: Matrix,
}

impl Card {
    /// Create a card, clearing the free center.
    pub fn new(serial: impl Into<String>, mut matrix: Matrix) -> Self {
        matrix[FREE_CELL.0][FREE_CELL.1] = None;
        Self {
            serial: serial.into(),
            matrix,
        }
    }

    /// Fill the 24 non-center cells from `values` in row-major order.
    ///
    /// Missing trailing values leave cells empty; extra values are ignored.
    pub fn from_row_major(serial: impl Into<String>, values: &[u32]) -> Self {
        Self::from_cells(serial, values.iter().map(|&v| Some(v)))
    }

    /// Fill the 24 non-center cells from `cells` in row-major order; a `None`
    /// leaves its cell empty.
    pub fn from_cells(
        serial: impl Into<String>,
        cells: impl IntoIterator<Item = Option<u32>>,
    ) -> Self {
        let mut matrix: Matrix = [[None; GRID_SIZE]; GRID_SIZE];
        let mut cells = cells.into_iter();
        for (r, row) in matrix.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if (r, c) != FREE_CELL {
                    *cell = cells.next().flatten();
                }
            }
        }
        Self::new(serial, matrix)
    }

    /// Non-empty cells in row-major order.
    pub fn numbers(&self) -> Vec<u32> {
        self.matrix.iter().flatten().filter_map(|v| *v).collect()
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.matrix.get(row)?.get(col).copied().flatten()
    }

    /// True when all 24 non-center cells hold a number.
    pub fn is_complete(&self) -> bool {
        self.numbers().len() == GRID_SIZE * GRID_SIZE - 1
    }

    /// Numbers appearing more than once on this card, ascending.
    pub fn internal_duplicates(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut repeated: Vec<u32> = self
            .numbers()
            .into_iter()
            .filter(|n| !seen.insert(*n))
            .collect();
        repeated.sort_unstable();
        repeated.dedup();
        repeated
    }

    /// A complete card with a free center, every value inside its column's
    /// range, and no repeats.
    pub fn is_valid(&self) -> bool {
        if self.matrix[FREE_CELL.0][FREE_CELL.1].is_some() || !self.is_complete() {
            return false;
        }
        let in_range = self.matrix.iter().all(|row| {
            row.iter().enumerate().all(|(c, cell)| match cell {
                Some(v) => column_range(c).contains(v),
                None => true,
            })
        });
        in_range && self.internal_duplicates().is_empty()
    }

    /// True when the serial is a generated placeholder rather than a
    /// printed `CARDnnnnn` serial.
    pub fn has_placeholder_serial(&self) -> bool {
        !is_serial(&self.serial)
    }
}

/// Allowed values for column `col`.
pub fn column_range(col: usize) -> std::ops::RangeInclusive<u32> {
    let base = col as u32 * COLUMN_SPAN;
    base + 1..=base + COLUMN_SPAN
}

/// True when `text` is exactly one `CARDnnnnn` serial.
pub fn is_serial(text: &str) -> bool {
    text.len() == 9 && SERIAL.find(text).is_some_and(|m| m.start() == 0)
}

/// First serial appearing anywhere in `text`.
pub fn find_serial(text: &str) -> Option<&str> {
    SERIAL.find(text).map(|m| m.as_str())
}

/// Every serial in `text`, in order of appearance.
pub fn find_serials(text: &str) -> Vec<&str> {
    SERIAL.find_iter(text).map(|m| m.as_str()).collect()
}

/// Highest number a five-digit serial can carry.
pub const MAX_SERIAL: u32 = 99_999;

/// Serial for the `n`-th generated card, e.g. `CARD00001`. `None` past
/// [`MAX_SERIAL`].
pub fn format_serial(n: u32) -> Option<String> {
    (n <= MAX_SERIAL).then(|| format!("CARD{n:05}"))
}

/// The integer carried by a serial (`CARD00042` -> 42).
pub fn serial_number(serial: &str) -> Option<u32> {
    serial
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()
}

/// The first integer substring of `text`.
pub(crate) fn first_integer(text: &str) -> Option<u32> {
    INTEGER.find(text).and_then(|m| m.as_str().parse().ok())
}

/// `text` read as a whole integer after trimming.
pub(crate) fn parse_integer(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Placeholder serials for cards whose printed serial could not be found.
pub mod placeholder {
    /// Structured extraction: quadrant `(row, col)` on page `page`.
    pub fn quadrant(page: usize, row: usize, col: usize) -> String {
        format!("PAGE{page}_R{row}C{col}")
    }

    /// Clustering extraction: the single card on page `page`.
    pub fn auto(page: usize) -> String {
        format!("PAGE{page}_AUTO")
    }

    /// Sequential extraction: the `seq`-th (1-based) card on page `page`.
    pub fn sequential(page: usize, seq: usize) -> String {
        format!("PAGE{page}_SEQ{seq}")
    }
}
