//! Win detection and live marking of called numbers.

use crate::card::{Card, FREE_CELL, GRID_SIZE};

/// Marked cells, row-major.
pub type MarkGrid = [[bool; GRID_SIZE]; GRID_SIZE];

/// True when any row, column, or either diagonal is fully marked.
///
/// The center gets no special treatment here; callers mark it themselves.
pub fn check_winner(marks: &MarkGrid) -> bool {
    let row = marks.iter().any(|r| r.iter().all(|&m| m));
    let column = (0..GRID_SIZE).any(|c| marks.iter().all(|r| r[c]));
    let diagonal = (0..GRID_SIZE).all(|i| marks[i][i]);
    let anti_diagonal = (0..GRID_SIZE).all(|i| marks[i][GRID_SIZE - 1 - i]);
    row || column || diagonal || anti_diagonal
}

/// Marks on one card during a game. The free center is always marked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkState {
    marks: MarkGrid,
}

impl Default for MarkState {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkState {
    pub fn new() -> Self {
        let mut marks = [[false; GRID_SIZE]; GRID_SIZE];
        marks[FREE_CELL.0][FREE_CELL.1] = true;
        Self { marks }
    }

    /// Marks for `card` after the given numbers were called.
    pub fn from_called(card: &Card, called: impl IntoIterator<Item = u32>) -> Self {
        let mut state = Self::new();
        for number in called {
            state.apply(card, number, true);
        }
        state
    }

    pub fn marks(&self) -> &MarkGrid {
        &self.marks
    }

    /// Set every cell of `card` holding `number` to `marked`. Returns how
    /// many cells hold the number.
    pub fn apply(&mut self, card: &Card, number: u32, marked: bool) -> usize {
        let mut hits = 0;
        for (r, row) in card.matrix.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if *cell == Some(number) {
                    self.marks[r][c] = marked;
                    hits += 1;
                }
            }
        }
        self.marks[FREE_CELL.0][FREE_CELL.1] = true;
        hits
    }

    /// Cells that are marked or have no number.
    pub fn hits(&self, card: &Card) -> usize {
        card.matrix
            .iter()
            .zip(self.marks.iter())
            .flat_map(|(cells, marks)| cells.iter().zip(marks.iter()))
            .filter(|(cell, marked)| **marked || cell.is_none())
            .count()
    }

    /// A full line is marked.
    pub fn is_winner(&self) -> bool {
        check_winner(&self.marks)
    }
}

/// Progress of one card in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardProgress {
    pub serial: String,
    /// Marked-or-empty cells, out of 25.
    pub hits: usize,
    /// A full row, column or diagonal is marked.
    pub line: bool,
    /// Every cell is covered.
    pub full: bool,
}

/// Evaluate every card against the called numbers, most hits first.
///
/// Cards with equal hits keep their input order.
pub fn progress(cards: &[Card], called: &[u32]) -> Vec<CardProgress> {
    let mut ranked: Vec<CardProgress> = cards
        .iter()
        .map(|card| {
            let state = MarkState::from_called(card, called.iter().copied());
            let hits = state.hits(card);
            CardProgress {
                serial: card.serial.clone(),
                hits,
                line: state.is_winner(),
                full: hits == GRID_SIZE * GRID_SIZE,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.hits.cmp(&a.hits));
    ranked
}
