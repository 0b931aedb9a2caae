//! bingo: generate, print, read back and validate bingo cards.
//!
//! This is the public API facade for bingo-rs. It re-exports types from
//! bingo-core and uses bingo-parse for PDF reading.
//!
//! # Architecture
//!
//! - **bingo-core**: card model, layout geometry, extraction strategies,
//!   duplicate validation, win detection and generation
//! - **bingo-parse**: PDF parsing and content stream interpretation
//! - **bingo** (this crate): [`Pdf`] for reading documents, and with the
//!   `write` feature, [`render_cards`] and [`render_winner`] for printing
//!   them

mod pdf;
#[cfg(feature = "write")]
mod render;

pub use bingo_core;
pub use bingo_parse;

pub use bingo_core::{
    BBox, COLUMN_LETTERS, Card, CardExtractor, CardProgress, CardStrategy, ClusterOptions,
    ClusteringStrategy, DuplicateGroup, DuplicateReport, ExtractOptions, FREE_CELL, GRID_SIZE,
    GenerationSession, InternalRepeat, LETTER, LayoutOptions, MAX_SERIAL, MarkGrid, MarkState,
    Matrix,
    PageContext, PageLayout, PageSource, PdfError, SequentialStrategy, StrategyOutcome,
    StructuredStrategy, TextPage, Word, WordOptions, check_winner, column_range,
    default_strategies, find_internal_repeats, format_serial, generate_matrix, progress,
    validate_duplicates,
};
pub use pdf::{PagesIter, Pdf, cards_from_pdf};
#[cfg(feature = "write")]
pub use render::{RenderOptions, render_cards, render_winner};
