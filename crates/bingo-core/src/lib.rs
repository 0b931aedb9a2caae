//! Backend-independent core of bingo-rs.
//!
//! Holds the card model, the printed layout geometry, page text access
//! ([`PageSource`], [`TextPage`]), word grouping, the card extraction
//! strategies, duplicate validation, win detection and card generation.
//! PDF parsing lives in `bingo-parse`; this crate never touches PDF bytes.

pub mod card;
pub mod cluster;
pub mod duplicates;
pub mod error;
pub mod extract;
pub mod generate;
pub mod geometry;
pub mod layout;
pub mod lines;
pub mod page;
pub mod text;
pub mod winner;
pub mod words;

pub use card::{
    COLUMN_LETTERS, Card, FREE_CELL, GRID_SIZE, MAX_SERIAL, Matrix, column_range, format_serial,
};
pub use cluster::ClusterOptions;
pub use duplicates::{
    DuplicateGroup, DuplicateReport, InternalRepeat, find_internal_repeats, validate_duplicates,
};
pub use error::PdfError;
pub use extract::{
    CardExtractor, CardStrategy, ClusteringStrategy, ExtractOptions, PageContext,
    SequentialStrategy, StrategyOutcome, StructuredStrategy, default_strategies, extract_cards,
};
pub use generate::{GenerationSession, generate_matrix};
pub use geometry::{BBox, Ctm, Point};
pub use layout::{CardGeometry, LETTER, LayoutOptions, PageLayout, PdfRect};
pub use lines::{TextLine, cluster_words_into_lines, words_to_text};
pub use page::{PageSource, TextPage};
pub use text::Char;
pub use winner::{CardProgress, MarkGrid, MarkState, check_winner, progress};
pub use words::{Word, WordExtractor, WordOptions};
