//! bingo-parse: PDF reading for bingo-rs.
//!
//! Opens documents with lopdf, resolves page boxes and resources, and
//! interprets content streams into positioned [`bingo_core::Char`]s. Only
//! simple single-byte fonts are understood; that covers the standard 14
//! Type1 faces the card renderer emits and most generated documents.

pub mod backend;
pub mod char_extraction;
pub mod encoding;
pub mod error;
pub mod font;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod text_state;

pub use backend::PdfBackend;
pub use bingo_core;
pub use error::BackendError;
pub use handler::{CharCollector, CharEvent, ContentHandler};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
