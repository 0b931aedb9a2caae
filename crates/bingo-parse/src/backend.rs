//! PDF parsing backend trait.
//!
//! [`PdfBackend`] is the seam between the facade and whatever reads PDF
//! bytes. The only implementation is [`crate::LopdfBackend`].

use bingo_core::{BBox, ExtractOptions, PdfError};

use crate::handler::ContentHandler;

/// Operations the facade needs from a PDF reader.
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable, unencrypted PDF.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page's MediaBox in PDF user space, normalized so that
    /// `x0 <= x1` and `top <= bottom` hold the lower and upper y.
    ///
    /// # Errors
    ///
    /// Returns an error if no MediaBox is found on the page or its ancestors,
    /// or if it is malformed.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error>;

    /// Interpret the page's content, reporting glyphs to `handler`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page's content cannot be decoded.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
