//! Top-level PDF document type for opening documents and reading cards.

use bingo_core::{Card, CardExtractor, ExtractOptions, PdfError, TextPage};
use bingo_parse::{CharCollector, LopdfBackend, LopdfDocument, PdfBackend};
use tracing::{debug, warn};

/// Iterator over the pages of a [`Pdf`], reading each page on demand.
///
/// Created by [`Pdf::pages()`].
pub struct PagesIter<'a> {
    pdf: &'a Pdf,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<TextPage, PdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.pdf.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// A PDF document opened for card extraction.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open(&bytes, None)?;
/// let cards = pdf.extract_cards();
/// let report = validate_duplicates(&cards);
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("doc", &self.doc)
            .field("options", &self.options)
            .finish()
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or is not a valid PDF.
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes, options)
    }

    /// Open a PDF document from bytes. Uses default options if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the bytes are not a valid, unencrypted PDF.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let doc = LopdfBackend::open(bytes).map_err(PdfError::from)?;
        debug!(pages = LopdfBackend::page_count(&doc), "document opened");
        Ok(Self {
            doc,
            options: options.unwrap_or_default(),
        })
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Read a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range or the page content
    /// cannot be interpreted.
    pub fn page(&self, index: usize) -> Result<TextPage, PdfError> {
        let page = LopdfBackend::get_page(&self.doc, index).map_err(PdfError::from)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page).map_err(PdfError::from)?;

        let mut collector = CharCollector::new(media_box.height());
        LopdfBackend::interpret_page(&self.doc, &page, &mut collector, &self.options)
            .map_err(PdfError::from)?;
        for warning in collector.warnings() {
            debug!(page = index + 1, "{warning}");
        }

        Ok(TextPage::new(
            index,
            media_box.width(),
            media_box.height(),
            collector.into_chars(),
        )
        .with_word_options(self.options.words.clone()))
    }

    /// Iterate over all pages in order.
    pub fn pages(&self) -> PagesIter<'_> {
        PagesIter {
            pdf: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Cards from every page, in page order.
    ///
    /// A page that cannot be read is logged and contributes no cards.
    pub fn extract_cards(&self) -> Vec<Card> {
        let extractor = CardExtractor::new(self.options.clone());
        (0..self.page_count())
            .flat_map(|index| self.page_cards(&extractor, index))
            .collect()
    }

    /// [`Pdf::extract_cards`] with pages processed concurrently by rayon.
    #[cfg(feature = "parallel")]
    pub fn extract_cards_parallel(&self) -> Vec<Card> {
        use rayon::prelude::*;

        let extractor = CardExtractor::new(self.options.clone());
        let per_page: Vec<Vec<Card>> = (0..self.page_count())
            .into_par_iter()
            .map(|index| self.page_cards(&extractor, index))
            .collect();
        per_page.into_iter().flatten().collect()
    }

    fn page_cards(&self, extractor: &CardExtractor, index: usize) -> Vec<Card> {
        match self.page(index) {
            Ok(page) => extractor.extract_page(&page),
            Err(err) => {
                warn!(page = index + 1, error = %err, "page could not be read, skipping");
                Vec::new()
            }
        }
    }
}

/// Open `bytes` and extract every card.
///
/// # Errors
///
/// Fails only when the document itself cannot be opened.
pub fn cards_from_pdf(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Vec<Card>, PdfError> {
    Ok(Pdf::open(bytes, options)?.extract_cards())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_core::PageSource;
    use lopdf::{Object, Stream, dictionary};

    /// A letter-size PDF with one page per content stream.
    fn pdf_with_pages(contents: &[&[u8]]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for content in contents {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            });
            kids.push(Object::Reference(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => contents.len() as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    /// Content showing `words` 100pt apart on one line.
    fn words_line(words: &[&str], y: u32) -> Vec<u8> {
        let mut content = String::from("BT /F1 10 Tf\n");
        for (i, word) in words.iter().enumerate() {
            content.push_str(&format!("1 0 0 1 {} {y} Tm ({word}) Tj\n", 50 + 100 * i));
        }
        content.push_str("ET\n");
        content.into_bytes()
    }

    #[test]
    fn open_valid_pdf() {
        let pdf = Pdf::open(&pdf_with_pages(&[b"BT ET"]), None).unwrap();
        assert_eq!(pdf.page_count(), 1);
        assert_eq!(pdf.options().max_recursion_depth, 10);
    }

    #[test]
    fn open_invalid_bytes_returns_error() {
        assert!(Pdf::open(b"not a pdf", None).is_err());
        assert!(cards_from_pdf(b"not a pdf", None).is_err());
    }

    #[test]
    fn page_reads_text_and_words() {
        let content = words_line(&["CARD00042", "7", "12"], 700);
        let pdf = Pdf::open(&pdf_with_pages(&[&content]), None).unwrap();
        let page = pdf.page(0).unwrap();
        assert_eq!(page.page_number(), 1);
        assert_eq!(page.width(), 612.0);
        let words: Vec<String> = page.extract_words().into_iter().map(|w| w.text).collect();
        assert_eq!(words, ["CARD00042", "7", "12"]);
    }

    #[test]
    fn page_out_of_range() {
        let pdf = Pdf::open(&pdf_with_pages(&[b""]), None).unwrap();
        assert_eq!(
            pdf.page(3).unwrap_err(),
            PdfError::PageOutOfRange { index: 3, count: 1 }
        );
    }

    #[test]
    fn pages_iterates_in_order() {
        let pdf = Pdf::open(
            &pdf_with_pages(&[&words_line(&["one"], 700), &words_line(&["two"], 700)]),
            None,
        )
        .unwrap();
        let iter = pdf.pages();
        assert_eq!(iter.len(), 2);
        let texts: Vec<String> = iter.map(|p| p.unwrap().extract_text()).collect();
        assert_eq!(texts, ["one", "two"]);
    }

    #[test]
    fn unreadable_page_contributes_no_cards() {
        let mut bytes = pdf_with_pages(&[&words_line(&["BINGO", "CARD00001"], 750), b""]);

        let mut doc = lopdf::Document::load_mem(&bytes).unwrap();
        let second = doc.get_pages()[&2];
        doc.get_object_mut(second)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Contents", Object::Integer(5));
        bytes.clear();
        doc.save_to(&mut bytes).unwrap();

        let pdf = Pdf::open(&bytes, None).unwrap();
        assert!(pdf.page(1).is_err());
        let cards = pdf.extract_cards();
        // "CARD" triggers the structured reader, which always yields four.
        assert_eq!(cards.len(), 4);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let contents: Vec<Vec<u8>> = (0..6)
            .map(|i| {
                let serial = format!("CARD0000{i}");
                words_line(&["BINGO", serial.as_str()], 700)
            })
            .collect();
        let refs: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();
        let pdf = Pdf::open(&pdf_with_pages(&refs), None).unwrap();
        assert_eq!(pdf.extract_cards_parallel(), pdf.extract_cards());
    }
}
