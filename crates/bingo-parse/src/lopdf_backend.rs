//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate.

use bingo_core::{BBox, Ctm, ExtractOptions, PdfError};

use crate::backend::PdfBackend;
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::{InterpreterState, interpret_content_stream};

/// Longest chain of indirect references followed by [`resolve`].
const MAX_REFERENCE_CHAIN: usize = 32;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in document order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: lopdf::ObjectId,
    /// The 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<LopdfDocument, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Parse(
                "encrypted documents are not supported".to_string(),
            ));
        }

        let page_ids = inner.get_pages().values().copied().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &LopdfDocument) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &LopdfDocument, index: usize) -> Result<LopdfPage, BackendError> {
        let object_id = doc.page_ids.get(index).copied().ok_or(BackendError::Core(
            PdfError::PageOutOfRange {
                index,
                count: doc.page_ids.len(),
            },
        ))?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &LopdfDocument, page: &LopdfPage) -> Result<BBox, BackendError> {
        let obj = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        let array = resolve(&doc.inner, obj)
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        extract_bbox_from_array(array)
    }

    fn interpret_page(
        doc: &LopdfDocument,
        page: &LopdfPage,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), BackendError> {
        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page.object_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        let media_box = Self::page_media_box(doc, page)?;
        let content = get_page_content_bytes(inner, page_dict)?;
        let resources = get_page_resources(inner, page.object_id)?;

        // User space is shifted so the MediaBox origin sits at (0, 0).
        let mut state = InterpreterState::new(Ctm::translation(-media_box.x0, -media_box.top));
        interpret_content_stream(inner, &content, resources, handler, options, 0, &mut state)
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Follow indirect references. Dangling references resolve to themselves.
pub(crate) fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    let mut current = obj;
    for _ in 0..MAX_REFERENCE_CHAIN {
        match current {
            lopdf::Object::Reference(id) => match doc.get_object(*id) {
                Ok(next) => current = next,
                Err(_) => return current,
            },
            _ => return current,
        }
    }
    current
}

/// `[x0 y0 x1 y1]` with the corners normalized.
fn extract_bbox_from_array(array: &[lopdf::Object]) -> Result<BBox, BackendError> {
    let [x0, y0, x1, y1] = array else {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    };
    let (x0, y0, x1, y1) = (
        object_to_f64(x0)?,
        object_to_f64(y0)?,
        object_to_f64(x1)?,
        object_to_f64(y1)?,
    );
    Ok(BBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
}

/// Look up a key on the page dictionary, walking up /Parent links.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    // Cyclic /Parent chains end after MAX_REFERENCE_CHAIN steps.
    for _ in 0..MAX_REFERENCE_CHAIN {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Content bytes of a page; arrays of streams are joined with a space.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve(doc, contents) {
        lopdf::Object::Stream(stream) => decode_content_stream(stream),
        lopdf::Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&decode_content_stream(stream)?);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// Decode a stream, decompressing if it carries a /Filter.
pub(crate) fn decode_content_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// The page's resources, inherited if needed; empty when there are none.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    static EMPTY_DICT: std::sync::LazyLock<lopdf::Dictionary> =
        std::sync::LazyLock::new(lopdf::Dictionary::new);

    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY_DICT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CharCollector;
    use lopdf::{Document, Object, ObjectId, Stream, dictionary};

    /// One page per entry; each is `(media box, content)`.
    fn build_pdf(pages: &[([i64; 4], &str)], inherit_media_box: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font },
        });

        let mut kids: Vec<Object> = Vec::new();
        for (media_box, content) in pages {
            let stream = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => stream,
            };
            if !inherit_media_box {
                page.set(
                    "MediaBox",
                    media_box.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
                );
            }
            kids.push(doc.add_object(page).into());
        }

        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Count" => pages.len() as i64,
            "Kids" => kids,
            "Resources" => resources,
        };
        if inherit_media_box {
            pages_dict.set(
                "MediaBox",
                vec![0.into(), 0.into(), 612.into(), 792.into()],
            );
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    fn chars_of(bytes: &[u8], index: usize) -> (BBox, Vec<bingo_core::Char>) {
        let doc = LopdfBackend::open(bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, index).unwrap();
        let media_box = LopdfBackend::page_media_box(&doc, &page).unwrap();
        let mut collector = CharCollector::new(media_box.height());
        LopdfBackend::interpret_page(&doc, &page, &mut collector, &ExtractOptions::default())
            .unwrap();
        (media_box, collector.into_chars())
    }

    #[test]
    fn opens_and_counts_pages() {
        let pdf = build_pdf(
            &[([0, 0, 612, 792], ""), ([0, 0, 612, 792], ""), ([0, 0, 612, 792], "")],
            false,
        );
        let doc = LopdfBackend::open(&pdf).unwrap();
        assert_eq!(LopdfBackend::page_count(&doc), 3);
        assert_eq!(LopdfBackend::get_page(&doc, 2).unwrap().index, 2);
    }

    #[test]
    fn page_out_of_range() {
        let pdf = build_pdf(&[([0, 0, 612, 792], "")], false);
        let doc = LopdfBackend::open(&pdf).unwrap();
        let err: PdfError = LopdfBackend::get_page(&doc, 1).unwrap_err().into();
        assert_eq!(err, PdfError::PageOutOfRange { index: 1, count: 1 });
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = LopdfBackend::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn media_box_is_inherited() {
        let pdf = build_pdf(&[([0, 0, 0, 0], "")], true);
        let doc = LopdfBackend::open(&pdf).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let mb = LopdfBackend::page_media_box(&doc, &page).unwrap();
        assert_eq!((mb.width(), mb.height()), (612.0, 792.0));
    }

    #[test]
    fn extracts_chars_with_inherited_resources() {
        let pdf = build_pdf(&[([0, 0, 612, 792], "BT /F1 12 Tf 72 720 Td (B7) Tj ET")], false);
        let (_, chars) = chars_of(&pdf, 0);
        let text: String = chars.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(text, "B7");
        assert!((chars[0].bbox.x0 - 72.0).abs() < 1e-6);
        assert!((chars[0].bbox.bottom - 75.0).abs() < 1e-6);
    }

    #[test]
    fn offset_media_box_is_normalized() {
        let pdf = build_pdf(
            &[([100, 200, 712, 992], "BT /F1 12 Tf 172 920 Td (1) Tj ET")],
            false,
        );
        let (mb, chars) = chars_of(&pdf, 0);
        assert_eq!(mb.height(), 792.0);
        assert!((chars[0].bbox.x0 - 72.0).abs() < 1e-6);
        assert!((chars[0].bbox.bottom - 75.0).abs() < 1e-6);
    }

    #[test]
    fn contents_array_is_concatenated() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let a = doc.add_object(Stream::new(dictionary! {}, b"BT /F1 10 Tf 10 10 Td (1)".to_vec()));
        let b = doc.add_object(Stream::new(dictionary! {}, b"Tj ET".to_vec()));
        let font = doc.add_object(dictionary! { "Type" => "Font", "BaseFont" => "Helvetica" });
        let page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
            "Contents" => vec![a.into(), b.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font } },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => 1i64,
                "Kids" => vec![page.into()],
            }),
        );
        let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();

        let (_, chars) = chars_of(&buf, 0);
        assert_eq!(chars.len(), 1);
        assert_eq!(chars[0].text, "1");
    }

    #[test]
    fn object_to_f64_accepts_numbers_only() {
        assert_eq!(object_to_f64(&Object::Integer(3)).unwrap(), 3.0);
        assert_eq!(object_to_f64(&Object::Real(1.5)).unwrap(), 1.5);
        assert!(object_to_f64(&Object::Boolean(true)).is_err());
    }

    #[test]
    fn resolve_follows_references() {
        let mut doc = Document::with_version("1.5");
        let id = doc.add_object(Object::Integer(7));
        let reference = Object::Reference(id);
        assert!(matches!(resolve(&doc, &reference), Object::Integer(7)));
        let dangling = Object::Reference((999, 0));
        assert!(matches!(resolve(&doc, &dangling), Object::Reference((999, 0))));
    }
}
