//! Final document assembly and persistence.
//!
//! Accepted captures are merged page by page into one lopdf document, the
//! `/Info` dictionary is attached and the result is written to its
//! destination, replacing whatever was there.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};
use time::OffsetDateTime;

use crate::config::defaults::DEFAULT_OUTPUT_NAME;
use crate::error::PaginationError;
use crate::model::{pdf_date, AcceptedPages, DocumentMetadata, RawPage, RenderedDocument};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Where a document ended up and how many pages it has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOutcome {
    pub path: PathBuf,
    pub page_count: usize,
}

/// `<temp dir>/untitled.pdf`, the fixed default destination
pub fn default_output_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_OUTPUT_NAME)
}

/// A fresh, never-before-returned path in the temp directory
pub fn unique_temp_path() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let sequence = COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = OffsetDateTime::now_utc().unix_timestamp_nanos();
    std::env::temp_dir().join(format!(
        "paginated-{}-{}-{}.pdf",
        std::process::id(),
        stamp,
        sequence
    ))
}

/// PDF text string: literal for ASCII, UTF-16BE with a byte order mark otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

fn object_type(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    dict.get(b"Type").and_then(Object::as_name).ok()
}

/// Look `key` up the page tree above `page`
fn inherited(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(id) = parent {
        let node = source.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn save(doc: &mut Document) -> Result<Vec<u8>, PaginationError> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PaginationError::Assembly(format!("Failed to serialize document: {}", e)))?;
    Ok(bytes)
}

pub struct PdfAssembler {
    metadata: DocumentMetadata,
}

impl PdfAssembler {
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self { metadata }
    }

    fn info_dictionary(&self) -> Dictionary {
        let meta = &self.metadata;
        let mut info = Dictionary::new();

        let entries = [
            ("Title", meta.title.clone()),
            ("Author", meta.author.clone()),
            ("Subject", meta.subject.clone()),
            ("Keywords", meta.keywords_string()),
            ("Creator", meta.creator.clone()),
            ("Producer", Some(meta.producer.clone())),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                info.set(key, text_string(&value));
            }
        }
        info.set("CreationDate", Object::string_literal(pdf_date(meta.created)));
        info.set("ModDate", Object::string_literal(pdf_date(meta.modified)));
        info
    }

    fn attach_info(&self, doc: &mut Document) {
        let info_id = doc.add_object(self.info_dictionary());
        doc.trailer.set("Info", info_id);
    }

    /// Merge the first page of every capture, in order, into one document.
    pub fn merge_captures(&self, pages: &[RawPage]) -> Result<Vec<u8>, PaginationError> {
        if pages.is_empty() {
            return Err(PaginationError::Assembly("no pages to assemble".to_string()));
        }

        let mut output = Document::with_version("1.5");
        let pages_id = output.new_object_id();
        let mut next_id = pages_id.0 + 1;
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for raw in pages {
            let mut source = Document::load_mem(&raw.bytes).map_err(|e| {
                PaginationError::Assembly(format!("Page {} is not a readable PDF: {}", raw.index, e))
            })?;
            source.renumber_objects_with(next_id);
            next_id = source.max_id + 1;

            let page_id: ObjectId = source.get_pages().into_values().next().ok_or_else(|| {
                PaginationError::Assembly(format!("Page {} contains no pages", raw.index))
            })?;
            let mut page = source
                .get_dictionary(page_id)
                .map_err(|e| PaginationError::Assembly(format!("Page {}: {}", raw.index, e)))?
                .clone();

            for key in INHERITABLE {
                if page.get(key).is_err() {
                    if let Some(value) = inherited(&source, &page, key) {
                        page.set(key, value);
                    }
                }
            }
            page.set("Parent", pages_id);

            for (id, object) in source.objects {
                let skip = matches!(
                    object_type(&object),
                    Some(b"Catalog") | Some(b"Pages") | Some(b"Page")
                );
                if !skip {
                    output.objects.insert(id, object);
                }
            }
            output.objects.insert(page_id, Object::Dictionary(page));
            kids.push(page_id.into());
        }
        output.max_id = next_id - 1;

        output.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);
        self.attach_info(&mut output);

        // Other pages of each capture and their content are now unreachable
        output.prune_objects();
        output.renumber_objects();
        output.compress();

        save(&mut output)
    }

    /// Attach metadata to a backend-built document, keeping all its pages.
    pub fn finish_document(&self, document: &RenderedDocument) -> Result<Vec<u8>, PaginationError> {
        let mut doc = Document::load_mem(&document.bytes)
            .map_err(|e| PaginationError::Assembly(format!("Backend document is not readable: {}", e)))?;
        if doc.get_pages().is_empty() {
            return Err(PaginationError::Assembly("backend document has no pages".to_string()));
        }
        self.attach_info(&mut doc);
        save(&mut doc)
    }

    /// Serialize accepted pages without touching the filesystem
    pub fn to_bytes(&self, pages: &AcceptedPages) -> Result<Vec<u8>, PaginationError> {
        match pages {
            AcceptedPages::Captures(captures) => self.merge_captures(captures),
            AcceptedPages::Document(document) => self.finish_document(document),
        }
    }

    /// Write `bytes` to `path`, removing any existing file first
    pub fn write(&self, bytes: &[u8], path: &Path) -> Result<(), PaginationError> {
        let write_error = |source: io::Error| PaginationError::Write {
            path: path.to_path_buf(),
            source,
        };

        match fs::remove_file(path) {
            Ok(()) => log::debug!("Removed existing {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(write_error(e)),
        }
        fs::write(path, bytes).map_err(write_error)
    }

    /// Assemble `pages` and persist them at `path`
    pub fn assemble(&self, pages: &AcceptedPages, path: &Path) -> Result<AssemblyOutcome, PaginationError> {
        let bytes = self.to_bytes(pages)?;
        self.write(&bytes, path)?;
        log::info!(
            "Wrote {} pages ({} bytes) to {}",
            pages.page_count(),
            bytes.len(),
            path.display()
        );
        Ok(AssemblyOutcome {
            path: path.to_path_buf(),
            page_count: pages.page_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Appearance;
    use crate::model::{Point, Rect, Size};
    use crate::parser::markdown::parse_markdown;
    use crate::surface::capture::write_captures;
    use crate::surface::layout::layout_blocks;
    use crate::surface::Capture;

    fn capture_pages(count: usize) -> Vec<RawPage> {
        let markdown = "Some paragraph text for the page.\n\n".repeat(80);
        let layout = layout_blocks(&parse_markdown(&markdown), &Appearance::default(), 595.0, 36.0);
        (0..count)
            .map(|i| {
                let capture = Capture {
                    source: Rect::new(0.0, i as f32 * 770.0, 595.0, 770.0),
                    media: Size::new(595.0, 842.0),
                    origin: Point::new(0.0, 36.0),
                };
                RawPage::new(i, write_captures(&layout, &[capture]).unwrap())
            })
            .collect()
    }

    fn assembler() -> PdfAssembler {
        let metadata = DocumentMetadata::default()
            .with_title("Assembled")
            .with_timestamp(OffsetDateTime::from_unix_timestamp(1_735_787_045).unwrap());
        PdfAssembler::new(metadata)
    }

    #[test]
    fn test_merge_preserves_order_and_count() {
        let pages = capture_pages(3);
        let bytes = assembler().merge_captures(&pages).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_only_first_page_of_each_source_is_used() {
        let markdown = "Text.\n\n".repeat(200);
        let layout = layout_blocks(&parse_markdown(&markdown), &Appearance::default(), 595.0, 36.0);
        let captures: Vec<Capture> = (0..2)
            .map(|i| Capture {
                source: Rect::new(0.0, i as f32 * 770.0, 595.0, 770.0),
                media: Size::new(595.0, 842.0),
                origin: Point::new(0.0, 36.0),
            })
            .collect();
        let two_page = RawPage::new(0, write_captures(&layout, &captures).unwrap());

        let bytes = assembler().merge_captures(&[two_page.clone(), two_page]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let pages = capture_pages(2);
        let first = assembler().merge_captures(&pages).unwrap();
        let second = assembler().merge_captures(&pages).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_info_dictionary() {
        let bytes = assembler().merge_captures(&capture_pages(1)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Assembled");
        assert_eq!(
            info.get(b"CreationDate").unwrap().as_str().unwrap(),
            b"D:20250102030405Z"
        );
    }

    #[test]
    fn test_unreadable_page_is_assembly_failure() {
        let pages = vec![RawPage::new(4, b"garbage".to_vec())];
        match assembler().merge_captures(&pages) {
            Err(PaginationError::Assembly(message)) => assert!(message.contains("Page 4")),
            other => panic!("expected assembly failure, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(assembler().merge_captures(&[]).is_err());
    }

    #[test]
    fn test_assemble_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        fs::write(&path, b"stale contents").unwrap();

        let pages = AcceptedPages::Captures(capture_pages(2));
        let outcome = assembler().assemble(&pages, &path).unwrap();
        assert_eq!(outcome.page_count, 2);
        assert_eq!(outcome.path, path);

        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let pages = AcceptedPages::Captures(capture_pages(1));
        match assembler().assemble(&pages, &path) {
            Err(PaginationError::Write { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected write failure, got {:?}", other),
        }
    }

    #[test]
    fn test_text_string_encoding() {
        assert!(matches!(
            text_string("plain"),
            Object::String(bytes, StringFormat::Literal) if bytes == b"plain"
        ));
        match text_string("r\u{e9}sum\u{e9}") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..4], &[0xFE, 0xFF, 0x00, b'r']);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_output_paths() {
        assert!(default_output_path().ends_with(DEFAULT_OUTPUT_NAME));
        assert_ne!(unique_temp_path(), unique_temp_path());
    }
}
