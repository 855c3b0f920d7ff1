//! Per-page render products owned by a single pagination request.

use std::fmt;

/// One backend-produced single-page PDF
#[derive(Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Render-order index; the empty-page probe uses the first out-of-bounds index
    pub index: usize,
    pub bytes: Vec<u8>,
}

impl RawPage {
    pub fn new(index: usize, bytes: Vec<u8>) -> Self {
        Self { index, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for RawPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPage")
            .field("index", &self.index)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Compressed-stream byte length recovered from a page's first object
/// dictionary. Only ever compared for equality-with-slack, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamFingerprint(i64);

impl StreamFingerprint {
    pub const NOT_FOUND: StreamFingerprint = StreamFingerprint(-1);

    pub fn new(length: i64) -> Self {
        StreamFingerprint(length)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_found(&self) -> bool {
        self.0 >= 0
    }

    /// True when this page is indistinguishable from the `empty` probe:
    /// both fingerprints are positive and this one is at most `slack` bytes
    /// larger.
    pub fn matches_empty(&self, empty: StreamFingerprint, slack: i64) -> bool {
        empty.0 > 0 && self.0 > 0 && self.0 <= empty.0.saturating_add(slack)
    }
}

impl fmt::Display for StreamFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_found() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("not found")
        }
    }
}

/// A multi-page PDF produced in one piece by a backend (single-shot or
/// print formatter), together with how many pages it holds.
#[derive(Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl fmt::Debug for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedDocument")
            .field("bytes", &self.bytes.len())
            .field("page_count", &self.page_count)
            .finish()
    }
}

/// Pages that survived rendering, ready for assembly
#[derive(Debug, Clone)]
pub enum AcceptedPages {
    /// Single-page captures; the first page of each is used
    Captures(Vec<RawPage>),
    /// A backend-built document, used whole
    Document(RenderedDocument),
}

impl AcceptedPages {
    pub fn page_count(&self) -> usize {
        match self {
            AcceptedPages::Captures(pages) => pages.len(),
            AcceptedPages::Document(document) => document.page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_rule() {
        let empty = StreamFingerprint::new(84);
        assert!(StreamFingerprint::new(90).matches_empty(empty, 16));
        assert!(StreamFingerprint::new(100).matches_empty(empty, 16));
        assert!(!StreamFingerprint::new(101).matches_empty(empty, 16));
        assert!(!StreamFingerprint::new(120).matches_empty(empty, 16));
    }

    #[test]
    fn test_empty_page_rule_needs_both_fingerprints() {
        let empty = StreamFingerprint::new(84);
        assert!(!StreamFingerprint::NOT_FOUND.matches_empty(empty, 16));
        assert!(!StreamFingerprint::new(0).matches_empty(empty, 16));
        assert!(!StreamFingerprint::new(50).matches_empty(StreamFingerprint::NOT_FOUND, 16));
        assert!(!StreamFingerprint::new(50).matches_empty(StreamFingerprint::new(0), 16));
    }

    #[test]
    fn test_smaller_than_empty_is_rejected() {
        // Anything at or below the probe length counts as blank
        let empty = StreamFingerprint::new(84);
        assert!(StreamFingerprint::new(10).matches_empty(empty, 16));
    }
}
