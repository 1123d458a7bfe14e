// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text-extraction collaborator boundary.
//!
//! The core never parses document formats itself; it consumes per-page text
//! from an extractor behind this trait. A real PDF extractor plugs in behind
//! the same interface.

use anyhow::Result;

pub trait TextExtractor: Send + Sync {
    /// Extract per-page text from raw uploaded bytes.
    fn extract(&self, raw: &[u8]) -> Result<Vec<String>>;
}

/// Extractor for plain-text uploads. Decodes as UTF-8 (lossily) and treats
/// form feeds as page separators, the convention PDF text dumps use.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, raw: &[u8]) -> Result<Vec<String>> {
        let text = String::from_utf8_lossy(raw);
        Ok(text
            .split('\x0c')
            .filter(|page| !page.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_text() {
        let pages = PlainTextExtractor.extract(b"just one page").unwrap();
        assert_eq!(pages, vec!["just one page".to_string()]);
    }

    #[test]
    fn form_feed_separates_pages() {
        let pages = PlainTextExtractor
            .extract(b"page one\x0cpage two\x0cpage three")
            .unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1], "page two");
    }

    #[test]
    fn empty_pages_are_dropped() {
        let pages = PlainTextExtractor.extract(b"\x0c\x0ccontent\x0c").unwrap();
        assert_eq!(pages, vec!["content".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_pages() {
        assert!(PlainTextExtractor.extract(b"").unwrap().is_empty());
    }
}
