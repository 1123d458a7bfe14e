// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-window chunking of extracted page text.
//!
//! Pages are split into 1000-character windows with no overlap; the final
//! window of a page may be shorter. Joining a page's chunks reproduces the
//! page text exactly.

/// Window length in characters (not bytes).
pub const CHUNK_SIZE: usize = 1000;

/// Split one page of extracted text into chunks. Empty page text contributes
/// no chunks. Windows are indexed by character so multi-byte text never
/// splits a code point.
pub fn chunk_page(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_SIZE)
        .map(|window| window.iter().collect())
        .collect()
}

/// Chunk a sequence of pages, preserving page order.
pub fn chunk_pages(pages: &[String]) -> Vec<String> {
    pages.iter().flat_map(|page| chunk_page(page)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_yields_no_chunks() {
        assert!(chunk_page("").is_empty());
    }

    #[test]
    fn short_page_is_a_single_chunk() {
        let chunks = chunk_page("hello");
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn page_of_2500_chars_yields_three_chunks() {
        let page: String = (0..2500).map(|i| ((b'a' + (i % 26) as u8) as char)).collect();
        let chunks = chunk_page(&page);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 1000);
        assert_eq!(chunks[2].chars().count(), 500);
    }

    #[test]
    fn concatenating_chunks_reproduces_the_page() {
        let page: String = "the quick brown fox ".repeat(173); // 3460 chars
        let chunks = chunk_page(&page);
        assert_eq!(chunks.concat(), page);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), CHUNK_SIZE);
        }
        assert!(chunks[chunks.len() - 1].chars().count() <= CHUNK_SIZE);
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let page = "z".repeat(2000);
        let chunks = chunk_page(&page);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() == CHUNK_SIZE));
    }

    #[test]
    fn multibyte_text_chunks_on_character_boundaries() {
        let page = "é".repeat(1500);
        let chunks = chunk_page(&page);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks.concat(), page);
    }

    #[test]
    fn pages_chunk_independently_and_in_order() {
        let pages = vec!["a".repeat(1200), String::new(), "b".repeat(10)];
        let chunks = chunk_pages(&pages);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 200);
        assert_eq!(chunks[2], "b".repeat(10));
    }
}
