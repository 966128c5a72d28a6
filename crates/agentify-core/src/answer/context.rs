//! Context assembly
//!
//! Vector passages come first, in index order, followed by the top web
//! snippet. Parts are joined with a single newline. Nothing is re-ordered
//! or deduplicated.

use crate::retrieval::RetrievedDocument;
use std::fmt;

/// Newline-joined retrieval output handed to the prompt renderer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    text: String,
    vector_documents: usize,
    web_included: bool,
    truncated: bool,
}

impl Context {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Vector passages that made it into the text
    pub fn vector_documents(&self) -> usize {
        self.vector_documents
    }

    pub fn web_included(&self) -> bool {
        self.web_included
    }

    /// Whether a size cap removed or cut anything
    pub fn truncated(&self) -> bool {
        self.truncated
    }

}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Merge vector passages and the first web snippet
pub fn assemble<S: AsRef<str>>(vector_docs: &[RetrievedDocument], web_snippets: &[S]) -> Context {
    assemble_bounded(vector_docs, web_snippets, None)
}

/// Like [`assemble`], optionally capped at `max_chars` characters.
///
/// Over the cap, vector passages are dropped from the lowest-similarity end
/// while more than one part remains. A single remaining part that still
/// exceeds the cap is cut at a character boundary. A cap of zero is treated
/// as no cap, so retrieved content never collapses to an empty context.
pub fn assemble_bounded<S: AsRef<str>>(
    vector_docs: &[RetrievedDocument],
    web_snippets: &[S],
    max_chars: Option<usize>,
) -> Context {
    let max_chars = max_chars.filter(|&cap| cap > 0);
    let web = web_snippets.first().map(|s| s.as_ref());
    let mut kept = vector_docs.len();
    let mut truncated = false;

    if let Some(cap) = max_chars {
        while kept + usize::from(web.is_some()) > 1
            && joined_chars(&vector_docs[..kept], web) > cap
        {
            kept -= 1;
            truncated = true;
        }
    }

    let mut parts: Vec<&str> = vector_docs[..kept]
        .iter()
        .map(|d| d.content.as_str())
        .collect();
    if let Some(web) = web {
        parts.push(web);
    }
    let mut text = parts.join("\n");

    if let Some(cap) = max_chars {
        if text.chars().count() > cap {
            text = text.chars().take(cap).collect();
            truncated = true;
        }
    }

    // A positive cap drops vector passages before the snippet and only cuts
    // a lone part, so the snippet is always at least partly in the text.
    Context {
        text,
        vector_documents: kept,
        web_included: web.is_some(),
        truncated,
    }
}

fn joined_chars(vector_docs: &[RetrievedDocument], web: Option<&str>) -> usize {
    let parts = vector_docs.len() + usize::from(web.is_some());
    let content: usize = vector_docs
        .iter()
        .map(|d| d.content.chars().count())
        .sum::<usize>()
        + web.map_or(0, |w| w.chars().count());
    content + parts.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn docs(contents: &[&str]) -> Vec<RetrievedDocument> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| RetrievedDocument::from_index(*c, Some(1.0 - i as f32 * 0.1)))
            .collect()
    }

    const NO_WEB: &[&str] = &[];

    #[test]
    fn test_vector_then_first_web_snippet() {
        let ctx = assemble(&docs(&["a", "b", "c"]), &["web1", "web2"]);
        assert_eq!(ctx.as_str(), "a\nb\nc\nweb1");
        assert_eq!(ctx.vector_documents(), 3);
        assert!(ctx.web_included());
        assert!(!ctx.truncated());
    }

    #[test]
    fn test_both_sources_empty() {
        let ctx = assemble(&[], NO_WEB);
        assert!(ctx.is_empty());
        assert_eq!(ctx.as_str(), "");
    }

    #[test]
    fn test_web_only() {
        let ctx = assemble(&[], &["snippet"]);
        assert_eq!(ctx.as_str(), "snippet");
        assert_eq!(ctx.vector_documents(), 0);
    }

    #[test]
    fn test_vector_only() {
        let ctx = assemble(&docs(&["a", "b"]), NO_WEB);
        assert_eq!(ctx.as_str(), "a\nb");
        assert!(!ctx.web_included());
    }

    #[test]
    fn test_no_deduplication() {
        let ctx = assemble(&docs(&["same", "same"]), &["same"]);
        assert_eq!(ctx.as_str(), "same\nsame\nsame");
    }

    #[test]
    fn test_cap_drops_lowest_vector_documents_first() {
        // "aaaa\nbbbb\ncccc\nweb" is 18 chars
        let vector = docs(&["aaaa", "bbbb", "cccc"]);
        let ctx = assemble_bounded(&vector, &["web"], Some(13));
        assert_eq!(ctx.as_str(), "aaaa\nbbbb\nweb");
        assert_eq!(ctx.vector_documents(), 2);
        assert!(ctx.truncated());
    }

    #[test]
    fn test_cap_keeps_web_until_alone() {
        let vector = docs(&["aaaa", "bbbb"]);
        let ctx = assemble_bounded(&vector, &["web snippet"], Some(11));
        assert_eq!(ctx.as_str(), "web snippet");
        assert_eq!(ctx.vector_documents(), 0);
    }

    #[test]
    fn test_cap_cuts_single_part_on_char_boundary() {
        let ctx = assemble_bounded(&[], &["₹500 annual fee"], Some(4));
        assert_eq!(ctx.as_str(), "₹500");
        assert!(ctx.truncated());

        let ctx = assemble_bounded(&docs(&["a long top passage"]), NO_WEB, Some(6));
        assert_eq!(ctx.as_str(), "a long");
        assert_eq!(ctx.vector_documents(), 1);
    }

    #[test]
    fn test_zero_cap_keeps_everything() {
        let vector = docs(&["SBI Platinum debit card"]);
        let ctx = assemble_bounded(&vector, &["web"], Some(0));
        assert!(!ctx.is_empty());
        assert_eq!(ctx.as_str(), "SBI Platinum debit card\nweb");
        assert_eq!(ctx.vector_documents(), 1);
        assert!(ctx.web_included());
        assert!(!ctx.truncated());
    }

    #[test]
    fn test_web_included_matches_text() {
        let vector = docs(&["aaaa", "bbbb"]);
        let ctx = assemble_bounded(&vector, &["web snippet"], Some(3));
        assert_eq!(ctx.as_str(), "web");
        assert!(ctx.web_included());
        assert_eq!(ctx.vector_documents(), 0);

        let ctx = assemble_bounded(&vector, NO_WEB, Some(3));
        assert_eq!(ctx.as_str(), "aaa");
        assert!(!ctx.web_included());
    }

    #[test]
    fn test_cap_not_reached() {
        let vector = docs(&["a", "b"]);
        let capped = assemble_bounded(&vector, &["w"], Some(100));
        assert_eq!(capped, assemble(&vector, &["w"]));
    }

    proptest! {
        #[test]
        fn prop_assembly_is_deterministic(
            vector in prop::collection::vec("[a-zA-Z0-9 ]{0,20}", 0..6),
            web in prop::collection::vec("[a-zA-Z0-9 ]{0,20}", 0..3),
        ) {
            let vector_docs: Vec<RetrievedDocument> = vector
                .iter()
                .map(|c| RetrievedDocument::from_index(c.clone(), None))
                .collect();

            let first = assemble(&vector_docs, web.as_slice());
            let second = assemble(&vector_docs, web.as_slice());
            prop_assert_eq!(first.as_str(), second.as_str());

            let mut expected: Vec<&str> = vector.iter().map(String::as_str).collect();
            if let Some(w) = web.first() {
                expected.push(w.as_str());
            }
            prop_assert_eq!(first.as_str(), expected.join("\n"));
        }

        #[test]
        fn prop_cap_is_respected(
            vector in prop::collection::vec("[a-z]{1,30}", 0..6),
            web in prop::collection::vec("[a-z]{1,30}", 0..2),
            cap in 1usize..80,
        ) {
            let vector_docs: Vec<RetrievedDocument> = vector
                .iter()
                .map(|c| RetrievedDocument::from_index(c.clone(), None))
                .collect();

            let ctx = assemble_bounded(&vector_docs, web.as_slice(), Some(cap));
            prop_assert!(ctx.as_str().chars().count() <= cap);
            if !vector.is_empty() || !web.is_empty() {
                prop_assert!(!ctx.is_empty());
            }
            prop_assert_eq!(ctx.web_included(), !web.is_empty());
            if let Some(w) = web.first() {
                prop_assert!(ctx.as_str().ends_with(w.as_str()) || w.starts_with(ctx.as_str()));
            }
        }
    }
}
