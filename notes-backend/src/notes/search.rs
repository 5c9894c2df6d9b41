//! Literal, case-insensitive full-text search over note files.
//!
//! Every note whose raw content contains the query yields up to
//! [`MAX_MATCHES_PER_NOTE`] snippets. A snippet is a character window of
//! [`CONTEXT_CHARS`] on each side of the hit, independent of line breaks,
//! flattened to one line, HTML-escaped, with the hit wrapped in `<mark>`.

use notes_types::{SearchMatch, SearchResult};
use regex::{Regex, RegexBuilder};
use std::path::Path;
use std::sync::Arc;

use super::file_ops;
use crate::vfs::FileSystem;

pub const CONTEXT_CHARS: usize = 15;
pub const MAX_MATCHES_PER_NOTE: usize = 3;

/// Compiled-size budget per query byte. Case-insensitive letters expand into
/// small classes, so the regex default of 10 MiB caps queries well below 200k chars.
const SIZE_LIMIT_PER_QUERY_BYTE: usize = 1024;
const MIN_SIZE_LIMIT: usize = 10 * (1 << 20);

const ELLIPSIS: &str = "...";
const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

pub struct SearchEngine {
    fs: Arc<dyn FileSystem>,
}

impl SearchEngine {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Search every markdown note under `root`. Notes that cannot be read are
    /// skipped; results are ordered by relative path.
    pub fn search(&self, root: &Path, query: &str) -> Vec<SearchResult> {
        let Some(matcher) = literal_matcher(query) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        for file in self.fs.list_files(root, file_ops::NOTE_EXTENSIONS) {
            let content = match self.fs.read_to_string(&file) {
                Ok(c) => c,
                Err(e) => {
                    log::debug!("[SEARCH] Skipping {}: {}", file.display(), e);
                    continue;
                }
            };

            let matches = find_matches(&matcher, &content);
            if matches.is_empty() {
                continue;
            }

            let Some(path) = file_ops::relative_path(root, &file) else {
                continue;
            };
            results.push(SearchResult {
                name: file_ops::file_stem(&file),
                folder: file_ops::parent_folder(&path),
                path,
                matches,
            });
        }

        results.sort_by(|a, b| a.path.cmp(&b.path));
        log::debug!(
            "[SEARCH] {:?} matched {} notes under {}",
            query,
            results.len(),
            root.display()
        );
        results
    }
}

/// Case-insensitive matcher for `query` taken literally. None for a blank query.
pub fn literal_matcher(query: &str) -> Option<Regex> {
    if query.trim().is_empty() {
        return None;
    }
    let size_limit = query
        .len()
        .saturating_mul(SIZE_LIMIT_PER_QUERY_BYTE)
        .max(MIN_SIZE_LIMIT);
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .size_limit(size_limit)
        .dfa_size_limit(size_limit)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("[SEARCH] Query rejected: {}", e);
            None
        }
    }
}

/// The first [`MAX_MATCHES_PER_NOTE`] hits of `matcher` in `content`.
pub fn find_matches(matcher: &Regex, content: &str) -> Vec<SearchMatch> {
    matcher
        .find_iter(content)
        .take(MAX_MATCHES_PER_NOTE)
        .map(|m| SearchMatch {
            line_number: content[..m.start()].matches('\n').count() + 1,
            context: build_snippet(content, m.start(), m.end()),
        })
        .collect()
}

/// Build the highlighted snippet for the hit at byte range `start..end`.
fn build_snippet(content: &str, start: usize, end: usize) -> String {
    let window_start = content[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let window_end = content[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(i, _)| end + i)
        .unwrap_or(content.len());

    let before = flatten(&content[window_start..start]);
    let after = flatten(&content[end..window_end]);

    let mut snippet = String::new();
    if window_start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&escape_html(&before));
    snippet.push_str(MARK_OPEN);
    snippet.push_str(&escape_html(&content[start..end]));
    snippet.push_str(MARK_CLOSE);
    snippet.push_str(&escape_html(&after));
    if window_end < content.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn flatten(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::PhysicalFileSystem;
    use std::fs;
    use tempfile::tempdir;

    fn matches_in(content: &str, query: &str) -> Vec<SearchMatch> {
        let matcher = literal_matcher(query).unwrap();
        find_matches(&matcher, content)
    }

    #[test]
    fn test_long_query_still_matches() {
        let query: String = "abcdefghij".repeat(20_000);
        let content = format!("x {} y", query.to_uppercase());

        let matches = matches_in(&content, &query);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].context.starts_with("x <mark>ABCDEFGHIJ"));
        assert!(matches[0].context.ends_with("</mark> y"));
    }

    #[test]
    fn test_case_insensitive_preserves_original_casing() {
        let matches = matches_in("Hello world, hello again", "hello");
        assert_eq!(matches.len(), 2);
        assert_eq!(
            matches[0].context,
            "<mark>Hello</mark> world, hello a..."
        );
        assert_eq!(
            matches[1].context,
            "Hello world, <mark>hello</mark> again"
        );
        assert!(matches.iter().all(|m| m.line_number == 1));
    }

    #[test]
    fn test_match_at_start_has_no_leading_ellipsis() {
        let matches = matches_in("needle in a very long haystack of words", "needle");
        assert!(matches[0].context.starts_with("<mark>needle</mark>"));
        assert!(matches[0].context.ends_with("..."));
    }

    #[test]
    fn test_match_near_end_has_no_trailing_ellipsis() {
        let matches = matches_in("a long lead-in sentence before the end", "end");
        assert!(matches[0].context.starts_with("..."));
        assert!(matches[0].context.ends_with("<mark>end</mark>"));
    }

    #[test]
    fn test_window_is_fifteen_chars_each_side() {
        let content = format!("{}X{}", "a".repeat(20), "b".repeat(20));
        let matches = matches_in(&content, "x");
        assert_eq!(
            matches[0].context,
            format!("...{}<mark>X</mark>{}...", "a".repeat(15), "b".repeat(15))
        );
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let content = format!("{}needle{}", "é".repeat(20), "ü".repeat(20));
        let matches = matches_in(&content, "NEEDLE");
        assert_eq!(
            matches[0].context,
            format!("...{}<mark>needle</mark>{}...", "é".repeat(15), "ü".repeat(15))
        );
    }

    #[test]
    fn test_window_spans_lines_and_is_flattened() {
        let content = "first line\nsecond target\nthird";
        let matches = matches_in(content, "target");
        assert_eq!(matches[0].line_number, 2);
        assert_eq!(
            matches[0].context,
            "...st line second <mark>target</mark> third"
        );
        assert!(!matches[0].context.contains('\n'));
    }

    #[test]
    fn test_surrounding_text_is_escaped() {
        let matches = matches_in("<b>x</b> & \"q\" find 'me'", "find");
        assert_eq!(
            matches[0].context,
            "&lt;b&gt;x&lt;/b&gt; &amp; &quot;q&quot; <mark>find</mark> &#x27;me&#x27;"
        );
    }

    #[test]
    fn test_matched_text_is_escaped() {
        let matches = matches_in("use a<b here", "A<B");
        assert_eq!(matches[0].context, "use <mark>a&lt;b</mark> here");
    }

    #[test]
    fn test_query_is_literal_not_pattern() {
        assert!(matches_in("axb", "a.b").is_empty());
        let matches = matches_in("axb and a.b", "a.b");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].context.contains("<mark>a.b</mark>"));
        assert_eq!(matches_in("cost is $5 (approx)", "$5 (").len(), 1);
    }

    #[test]
    fn test_at_most_three_matches() {
        let matches = matches_in("x x x x x", "x");
        assert_eq!(matches.len(), MAX_MATCHES_PER_NOTE);
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let matches = matches_in("zero\none\ntwo key\n\nfour key", "key");
        let lines: Vec<_> = matches.iter().map(|m| m.line_number).collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        assert!(literal_matcher("").is_none());
        assert!(literal_matcher("   ").is_none());
    }

    #[test]
    fn test_search_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("projects")).unwrap();
        fs::write(root.join("projects/rust.md"), "Learning Rust ownership").unwrap();
        fs::write(root.join("todo.md"), "buy milk\nlearn RUST").unwrap();
        fs::write(root.join("other.md"), "nothing relevant").unwrap();
        fs::write(root.join("image.png"), "rust in a png").unwrap();

        let engine = SearchEngine::new(Arc::new(PhysicalFileSystem));
        let results = engine.search(root, "rust");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path, "projects/rust.md");
        assert_eq!(results[0].name, "rust");
        assert_eq!(results[0].folder, "projects");
        assert_eq!(results[1].path, "todo.md");
        assert_eq!(results[1].folder, "");
        assert_eq!(results[1].matches[0].line_number, 2);
    }

    #[test]
    fn test_search_skips_unreadable_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("good.md"), "findme").unwrap();
        fs::write(root.join("bad.md"), [0xff, 0xfe, 0xfd]).unwrap();

        let engine = SearchEngine::new(Arc::new(PhysicalFileSystem));
        let results = engine.search(root, "findme");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "good.md");
    }
}
