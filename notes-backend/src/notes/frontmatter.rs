//! Extract tags from a note's YAML frontmatter.
//!
//! Hand-rolled line scanner (no serde_yaml): only the `tags` key matters and a
//! malformed block must degrade to "no tags" rather than an error.
//! Also extracts [[wikilinks]] from note content via regex.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const DELIMITER: &str = "---";

static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

/// Parse the tags declared in a note's frontmatter.
///
/// Returns lowercase tags, deduplicated and sorted. Content without a
/// frontmatter block, or with an unterminated one, yields no tags.
///
/// Supported shapes:
/// ```text
/// tags: [a, b]      inline list
/// tags: a           single tag
/// tags:             block list, one "- tag" per line
///   - a
///   - b
/// ```
pub fn parse_tags(content: &str) -> Vec<String> {
    let Some(block) = frontmatter_lines(content) else {
        return Vec::new();
    };

    let mut tags = BTreeSet::new();
    let mut lines = block.iter();

    while let Some(line) = lines.next() {
        let Some(rest) = line.trim().strip_prefix("tags:") else {
            continue;
        };
        let rest = rest.trim();

        if rest.starts_with('[') && rest.ends_with(']') {
            tags.extend(parse_inline_list(rest));
        } else if !rest.is_empty() {
            push_tag(&mut tags, rest);
        } else {
            for item in lines.by_ref() {
                let item = item.trim();
                if let Some(tag) = item.strip_prefix('-') {
                    push_tag(&mut tags, tag);
                } else if item.is_empty() || item.starts_with('#') {
                    continue;
                } else {
                    break;
                }
            }
        }
        break;
    }

    tags.into_iter().collect()
}

/// Lines strictly between the opening and closing `---`, or None when the
/// content has no complete frontmatter block.
fn frontmatter_lines(content: &str) -> Option<Vec<&str>> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with(DELIMITER) {
        return None;
    }

    let mut lines = trimmed.lines();
    if lines.next()?.trim() != DELIMITER {
        return None;
    }

    let mut block = Vec::new();
    for line in lines {
        if line.trim() == DELIMITER {
            return Some(block);
        }
        block.push(line);
    }
    None
}

fn push_tag(tags: &mut BTreeSet<String>, raw: &str) {
    let tag = unquote(raw).to_lowercase();
    if !tag.is_empty() {
        tags.insert(tag);
    }
}

/// Extract [[wikilinks]] from text
pub fn extract_wikilinks(text: &str) -> Vec<String> {
    WIKILINK_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Remove surrounding quotes from a string
fn unquote(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].trim()
    } else {
        s
    }
}

/// Parse an inline YAML list like [foo, Bar, "baz qux"] into lowercase entries
fn parse_inline_list(s: &str) -> Vec<String> {
    let inner = &s[1..s.len() - 1];

    inner
        .split(',')
        .map(|item| unquote(item).to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_list_lowercased_deduplicated_sorted() {
        let content = "---\ntitle: Test\ntags: [B, a, A]\n---\n\nBody";
        assert_eq!(parse_tags(content), vec!["a", "b"]);
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(parse_tags("# Just a heading\n\ntags: [a]").is_empty());
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_unterminated_frontmatter() {
        assert!(parse_tags("---\ntags: [a, b]\n\nno closing delimiter").is_empty());
    }

    #[test]
    fn test_leading_whitespace_before_delimiter() {
        let content = "\n\n  ---\ntags: [rust]\n---\n";
        assert_eq!(parse_tags(content), vec!["rust"]);
    }

    #[test]
    fn test_delimiter_line_must_be_exact() {
        assert!(parse_tags("----\ntags: [a]\n---\n").is_empty());
        assert!(parse_tags("--- title\ntags: [a]\n---\n").is_empty());
    }

    #[test]
    fn test_single_scalar_tag() {
        let content = "---\ntags: Projects\n---\n";
        assert_eq!(parse_tags(content), vec!["projects"]);
    }

    #[test]
    fn test_scalar_with_commas_is_one_tag() {
        let content = "---\ntags: a, b\n---\n";
        assert_eq!(parse_tags(content), vec!["a, b"]);
    }

    #[test]
    fn test_empty_inline_list() {
        assert!(parse_tags("---\ntags: []\n---\n").is_empty());
        assert!(parse_tags("---\ntags: [ , ,]\n---\n").is_empty());
    }

    #[test]
    fn test_quoted_entries() {
        let content = "---\ntags: [\"Deep Work\", 'ideas']\n---\n";
        assert_eq!(parse_tags(content), vec!["deep work", "ideas"]);
    }

    #[test]
    fn test_block_list() {
        let content = "---\ntitle: x\ntags:\n  - Rust\n  - web\n  - rust\ndate: 2024-01-01\n---\n";
        assert_eq!(parse_tags(content), vec!["rust", "web"]);
    }

    #[test]
    fn test_block_list_skips_comments_and_blanks() {
        let content = "---\ntags:\n  - one\n  # a comment\n\n  - two\n---\n";
        assert_eq!(parse_tags(content), vec!["one", "two"]);
    }

    #[test]
    fn test_block_list_ends_at_first_other_line() {
        let content = "---\ntags:\n  - alpha\n  # comment\nstatus: draft\n  - beta\n---\n";
        assert_eq!(parse_tags(content), vec!["alpha"]);
    }

    #[test]
    fn test_tags_key_without_entries() {
        let content = "---\ntags:\ntitle: nothing here\n---\n";
        assert!(parse_tags(content).is_empty());
    }

    #[test]
    fn test_only_first_tags_key_counts() {
        let content = "---\ntags: [first]\ntags: [second]\n---\n";
        assert_eq!(parse_tags(content), vec!["first"]);
    }

    #[test]
    fn test_tags_outside_frontmatter_ignored() {
        let content = "---\ntitle: x\n---\ntags: [body]\n";
        assert!(parse_tags(content).is_empty());
    }

    #[test]
    fn test_extract_wikilinks() {
        let text = "See [[foo]] and [[bar baz]] for details.";
        assert_eq!(extract_wikilinks(text), vec!["foo", "bar baz"]);
    }
}
