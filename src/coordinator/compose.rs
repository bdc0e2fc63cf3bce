//! Answer composition text cleaning and smart truncation (§4.12 "Text
//! cleaning and truncation").

use std::sync::LazyLock;

use regex::Regex;

static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\r?\n.*?\r?\n---\r?\n?").unwrap());
static XML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(title|description|author|published|created|lastUpdated|chatbotDeprioritize|source_url|html|md):\s*.*$")
        .unwrap()
});
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s").unwrap());

/// Default smart-truncate target length (§4.12).
pub const TRUNCATE_TARGET_LEN: usize = crate::constants::DEFAULT_COMPOSE_TRUNCATE_LEN;

/// Strips frontmatter, XML-like tags, and known metadata lines, then
/// collapses runs of 3+ newlines to 2.
pub fn clean(text: &str) -> String {
    let text = FRONTMATTER.replace(text, "");
    let text = XML_TAG.replace_all(&text, "");
    let text = METADATA_LINE.replace_all(&text, "");
    EXCESS_NEWLINES.replace_all(&text, "\n\n").trim().to_string()
}

/// Smart-truncates `text` to at most `target_len` characters.
///
/// If the truncation point falls inside an unclosed fenced code block, the
/// fence is closed explicitly rather than cut mid-block. Otherwise the cut
/// prefers the latest sentence/paragraph break in the last 30% of the
/// target window, then the latest space in the last 20%, then a hard cut.
pub fn smart_truncate(text: &str, target_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= target_len {
        return text.to_string();
    }

    let prefix: String = chars[..target_len].iter().collect();
    let open_fences = prefix.matches("```").count();
    if open_fences % 2 == 1 {
        return format!("{prefix}\n...\n```");
    }

    let window_start = char_count_to_byte_offset(&prefix, (target_len as f64 * 0.7) as usize);
    if let Some(pos) = last_sentence_or_paragraph_break(&prefix, window_start) {
        let mut cut = prefix[..pos].to_string();
        cut.push_str("...");
        return cut;
    }

    let space_window_start = char_count_to_byte_offset(&prefix, (target_len as f64 * 0.8) as usize);
    if let Some(rel_pos) = prefix[space_window_start..].rfind(' ') {
        let abs_pos = space_window_start + rel_pos;
        let mut cut = prefix[..abs_pos].to_string();
        cut.push_str("...");
        return cut;
    }

    let mut cut = prefix;
    cut.push_str("...");
    cut
}

/// Converts a char count into the corresponding byte offset in `s`, always
/// landing on a char boundary (the offset a `char_indices` iterator would
/// stop at, or `s.len()` if `char_count` runs past the end).
fn char_count_to_byte_offset(s: &str, char_count: usize) -> usize {
    s.char_indices().nth(char_count).map(|(i, _)| i).unwrap_or(s.len())
}

/// `window_start` and the returned offset are both byte offsets into
/// `prefix`, landing on char boundaries (regex match bounds and `rfind`
/// matches on single-byte ASCII delimiters both guarantee this).
fn last_sentence_or_paragraph_break(prefix: &str, window_start: usize) -> Option<usize> {
    let window_start = window_start.min(prefix.len());
    let window = &prefix[window_start..];

    let last_paragraph = window.rfind("\n\n").map(|p| window_start + p + 2);
    let last_sentence = SENTENCE_BREAK
        .find_iter(window)
        .last()
        .map(|m| window_start + m.end());

    match (last_paragraph, last_sentence) {
        (Some(p), Some(s)) => Some(p.max(s)),
        (Some(p), None) => Some(p),
        (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}

/// Derives the `*[Source: ...]*` suffix for a composed citation (§4.12 step i).
pub fn source_label(source: Option<&str>, document_id: &str) -> String {
    match source {
        Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
            url_hostname(s).unwrap_or_else(|| s.to_string())
        }
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => format!("document {document_id}"),
    }
}

fn url_hostname(url: &str) -> Option<String> {
    let without_scheme = url.split("://").nth(1)?;
    let host = without_scheme.split('/').next()?;
    Some(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_frontmatter() {
        let text = "---\ntitle: X\n---\nBody text here.";
        assert_eq!(clean(text), "Body text here.");
    }

    #[test]
    fn clean_strips_xml_tags() {
        assert_eq!(clean("<p>hello</p> world"), "hello world");
    }

    #[test]
    fn clean_strips_metadata_lines() {
        let text = "Body.\nauthor: Jane Doe\nsource_url: https://x.com\nMore body.";
        let cleaned = clean(text);
        assert!(!cleaned.contains("author:"));
        assert!(!cleaned.contains("source_url:"));
    }

    #[test]
    fn clean_collapses_excess_newlines() {
        assert_eq!(clean("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn smart_truncate_under_limit_is_unchanged() {
        assert_eq!(smart_truncate("short", 500), "short");
    }

    #[test]
    fn smart_truncate_700_chars_returns_at_most_500_and_ends_with_ellipsis() {
        let text = "word ".repeat(200);
        let truncated = smart_truncate(&text, 500);
        assert!(truncated.chars().count() <= 500 + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn smart_truncate_closes_unclosed_fence() {
        let mut text = String::from("intro\n```rust\n");
        text.push_str(&"code_line();\n".repeat(100));
        let truncated = smart_truncate(&text, 50);
        assert!(truncated.ends_with("\n...\n```"));
    }

    #[test]
    fn source_label_prefers_hostname_for_urls() {
        assert_eq!(source_label(Some("https://example.com/page"), "abc"), "example.com");
    }

    #[test]
    fn source_label_falls_back_to_document_id() {
        assert_eq!(source_label(None, "abc123"), "document abc123");
    }
}
