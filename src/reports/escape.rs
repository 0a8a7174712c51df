//! Escaping utilities for text reports.
//!
//! Element names, docstring-derived descriptions and signature text come
//! from the analyzed package and may contain Markdown or CSV syntax
//! (`|` in union annotations, `*args`, quotes in default values). Escape
//! them before embedding in a Markdown or CSV report.

/// Escape a string for safe inclusion in Markdown table cells.
///
/// Markdown tables use `|` as column separators, so a union annotation like
/// `int | None` would otherwise split the cell.
///
/// # Examples
///
/// ```
/// use api_evolution::reports::escape::escape_markdown_table;
///
/// assert_eq!(escape_markdown_table("x: int | None"), "x: int \\| None");
/// assert_eq!(escape_markdown_table("line1\nline2"), "line1 line2");
/// assert_eq!(escape_markdown_table("`code`"), "\\`code\\`");
/// ```
#[must_use]
pub fn escape_markdown_table(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '|' => result.push_str("\\|"),
            '\n' => result.push(' '),
            '\r' => {}
            '`' => result.push_str("\\`"),
            '[' => result.push_str("\\["),
            ']' => result.push_str("\\]"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a string for safe inclusion in Markdown inline content.
///
/// # Examples
///
/// ```
/// use api_evolution::reports::escape::escape_markdown_inline;
///
/// assert_eq!(escape_markdown_inline("__init__"), "\\_\\_init\\_\\_");
/// assert_eq!(escape_markdown_inline("*args"), "\\*args");
/// ```
#[must_use]
pub fn escape_markdown_inline(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '*' => result.push_str("\\*"),
            '_' => result.push_str("\\_"),
            '`' => result.push_str("\\`"),
            '[' => result.push_str("\\["),
            ']' => result.push_str("\\]"),
            '#' => result.push_str("\\#"),
            '!' => result.push_str("\\!"),
            '~' => result.push_str("\\~"),
            '|' => result.push_str("\\|"),
            '<' => result.push_str("\\<"),
            '>' => result.push_str("\\>"),
            '\n' => result.push(' '),
            '\r' => {}
            _ => result.push(c),
        }
    }
    result
}

/// Helper to escape an `Option<&str>` for Markdown tables, returning "-" for None.
#[must_use]
pub fn escape_md_opt(s: Option<&str>) -> String {
    match s {
        Some(v) => escape_markdown_table(v),
        None => "-".to_string(),
    }
}

/// Quote a CSV field, doubling embedded quotes and flattening newlines.
///
/// # Examples
///
/// ```
/// use api_evolution::reports::escape::escape_csv;
///
/// assert_eq!(escape_csv("(x, y='a')"), "\"(x, y='a')\"");
/// assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
#[must_use]
pub fn escape_csv(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\"\""),
            '\n' => result.push(' '),
            '\r' => {}
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown_table_basic() {
        assert_eq!(escape_markdown_table("hello"), "hello");
        assert_eq!(escape_markdown_table("a | b"), "a \\| b");
        assert_eq!(escape_markdown_table("line1\nline2"), "line1 line2");
        assert_eq!(escape_markdown_table("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_markdown_table_malicious() {
        // Newline injection to escape table row
        assert_eq!(
            escape_markdown_table("row1\n| new | row |"),
            "row1 \\| new \\| row \\|"
        );

        // Link injection
        assert_eq!(
            escape_markdown_table("[evil](http://malware.com)"),
            "\\[evil\\](http://malware.com)"
        );
    }

    #[test]
    fn test_escape_markdown_inline() {
        assert_eq!(escape_markdown_inline("hello"), "hello");
        assert_eq!(escape_markdown_inline("**kwargs"), "\\*\\*kwargs");
        assert_eq!(escape_markdown_inline("_private"), "\\_private");
        assert_eq!(escape_markdown_inline("# heading"), "\\# heading");
    }

    #[test]
    fn test_escape_helpers() {
        assert_eq!(escape_md_opt(Some("a | b")), "a \\| b");
        assert_eq!(escape_md_opt(None), "-");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv(""), "\"\"");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("multi\r\nline"), "\"multi line\"");
    }

    #[test]
    fn test_unicode_preservation() {
        assert_eq!(escape_markdown_table("émoji 🎉"), "émoji 🎉");
        assert_eq!(escape_csv("Ω ≈ ∞"), "\"Ω ≈ ∞\"");
    }
}
