use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: char = '…';

/// Truncates a string to fit within `max_width` terminal columns.
///
/// When the string does not fit, the tail is replaced by a single `…`.
/// Returns `Cow::Borrowed` when no truncation is needed.
///
/// # Examples
///
/// ```
/// use riffle::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 6), "Hello…");
/// assert_eq!(truncate_to_width("Test", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1; // room for the ellipsis
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    let mut out = String::with_capacity(end + ELLIPSIS.len_utf8());
    out.push_str(&s[..end]);
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Flatten feed markup into a single line of plain text for the terminal.
///
/// Tags are dropped (block and `br` tags become spaces), entities are decoded,
/// terminal control characters and escape sequences are removed, and runs of
/// whitespace collapse to one space.
///
/// ```
/// use riffle::util::markup_to_text;
///
/// assert_eq!(markup_to_text("<p>Fish &amp; <b>chips</b></p>"), "Fish & chips");
/// ```
pub fn markup_to_text(markup: &str) -> String {
    let without_tags = strip_tags(markup);
    let decoded = html_escape::decode_html_entities(&without_tags);
    let clean = strip_terminal_controls(&decoded);
    clean.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_tags(markup: &str) -> Cow<'_, str> {
    if !markup.contains('<') {
        return Cow::Borrowed(markup);
    }

    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        // A '<' not followed by a tag-ish character is literal text
        if !after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!') {
            out.push('<');
            rest = after;
            continue;
        }
        match after.find('>') {
            Some(close) => {
                if breaks_line(&after[..close]) {
                    out.push(' ');
                }
                rest = &after[close + 1..];
            }
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

const LINE_BREAKING_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre",
    "section", "table", "td", "th", "tr", "ul",
];

/// Whether a tag body such as `br/` or `/p class="x"` separates words.
fn breaks_line(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    LINE_BREAKING_TAGS.contains(&name.as_str())
}

/// Remove C0 controls (tab and newlines become spaces), DEL, and ANSI
/// CSI/OSC sequences.
fn strip_terminal_controls(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_control()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters run until a final byte in 0x40..=0x7e
                    for next in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&next) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // OSC runs until BEL or ESC '\'
                    while let Some(next) = chars.next() {
                        if next == '\u{07}' {
                            break;
                        }
                        if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' | '\n' | '\r' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
