//! Markdown renderer - line-oriented markdown to HTML.
//!
//! Input is expected to be placeholder-bearing text: math has already been
//! extracted and no rule here may alter placeholder tokens.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,4}) (.+)$").unwrap());

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\n]+)\)").unwrap());

/// Block wrapper currently open while scanning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Wrapper {
    #[default]
    None,
    List,
    Blockquote,
}

impl Wrapper {
    fn for_line(trimmed: &str) -> Self {
        if trimmed.starts_with('>') {
            Wrapper::Blockquote
        } else if trimmed.starts_with("- ") {
            Wrapper::List
        } else {
            Wrapper::None
        }
    }

    fn open_tag(self) -> Option<&'static str> {
        match self {
            Wrapper::None => None,
            Wrapper::List => Some("<ul>"),
            Wrapper::Blockquote => Some("<blockquote>"),
        }
    }

    fn close_tag(self) -> Option<&'static str> {
        match self {
            Wrapper::None => None,
            Wrapper::List => Some("</ul>"),
            Wrapper::Blockquote => Some("</blockquote>"),
        }
    }
}

/// Renderer for the main body of a cell.
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn render(text: &str) -> String {
        let text = Self::render_headings(text);
        let text = Self::render_blocks(&text);
        let text = Self::render_inlines(&text);
        Self::wrap_paragraphs(&text)
    }

    fn render_headings(text: &str) -> String {
        HEADING
            .replace_all(text, |caps: &Captures| {
                let level = caps[1].len();
                format!("<h{level}>{}</h{level}>", &caps[2])
            })
            .into_owned()
    }

    /// Single pass over lines for lists and blockquotes.
    fn render_blocks(text: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut wrapper = Wrapper::None;

        for line in text.split('\n') {
            let trimmed = line.trim();
            let next = Wrapper::for_line(trimmed);

            if next != wrapper {
                lines.extend(wrapper.close_tag().map(String::from));
                lines.extend(next.open_tag().map(String::from));
                wrapper = next;
            }

            lines.push(match next {
                Wrapper::Blockquote => trimmed.trim_start_matches('>').trim().to_string(),
                Wrapper::List => format!("<li>{}</li>", &trimmed[2..]),
                Wrapper::None => line.to_string(),
            });
        }

        lines.extend(wrapper.close_tag().map(String::from));
        lines.join("\n")
    }

    fn render_inlines(text: &str) -> String {
        let text = BOLD.replace_all(text, "<strong>${1}</strong>");
        let text = render_italic(&text);
        LINK.replace_all(&text, r#"<a href="${2}">${1}</a>"#)
            .into_owned()
    }

    fn wrap_paragraphs(text: &str) -> String {
        text.split("\n\n")
            .map(|segment| {
                let trimmed = segment.trim();
                if !trimmed.is_empty() && !trimmed.starts_with('<') && !trimmed.ends_with('>') {
                    format!("<p>{trimmed}</p>")
                } else {
                    segment.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `*text*` to `<em>`, skipped when the run sits directly inside `( )`.
fn render_italic(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'*' && (i == 0 || bytes[i - 1] != b'(') {
            if let Some(close) = italic_close(bytes, i) {
                out.push_str(&text[copied..i]);
                out.push_str("<em>");
                out.push_str(&text[i + 1..close]);
                out.push_str("</em>");
                i = close + 1;
                copied = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&text[copied..]);
    out
}

/// First `*` after a non-empty same-line body that is not followed by `)`.
fn italic_close(bytes: &[u8], open: usize) -> Option<usize> {
    match bytes.get(open + 1) {
        None | Some(b'\n') => return None,
        Some(_) => {}
    }
    let mut j = open + 2;
    while j < bytes.len() {
        match bytes[j] {
            b'\n' => return None,
            b'*' if bytes.get(j + 1) != Some(&b')') => return Some(j),
            _ => j += 1,
        }
    }
    None
}
