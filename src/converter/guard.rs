//! Citation and parenthesis guard - hides stray delimiters from MathJax.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\]\n]+\]\([^)\n]+\)").unwrap());

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\d+\]").unwrap());

const NOTMATH_OPEN: &str = r#"<span class="notmath">"#;
const NOTMATH_CLOSE: &str = "</span>";

/// Wraps parenthetical runs and numeric citations in `notmath` spans.
///
/// Must run after math extraction, on the main body only.
pub struct CitationGuard;

impl CitationGuard {
    pub fn apply(text: &str) -> String {
        let text = Self::guard_parentheses(text);
        Self::guard_citations(&text)
    }

    fn guard_parentheses(text: &str) -> String {
        rewrite_at(text, &['(', '['], |at, out| {
            if let Some(link) = MARKDOWN_LINK.find(at) {
                out.push_str(link.as_str());
                return link.end();
            }
            if at.starts_with('(') {
                if let Some(close) = at.find(')') {
                    push_notmath(out, &at[..=close]);
                    return close + 1;
                }
            }
            out.push_str(&at[..1]);
            1
        })
    }

    fn guard_citations(text: &str) -> String {
        rewrite_at(text, &['['], |at, out| {
            if let Some(link) = MARKDOWN_LINK.find(at) {
                out.push_str(link.as_str());
                return link.end();
            }
            if let Some(citation) = CITATION.find(at) {
                push_notmath(out, citation.as_str());
                return citation.end();
            }
            out.push('[');
            1
        })
    }
}

fn push_notmath(out: &mut String, inner: &str) {
    out.push_str(NOTMATH_OPEN);
    out.push_str(inner);
    out.push_str(NOTMATH_CLOSE);
}

/// Copies `text`, handing control to `rewrite` at every trigger character.
///
/// `rewrite` receives the remainder starting at the trigger and returns how
/// many bytes it consumed (at least one).
fn rewrite_at(
    text: &str,
    triggers: &[char],
    mut rewrite: impl FnMut(&str, &mut String) -> usize,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(offset) = rest.find(triggers) {
        out.push_str(&rest[..offset]);
        let consumed = rewrite(&rest[offset..], &mut out);
        rest = &rest[offset + consumed..];
    }

    out.push_str(rest);
    out
}
