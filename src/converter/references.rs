//! References section - split off and rendered with citation styling.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REFERENCES_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^#+[ \t]+References:?.*$").unwrap());

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,3}) (.+)$").unwrap());

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// Overrides host CSS that would bold or italicize citation spans.
const REFERENCES_STYLE: &str = "\
        /* Prevent MathJax from interfering with reference formatting */
        .references .citation-number strong { font-weight: bold; font-style: normal; }
        .references .bracket-content em { font-style: italic; font-weight: normal; }
        .references p { font-weight: normal; }
        .references span { font-weight: normal; }
        .references { font-weight: normal; }
";

/// The References heading line and everything after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencesSection<'a> {
    pub heading: &'a str,
    pub body: &'a str,
}

impl<'a> ReferencesSection<'a> {
    /// Splits `text` at the first References heading.
    ///
    /// Returns the main body and the section, if one was found.
    pub fn split(text: &'a str) -> (&'a str, Option<Self>) {
        match REFERENCES_HEADING.find(text) {
            Some(heading) => (
                &text[..heading.start()],
                Some(Self {
                    heading: heading.as_str(),
                    body: &text[heading.end()..],
                }),
            ),
            None => (text, None),
        }
    }
}

/// Whether `text` contains a References heading.
pub fn has_references(text: &str) -> bool {
    REFERENCES_HEADING.is_match(text)
}

/// Renderer for a [`ReferencesSection`].
pub struct ReferencesRenderer;

impl ReferencesRenderer {
    /// Renders the section into a container MathJax is told to skip.
    pub fn render(section: &ReferencesSection<'_>) -> String {
        let text = format!("{}{}", section.heading, section.body);

        let text = HEADING.replace_all(&text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", &caps[2])
        });
        let text = BRACKETED.replace_all(&text, render_bracketed);
        let text = PARENTHESIZED.replace_all(&text, "&#40;${1}&#41;");
        let text = text
            .replace("\\<", "<")
            .replace("\\>", ">")
            .replace("\\/", "/");
        let text = URL.replace_all(&text, r#"<a href="${0}">${0}</a>"#);

        let body = text
            .split("\n\n")
            .map(|segment| {
                let trimmed = segment.trim();
                if !trimmed.is_empty() && !trimmed.starts_with("<h") {
                    format!("<p>{segment}</p>")
                } else {
                    segment.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<div class=\"references\" data-mathjax=\"ignore\">\n    <style>\n{REFERENCES_STYLE}    </style>\n    {body}\n</div>"
        )
    }
}

/// Numeric citations get number styling, other bracketed text gets emphasis.
fn render_bracketed(caps: &Captures) -> String {
    let inner = &caps[1];
    match inner.chars().next() {
        Some(_) if inner.bytes().all(|b| b.is_ascii_digit()) => format!(
            "<span class=\"citation-number\"><span class=\"bracket-content\">[<em><strong>{inner}</strong></em>]</span></span>"
        ),
        Some(first) if !first.is_ascii_digit() => {
            format!("<span class=\"bracket-content\">[<em>{inner}</em>]</span>")
        }
        _ => caps[0].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        let (_, section) = ReferencesSection::split(text);
        ReferencesRenderer::render(&section.expect("section should be found"))
    }

    #[test]
    fn test_split_at_first_heading() {
        let text = "intro\n## References:\n[1] A\n# References\n[2] B";
        let (main, section) = ReferencesSection::split(text);
        let section = section.expect("section should be found");
        assert_eq!(main, "intro\n");
        assert_eq!(section.heading, "## References:");
        assert_eq!(section.body, "\n[1] A\n# References\n[2] B");
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        assert!(has_references("# REFERENCES"));
        assert!(has_references("text\n### references list"));
        assert!(!has_references("see the References below"));
        assert!(!has_references("#References"));
    }

    #[test]
    fn test_no_heading_is_noop() {
        let (main, section) = ReferencesSection::split("just text");
        assert_eq!(main, "just text");
        assert!(section.is_none());
    }

    #[test]
    fn test_numeric_citation_styled_once() {
        let html = render("# References\n[1] Work.");
        assert!(html.contains(
            "<span class=\"citation-number\"><span class=\"bracket-content\">[<em><strong>1</strong></em>]</span></span> Work."
        ));
        assert!(!html.contains("notmath"));
        assert_eq!(html.matches("bracket-content\">").count(), 1);
    }

    #[test]
    fn test_descriptive_brackets() {
        let html = render("# References\n\nTool [Computer software].");
        assert!(html.contains("<p>Tool <span class=\"bracket-content\">[<em>Computer software</em>]</span>.</p>"));
    }

    #[test]
    fn test_parentheses_become_entities() {
        let html = render("# References\n\nSmith (2020) Press (NY).");
        assert!(html.contains("Smith &#40;2020&#41; Press &#40;NY&#41;."));
        assert!(!html.contains("(2020)"));
    }

    #[test]
    fn test_escaped_markup_and_urls() {
        let html = render("# References\n\nSee \\<b\\>x\\<\\/b\\> at https://example.org/p?q=1");
        assert!(html.contains("See <b>x</b> at <a href=\"https://example.org/p?q=1\">https://example.org/p?q=1</a>"));
    }

    #[test]
    fn test_container_and_paragraphs() {
        let html = render("## References\n\n[1] A\n\n[2] B");
        assert!(html.starts_with("<div class=\"references\" data-mathjax=\"ignore\">"));
        assert!(html.contains(
            "    <style>\n        /* Prevent MathJax from interfering with reference formatting */\n"
        ));
        assert!(html.contains("    <h2>References</h2>\n<p>"));
        assert!(html.contains("<p><span class=\"citation-number\">"));
        assert_eq!(html.matches("<p>").count(), 2);
        assert!(html.ends_with("\n</div>"));
    }
}
