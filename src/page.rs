//! Standalone page assembly from a sequence of markdown and code cells.

use crate::cell::{self, CellKind};
use crate::converter::{render_with_options, MathEscaping};
use crate::style::DEFAULT_CSS;
use crate::RenderOptions;
use once_cell::sync::Lazy;
use regex::Regex;

static SUBHEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^##[ \t]+.+$").unwrap());

const DEFAULT_TITLE: &str = "Document";

const MATHJAX_CONFIG: &str = r#"<script type="text/x-mathjax-config">
MathJax.Hub.Config({
  tex2jax: {
    inlineMath: [['$','$'], ['\\(','\\)']],
    displayMath: [['$$','$$'], ['\\[','\\]']],
    processEscapes: true,
    processEnvironments: true,
    skipTags: ['script', 'noscript', 'style', 'textarea', 'pre', 'span', '.references'],
    ignoreClass: "references notmath"
  },
  TeX: {
    equationNumbers: { autoNumber: "none" },
    extensions: ["AMSmath.js", "AMSsymbols.js"]
  },
  CommonHTML: {
    linebreaks: { automatic: true }
  }
});
</script>
<script src="https://cdn.jsdelivr.net/npm/mathjax@2/MathJax.js?config=TeX-AMS_HTML"></script>"#;

const FOOTER: &str = r#"<div class="footer">
    <p>Generated with mathdown</p>
</div>"#;

/// Options for page assembly.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Page title. Taken from the first `# ` heading cell when unset.
    pub title: Option<String>,
    /// Stylesheet text placed in the page head.
    pub css: String,
    /// Whether to append the footer.
    pub footer: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: None,
            css: DEFAULT_CSS.to_string(),
            footer: true,
        }
    }
}

#[derive(Debug, Clone)]
enum Cell {
    Markdown(String),
    Code(String),
}

/// A standalone HTML page built from notebook cells.
///
/// The page is written out as a file, so math is restored verbatim.
#[derive(Debug, Clone, Default)]
pub struct Page {
    options: PageOptions,
    cells: Vec<Cell>,
}

impl Page {
    pub fn new(options: PageOptions) -> Self {
        Self {
            options,
            cells: Vec::new(),
        }
    }

    pub fn push_markdown(&mut self, cell: impl Into<String>) -> &mut Self {
        self.cells.push(Cell::Markdown(cell.into()));
        self
    }

    /// Adds a code cell, shown as a source listing.
    ///
    /// Setup and `# NO OUTPUT` cells are left off the page; interactive
    /// cells get a widget header above the listing.
    pub fn push_code(&mut self, cell: impl Into<String>) -> &mut Self {
        self.cells.push(Cell::Code(cell.into()));
        self
    }

    /// Index and text of the markdown cell whose first heading names the page.
    fn title_cell(&self) -> Option<(usize, &str)> {
        self.cells
            .iter()
            .enumerate()
            .find_map(|(index, cell)| match cell {
                Cell::Markdown(text) if text.starts_with("# ") => Some((index, text.as_str())),
                _ => None,
            })
    }

    pub fn title(&self) -> String {
        if let Some(title) = &self.options.title {
            return title.clone();
        }
        self.title_cell()
            .and_then(|(_, text)| text.lines().next())
            .map(|line| line.trim_matches(|c| c == '#' || c == ' ').to_string())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn render(&self) -> String {
        let title = escape_html(&self.title());
        let title_cell = self.title_cell().map(|(index, _)| index);
        let render_options = RenderOptions {
            math_escaping: MathEscaping::Verbatim,
        };

        let mut sections = Vec::new();
        for (index, cell) in self.cells.iter().enumerate() {
            let cell = match cell {
                Cell::Markdown(text) => text,
                Cell::Code(code) => {
                    sections.extend(code_section(code));
                    continue;
                }
            };
            if Some(index) == title_cell {
                let remaining = cell.lines().skip(1).collect::<Vec<_>>().join("\n");
                let (intro, rest) = split_intro(&remaining);
                if !intro.trim().is_empty() {
                    let html = render_with_options(intro.trim(), &render_options);
                    sections.push(div("intro-content", &html));
                }
                if !rest.trim().is_empty() {
                    sections.push(div("section", &render_with_options(rest, &render_options)));
                }
            } else {
                sections.push(div("section", &render_with_options(cell, &render_options)));
            }
        }

        let footer = if self.options.footer { FOOTER } else { "" };

        tracing::debug!(
            cells = self.cells.len(),
            sections = sections.len(),
            "assembled page"
        );

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{MATHJAX_CONFIG}\n<style>\n{css}\n</style>\n</head>\n<body>\n<h1>{title}</h1>\n{sections}\n{footer}\n</body>\n</html>\n",
            css = self.options.css,
            sections = sections.join("\n"),
        )
    }
}

/// Splits title-cell content at its first `## ` heading.
fn split_intro(text: &str) -> (&str, &str) {
    match SUBHEADING.find(text) {
        Some(heading) => (&text[..heading.start()], &text[heading.start()..]),
        None => (text, ""),
    }
}

fn code_section(code: &str) -> Option<String> {
    let header = match cell::classify(code) {
        CellKind::NoOutput | CellKind::Setup => return None,
        CellKind::Interactive(hint) => Some(hint.header_html()),
        CellKind::StatusDisplay | CellKind::Plain => None,
    };
    let listing = format!(
        "<pre><code>{}</code></pre>",
        escape_html(&cell::adjust_figure_size(code))
    );
    let html = match header {
        Some(header) => format!("{header}\n{listing}"),
        None => listing,
    };
    Some(div("code-cell", &html))
}

fn div(class: &str, html: &str) -> String {
    format!("<div class=\"{class}\">\n{html}\n</div>")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_heading_cell() {
        let mut page = Page::default();
        page.push_markdown("intro text").push_markdown("# Heat & Mass\nbody");
        assert_eq!(page.title(), "Heat & Mass");
        assert!(page.render().contains("<title>Heat &amp; Mass</title>"));
    }

    #[test]
    fn test_title_override_and_default() {
        let page = Page::new(PageOptions {
            title: Some("Given".to_string()),
            ..Default::default()
        });
        assert_eq!(page.title(), "Given");
        assert_eq!(Page::default().title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_title_cell_split_into_intro_and_section() {
        let mut page = Page::default();
        page.push_markdown("# Title\nIntro words\n## Part\nPart words");
        let html = page.render();
        assert!(html.contains("<div class=\"intro-content\">\n<p>Intro words</p>\n</div>"));
        assert!(html.contains("<div class=\"section\">\n<h2>Part</h2>\nPart words\n</div>"));
        assert_eq!(html.matches("<h1>Title</h1>").count(), 1);
    }

    #[test]
    fn test_title_cell_without_subheading_is_intro() {
        let mut page = Page::default();
        page.push_markdown("# Title\nOnly intro");
        let html = page.render();
        assert!(html.contains("<div class=\"intro-content\">"));
        assert!(!html.contains("<div class=\"section\">"));
    }

    #[test]
    fn test_page_math_is_verbatim() {
        let mut page = Page::default();
        page.push_markdown("Value $\\sqrt{2}$ here");
        let html = page.render();
        assert!(html.contains("<p>Value $\\sqrt{2}$ here</p>"));
        assert!(html.contains("text/x-mathjax-config"));
    }

    #[test]
    fn test_footer_toggle() {
        let page = Page::new(PageOptions {
            footer: false,
            ..Default::default()
        });
        assert!(!page.render().contains("class=\"footer\""));
        assert!(Page::default().render().contains("class=\"footer\""));
    }

    #[test]
    fn test_code_cells_by_kind() {
        let mut page = Page::default();
        page.push_code("import numpy as np")
            .push_code("x = 1\n# no output")
            .push_code("print(a < b)")
            .push_code("w = FloatSlider(min=0, max=1)");
        let html = page.render();
        assert!(!html.contains("import numpy"));
        assert!(!html.contains("x = 1"));
        assert!(html.contains("<div class=\"code-cell\">\n<pre><code>print(a &lt; b)</code></pre>\n</div>"));
        assert!(html.contains("<h3>Interactive Plot</h3>"));
        assert!(html.contains("<pre><code>w = FloatSlider(min=0, max=1)</code></pre>"));
    }

    #[test]
    fn test_code_cell_figure_resized() {
        let mut page = Page::default();
        page.push_code("fig, ax = plt.subplots(2, 2, figsize=[12, 8])");
        assert!(page
            .render()
            .contains("plt.subplots(2, 2, figsize=[10, 7], dpi=100)"));
    }

    #[test]
    fn test_code_cell_never_names_page() {
        let mut page = Page::default();
        page.push_code("# Heading comment\nprint(1)");
        assert_eq!(page.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a\"b<c>d&e'"), "a&quot;b&lt;c&gt;d&amp;e&#39;");
    }
}
