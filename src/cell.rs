//! Code-cell classifiers used when presenting a notebook as a page.
//!
//! These are plain pattern checks over cell source; none of them look at
//! markdown or math. [`Page::push_code`](crate::Page::push_code) uses
//! [`classify`] and [`adjust_figure_size`]; [`indent_code`] is for callers
//! that wrap cell source in generated code of their own.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static STATUS_DISPLAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)display\s*\(\s*HTML\s*\(\s*[frf]?""".*background:\s*#"#).unwrap()
});

static IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*import\s+|^\s*from\s+.*\s+import").unwrap());

static PACKAGE_INSTALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*!pip\s+|^\s*!conda\s+").unwrap());

static INTERACTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"interact\s*\(|ipywidgets\.",
        r"|FloatSlider|IntSlider|Dropdown|Button|Checkbox|SelectionSlider|Play|DatePicker",
        r"|@interact|interactive",
        r"|widgets\.|HBox|VBox|Tab|Accordion",
        r"|%matplotlib widget",
        r"|\.observe\s*\(",
        r"|display\s*\(\s*\w*Box\s*\(",
    ))
    .unwrap()
});

static SLIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"FloatSlider|IntSlider|interact").unwrap());

static PLT_SUBPLOTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"plt\.subplots\s*\(\s*(\d+)\s*,\s*(\d+)").unwrap());

static SUBPLOTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"subplots\s*\(\s*(\d+)\s*,\s*(\d+)").unwrap());

static FIGSIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"figsize\s*=\s*\[[^\]]+\]").unwrap());

static DPI: Lazy<Regex> = Lazy::new(|| Regex::new(r"dpi\s*=\s*\d+").unwrap());

/// Presentation treatment for a code cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Marked with a `# NO OUTPUT` comment: run silently.
    NoOutput,
    /// Displays a coloured status box: keep as-is.
    StatusDisplay,
    /// Imports, package installs or `%matplotlib` setup: hide.
    Setup,
    /// Widgets or interactive plots: add a header above the output.
    Interactive(WidgetHint),
    /// Anything else.
    Plain,
}

/// Which header an interactive cell gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetHint {
    Slider,
    Generic,
}

impl WidgetHint {
    pub fn header_html(self) -> &'static str {
        match self {
            WidgetHint::Slider => {
                "<div class=\"widget-area\">\n    <h3>Interactive Plot</h3>\n    <p>Use the controls below to adjust the visualization:</p>\n</div>"
            }
            WidgetHint::Generic => {
                "<div class=\"widget-area\">\n    <h3>Interactive Content</h3>\n    <p>Interactive elements are displayed below:</p>\n</div>"
            }
        }
    }
}

/// Classifies a code cell. Earlier kinds take precedence.
pub fn classify(code: &str) -> CellKind {
    if has_no_output_comment(code) {
        CellKind::NoOutput
    } else if STATUS_DISPLAY.is_match(code) {
        CellKind::StatusDisplay
    } else if is_setup(code) {
        CellKind::Setup
    } else if INTERACTIVE.is_match(code) {
        let hint = if SLIDER.is_match(code) {
            WidgetHint::Slider
        } else {
            WidgetHint::Generic
        };
        CellKind::Interactive(hint)
    } else {
        CellKind::Plain
    }
}

fn has_no_output_comment(code: &str) -> bool {
    code.trim().lines().any(|line| {
        let line = line.trim();
        line.starts_with('#') && line.to_uppercase().contains("NO OUTPUT")
    })
}

fn is_setup(code: &str) -> bool {
    IMPORT.is_match(code) || PACKAGE_INSTALL.is_match(code) || code.contains("%matplotlib")
}

/// `(figsize, dpi)` for a subplot grid.
fn figure_layout(rows: u32, cols: u32) -> (&'static str, u32) {
    let wide = cols > rows;
    match rows.saturating_mul(cols) {
        0..=2 => (if wide { "[8.5, 3.5]" } else { "[5, 7]" }, 120),
        4 if rows == 2 && cols == 2 => ("[10, 7]", 100),
        4 => (if wide { "[12, 5]" } else { "[7, 8.5]" }, 120),
        3..=6 => (if wide { "[13, 7]" } else { "[8.5, 10]" }, 100),
        _ => ("[14, 8.5]", 80),
    }
}

/// Rewrites matplotlib figure size and dpi to fit a page-width layout.
///
/// Only cells calling `plt.subplots` / `pyplot.subplots` are touched.
pub fn adjust_figure_size(code: &str) -> String {
    if !(code.contains("plt.subplots") || code.contains("pyplot.subplots")) {
        return code.to_string();
    }

    let grid = PLT_SUBPLOTS
        .captures(code)
        .or_else(|| SUBPLOTS.captures(code))
        .and_then(|caps| Some((caps[1].parse::<u32>().ok()?, caps[2].parse::<u32>().ok()?)));

    match grid {
        Some((rows, cols)) => {
            let (figsize, dpi) = figure_layout(rows, cols);
            let code = FIGSIZE.replace_all(code, NoExpand(&format!("figsize={figsize}")));
            if code.contains("dpi=") {
                DPI.replace_all(&code, NoExpand(&format!("dpi={dpi}")))
                    .into_owned()
            } else {
                FIGSIZE
                    .replace_all(&code, format!("${{0}}, dpi={dpi}").as_str())
                    .into_owned()
            }
        }
        None if code.contains("figsize") => {
            let code = FIGSIZE.replace_all(code, NoExpand("figsize=[8.5, 5]"));
            if code.contains("dpi=") {
                DPI.replace_all(&code, NoExpand("dpi=120")).into_owned()
            } else {
                code.into_owned()
            }
        }
        None => code.to_string(),
    }
}

/// Prefixes every line of `code` with `spaces` spaces.
pub fn indent_code(code: &str, spaces: usize) -> String {
    let prefix = " ".repeat(spaces);
    code.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
