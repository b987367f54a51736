//! # mathdown
//!
//! Markdown with embedded LaTeX to MathJax-ready HTML.
//!
//! Math is pulled out into placeholders before any markdown rule runs and
//! restored afterwards, so `*`, `[..]` and parentheses inside an expression
//! reach the typesetting engine untouched.
//!
//! [`Page`] assembles markdown and code cells into a standalone document,
//! and [`cell`] holds the code-cell classifiers it uses.
//!
//! ## Example
//!
//! ```
//! let html = mathdown::render("**Energy** is $E = mc^2$");
//! assert!(html.contains("<strong>Energy</strong>"));
//! assert!(html.contains("$E = mc^2$"));
//! ```

pub mod cell;
pub mod converter;
pub mod error;
pub mod page;
pub mod style;

pub use converter::{has_references, render, render_with_options, MathEscaping};
pub use error::{Error, Result};
pub use page::{Page, PageOptions};

/// Options for markup to HTML conversion.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// How restored math is escaped.
    pub math_escaping: MathEscaping,
}

// Python bindings (only when 'python' feature is enabled)
#[cfg(feature = "python")]
mod python_bindings {
    use pyo3::prelude::*;

    /// Converts markdown with LaTeX to HTML for embedding in a Python string.
    #[pyfunction]
    fn render(text: &str) -> String {
        super::render(text)
    }

    /// Whether the text contains a References heading.
    #[pyfunction]
    fn has_references(text: &str) -> bool {
        super::has_references(text)
    }

    /// A Python module implemented in Rust.
    #[pymodule]
    pub fn mathdown(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(render, m)?)?;
        m.add_function(wrap_pyfunction!(has_references, m)?)?;
        Ok(())
    }
}
