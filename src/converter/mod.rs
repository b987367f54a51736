//! Converter modules for markup to HTML transformation.

mod guard;
mod markdown;
mod math;
mod references;
mod restore;

pub use self::guard::CitationGuard;
pub use self::markdown::MarkdownRenderer;
pub use self::math::{placeholder, MathBlock, MathExtractor, MathKind, MathStore};
pub use self::references::{has_references, ReferencesRenderer, ReferencesSection};
pub use self::restore::{MathEscaping, Restorer, TYPESET_DIRECTIVE};

use crate::RenderOptions;

/// Converts one block of markup to HTML with the default options.
pub fn render(markup: &str) -> String {
    render_with_options(markup, &RenderOptions::default())
}

/// Converts one block of markup to HTML.
///
/// The References section is split off first and never sees math
/// extraction or the citation guard. The main body goes through
/// extraction, guard and markdown rendering in that order, and the
/// rendered section is appended before math is restored.
pub fn render_with_options(markup: &str, options: &RenderOptions) -> String {
    let (main, references) = ReferencesSection::split(markup);

    let (text, store) = MathExtractor::extract(main);
    let text = CitationGuard::apply(&text);
    let mut html = MarkdownRenderer::render(&text);

    if let Some(section) = &references {
        html.push_str(&ReferencesRenderer::render(section));
    }

    tracing::debug!(
        blocks = store.len(),
        references = references.is_some(),
        "rendered markup"
    );

    Restorer::restore(html, &store, options.math_escaping)
}
