//! Restitution pass - puts extracted math back behind MathJax delimiters.

use super::math::{placeholder, MathBlock, MathStore};

/// Asks MathJax to typeset HTML inserted after page load.
pub const TYPESET_DIRECTIVE: &str = r#"
<script>
if (window.MathJax) {
    MathJax.Hub.Queue(["Typeset", MathJax.Hub]);
}
</script>
"#;

/// How restored math is escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathEscaping {
    /// Backslashes doubled once, for HTML embedded in a host string literal.
    #[default]
    StringLiteral,
    /// Content restored byte for byte, for HTML written out directly.
    Verbatim,
}

impl MathEscaping {
    fn apply(self, content: &str) -> String {
        match self {
            MathEscaping::StringLiteral => content.replace('\\', "\\\\"),
            MathEscaping::Verbatim => content.to_string(),
        }
    }
}

pub struct Restorer;

impl Restorer {
    /// Replaces every placeholder in `html` with its delimited math.
    pub fn restore(mut html: String, store: &MathStore, escaping: MathEscaping) -> String {
        for (index, block) in store.blocks().iter().enumerate() {
            let token = placeholder(index, block.kind);
            html = html.replace(&token, &Self::delimit(block, escaping));
        }

        if store.has_math() {
            html.push_str(TYPESET_DIRECTIVE);
        }
        html
    }

    fn delimit(block: &MathBlock, escaping: MathEscaping) -> String {
        let content = escaping.apply(&block.content);
        if block.kind.is_display() {
            format!("$${content}$$")
        } else {
            format!("${content}$")
        }
    }
}
