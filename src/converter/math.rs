//! Math extractor - moves LaTeX spans out of the text before markdown runs.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ALIGN_ENV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{align\}.*?\\end\{align\}").unwrap());

static DISPLAY_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap());

const BEGIN_ENV: &str = r"\begin{";

/// Private-use delimiters, never produced by authored markup.
const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Kind of an extracted math span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    /// `align` environment, stored as `align*`.
    Align,
    /// Any other `\begin{..}` / `\end{..}` environment.
    Environment,
    /// `$$...$$`
    Display,
    /// `$...$`
    Inline,
}

impl MathKind {
    pub fn name(self) -> &'static str {
        match self {
            MathKind::Align => "align",
            MathKind::Environment => "env",
            MathKind::Display => "display",
            MathKind::Inline => "inline",
        }
    }

    /// Whether this kind is restored with `$$` delimiters.
    pub fn is_display(self) -> bool {
        !matches!(self, MathKind::Inline)
    }
}

/// One extracted expression. Its identity is its index in the [`MathStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathBlock {
    pub kind: MathKind,
    pub content: String,
}

/// Builds the placeholder token for the block at `index`.
pub fn placeholder(index: usize, kind: MathKind) -> String {
    format!(
        "{PLACEHOLDER_OPEN}MATH_{index}_{}{PLACEHOLDER_CLOSE}",
        kind.name()
    )
}

/// Ordered blocks extracted during a single conversion.
///
/// The block count doubles as the placeholder counter, so indices are
/// shared across all stages and never reused.
#[derive(Debug, Default)]
pub struct MathStore {
    blocks: Vec<MathBlock>,
}

impl MathStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a block and returns the placeholder that stands in for it.
    ///
    /// Tokens of earlier blocks inside `content` are folded back to their
    /// raw content, so a nested block is restored through its outer one.
    fn push(&mut self, kind: MathKind, content: String) -> String {
        let content = self.fold_nested(content);
        let token = placeholder(self.blocks.len(), kind);
        self.blocks.push(MathBlock { kind, content });
        token
    }

    fn fold_nested(&self, mut content: String) -> String {
        for (index, block) in self.blocks.iter().enumerate() {
            if !content.contains(PLACEHOLDER_OPEN) {
                break;
            }
            content = content.replace(&placeholder(index, block.kind), &block.content);
        }
        content
    }

    pub fn blocks(&self) -> &[MathBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn has_math(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// One pass of the extractor.
struct Stage {
    kind: MathKind,
    extract: fn(&str, &mut MathStore) -> String,
}

/// Precedence order. Align bodies may hold `$`-delimited text and any
/// environment may hold `$$`, so the outer constructs go first.
const STAGES: [Stage; 4] = [
    Stage {
        kind: MathKind::Align,
        extract: extract_align,
    },
    Stage {
        kind: MathKind::Environment,
        extract: extract_environments,
    },
    Stage {
        kind: MathKind::Display,
        extract: extract_display,
    },
    Stage {
        kind: MathKind::Inline,
        extract: extract_inline,
    },
];

/// Extractor for every math span in a block of markup.
pub struct MathExtractor;

impl MathExtractor {
    /// Replaces every math span with a placeholder.
    ///
    /// Returns the rewritten text and the blocks in placeholder order.
    pub fn extract(text: &str) -> (String, MathStore) {
        let mut store = MathStore::new();
        let mut text = text.to_string();

        for stage in &STAGES {
            let before = store.len();
            text = (stage.extract)(&text, &mut store);
            tracing::debug!(
                stage = stage.kind.name(),
                extracted = store.len() - before,
                "math extraction stage"
            );
        }

        (text, store)
    }
}

fn extract_align(text: &str, store: &mut MathStore) -> String {
    ALIGN_ENV
        .replace_all(text, |caps: &Captures| {
            let content = caps[0]
                .replace(r"\begin{align}", r"\begin{align*}")
                .replace(r"\end{align}", r"\end{align*}");
            store.push(MathKind::Align, content)
        })
        .into_owned()
}

fn extract_environments(text: &str, store: &mut MathStore) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(BEGIN_ENV) {
        let name_start = start + BEGIN_ENV.len();
        match environment_len(&rest[name_start..]) {
            Some(len) => {
                let end = name_start + len;
                out.push_str(&rest[..start]);
                out.push_str(&store.push(MathKind::Environment, rest[start..end].to_string()));
                rest = &rest[end..];
            }
            None => {
                // Unclosed: keep the opener as text and keep scanning.
                out.push_str(&rest[..name_start]);
                rest = &rest[name_start..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Length of `NAME}BODY\end{NAME}` at the start of `after_begin`, if the
/// environment is closed by a tag with the same name.
fn environment_len(after_begin: &str) -> Option<usize> {
    let name_len = after_begin.find('}')?;
    if name_len == 0 {
        return None;
    }
    let close = format!("\\end{{{}}}", &after_begin[..name_len]);
    let body_start = name_len + 1;
    let body_len = after_begin[body_start..].find(close.as_str())?;
    Some(body_start + body_len + close.len())
}

fn extract_display(text: &str, store: &mut MathStore) -> String {
    DISPLAY_MATH
        .replace_all(text, |caps: &Captures| {
            store.push(MathKind::Display, caps[1].to_string())
        })
        .into_owned()
}

/// `$body$` on one line, with neither delimiter touching another `$`.
fn extract_inline(text: &str, store: &mut MathStore) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && (i == 0 || bytes[i - 1] != b'$') {
            if let Some(close) = inline_close(bytes, i) {
                out.push_str(&text[copied..i]);
                out.push_str(&store.push(MathKind::Inline, text[i + 1..close].to_string()));
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

fn inline_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut j = open + 1;
    while j < bytes.len() && bytes[j] != b'$' && bytes[j] != b'\n' {
        j += 1;
    }
    let closed = j < bytes.len() && bytes[j] == b'$';
    let non_empty = j > open + 1;
    let doubled = bytes.get(j + 1) == Some(&b'$');
    (closed && non_empty && !doubled).then_some(j)
}
