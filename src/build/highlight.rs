use std::panic::{self, AssertUnwindSafe};

use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};

use crate::util::escape_html;

/// Theme used for code blocks on snapshot pages.
const DEFAULT_THEME: &str = "dracula";

/// Fenced blocks in this language are left for mermaid.js to draw.
const MERMAID: &str = "mermaid";

/// A syntax highlighter for fenced code blocks, using autumnus (tree-sitter
/// based) with CSS classes rather than inline styles.
pub struct SyntaxHighlighter {
    theme_name: String,
}

impl SyntaxHighlighter {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme_name: theme_name.to_string(),
        }
    }

    /// Render a fenced code block to HTML.
    ///
    /// `info` is the fence info string; only its first word is used as the
    /// language ("swift title=App.swift" -> "swift").
    pub fn highlight(&self, code: &str, info: &str) -> String {
        let language = info.split([' ', ',', '{']).next().unwrap_or("").trim();

        if language.eq_ignore_ascii_case(MERMAID) {
            return format!("<pre class=\"mermaid\">{}</pre>", escape_html(code));
        }

        let lang = Language::guess(language, code);

        // An explicit but unrecognised language stays a plain block so its
        // class survives for client-side tooling.
        if matches!(lang, Language::PlainText)
            && !language.is_empty()
            && language != "plaintext"
            && language != "text"
        {
            return plain_code_block(code, language);
        }

        // Some grammars panic while compiling their highlight queries.
        let highlighted = panic::catch_unwind(AssertUnwindSafe(|| format_linked(code, lang)));
        match highlighted {
            Ok(Some(html)) => html,
            Ok(None) => plain_code_block(code, language),
            Err(_) => {
                tracing::warn!(language, "syntax highlighter panicked, using a plain block");
                plain_code_block(code, language)
            }
        }
    }

    /// CSS for the highlight classes, inlined into each page.
    pub fn theme_css(&self) -> Option<String> {
        let theme = themes::get(&self.theme_name).ok()?;
        Some(theme.css(false))
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

/// Highlight `code` with class-based markup, or `None` if autumnus refuses it.
fn format_linked(code: &str, lang: Language) -> Option<String> {
    let formatter = HtmlLinkedBuilder::new().source(code).lang(lang).build().ok()?;
    let mut output: Vec<u8> = Vec::new();
    formatter.format(&mut output).ok()?;
    String::from_utf8(output).ok()
}

/// A code block without highlighting.
fn plain_code_block(code: &str, language: &str) -> String {
    let escaped = escape_html(code);
    if language.is_empty() {
        format!("<pre><code>{escaped}</code></pre>")
    } else {
        format!(
            "<pre><code class=\"language-{}\">{escaped}</code></pre>",
            escape_html(language)
        )
    }
}
