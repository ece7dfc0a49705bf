//! Markdown rendering with syntax highlighting and TOC extraction.
//!
//! README content is untrusted: raw HTML from the source is emitted as
//! escaped text and script-capable link targets are neutralised, so the
//! only markup in the output is what pulldown-cmark and this module produce.

use std::collections::HashSet;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

use super::highlight::SyntaxHighlighter;
use crate::util::{escape_html, slugify};

/// Stands in for a `[TOC]` paragraph until all headings are known.
const TOC_PLACEHOLDER: &str = "<!--snapfolio:toc-->";

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Result of rendering markdown, containing both HTML and table of contents.
#[derive(Debug, Clone)]
pub struct MarkdownOutput {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// The heading text
    pub text: String,
    /// The heading id (for anchor links)
    pub id: String,
    /// The heading level (1-6)
    pub level: u8,
}

struct HeadingState<'a> {
    level: HeadingLevel,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    inner: Vec<Event<'a>>,
}

struct CodeBlockState {
    info: String,
    code: String,
}

/// Render markdown to an HTML fragment.
#[cfg(test)]
pub fn render_markdown(markdown: &str, highlighter: &SyntaxHighlighter) -> MarkdownOutput {
    render_markdown_with_prefix(markdown, highlighter, "")
}

/// Render markdown to an HTML fragment, prefixing generated heading ids.
///
/// Several documents share one snapshot page, so each is rendered with its
/// own prefix to keep heading anchors unique.
pub fn render_markdown_with_prefix(
    markdown: &str,
    highlighter: &SyntaxHighlighter,
    id_prefix: &str,
) -> MarkdownOutput {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM;

    let parser = Parser::new_ext(markdown, options).filter_map(sanitize);

    let mut events: Vec<Event> = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut toc_slots: Vec<usize> = Vec::new();

    let mut code_block: Option<CodeBlockState> = None;
    let mut heading: Option<HeadingState> = None;
    let mut paragraph: Option<Vec<Event>> = None;

    for event in parser {
        if let Some(mut block) = code_block.take() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = highlighter.highlight(&block.code, &block.info);
                    events.push(Event::Html(highlighted.into()));
                }
                Event::Text(text) => {
                    block.code.push_str(&text);
                    code_block = Some(block);
                }
                _ => code_block = Some(block),
            }
            continue;
        }

        if let Some(mut state) = heading.take() {
            match event {
                Event::End(TagEnd::Heading(_)) => {
                    let (entry, html) = finish_heading(state, id_prefix, &mut used_ids);
                    toc.push(entry);
                    events.push(Event::Html(html.into()));
                }
                Event::Text(text) => {
                    state.text.push_str(&text);
                    state.inner.push(Event::Text(text));
                    heading = Some(state);
                }
                Event::Code(text) => {
                    state.text.push_str(&text);
                    state.inner.push(Event::Code(text));
                    heading = Some(state);
                }
                other => {
                    state.inner.push(other);
                    heading = Some(state);
                }
            }
            continue;
        }

        if let Some(mut buffered) = paragraph.take() {
            match event {
                Event::End(TagEnd::Paragraph) => {
                    if buffered.is_empty() {
                        // Nothing left after dropping an HTML comment.
                    } else if is_toc_marker(&buffered) {
                        toc_slots.push(events.len());
                        events.push(Event::Html(TOC_PLACEHOLDER.into()));
                    } else {
                        events.push(Event::Start(Tag::Paragraph));
                        events.append(&mut buffered);
                        events.push(Event::End(TagEnd::Paragraph));
                    }
                }
                other => {
                    buffered.push(other);
                    paragraph = Some(buffered);
                }
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_block = Some(CodeBlockState {
                    info: match kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    },
                    code: String::new(),
                });
            }
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs: _,
            }) => {
                heading = Some(HeadingState {
                    level,
                    id: id.map(|id| id.to_string()),
                    classes: classes.iter().map(|c| c.to_string()).collect(),
                    text: String::new(),
                    inner: Vec::new(),
                });
            }
            Event::Start(Tag::Paragraph) => paragraph = Some(Vec::new()),
            other => events.push(other),
        }
    }

    if !toc_slots.is_empty() {
        let toc_html = render_toc(&toc);
        for slot in toc_slots {
            events[slot] = Event::Html(toc_html.clone().into());
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    MarkdownOutput {
        html: html_output,
        toc,
    }
}

/// Neutralise markup that did not come from markdown syntax.
///
/// Raw HTML becomes text (escaped once by the HTML writer), HTML comments
/// are dropped, and links or images pointing at script-capable schemes are
/// rewritten to `#`.
fn sanitize(event: Event<'_>) -> Option<Event<'_>> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => {
            if raw.trim_start().starts_with("<!--") {
                None
            } else {
                Some(Event::Text(raw))
            }
        }
        Event::Start(Tag::HtmlBlock) => Some(Event::Start(Tag::Paragraph)),
        Event::End(TagEnd::HtmlBlock) => Some(Event::End(TagEnd::Paragraph)),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        other => Some(other),
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lower = url.trim_start().to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Emit a heading with a unique id and a permalink anchor.
fn finish_heading(
    state: HeadingState<'_>,
    id_prefix: &str,
    used_ids: &mut HashSet<String>,
) -> (TocEntry, String) {
    let base_id = match state.id {
        Some(explicit) => explicit,
        None => {
            let slug = slugify(&state.text);
            let slug = if slug.is_empty() {
                "section".to_string()
            } else {
                slug
            };
            if id_prefix.is_empty() {
                slug
            } else {
                format!("{id_prefix}-{slug}")
            }
        }
    };

    let mut id = base_id.clone();
    let mut suffix = 1;
    while used_ids.contains(&id) {
        id = format!("{base_id}-{suffix}");
        suffix += 1;
    }
    used_ids.insert(id.clone());

    let class_attr = if state.classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", escape_html(&state.classes.join(" ")))
    };

    let mut inner_html = String::new();
    html::push_html(&mut inner_html, state.inner.into_iter());

    let level = state.level as usize;
    let escaped_id = escape_html(&id);
    let html = format!(
        "<h{level} id=\"{escaped_id}\"{class_attr}>{inner_html} <a class=\"header-anchor\" href=\"#{escaped_id}\" aria-label=\"Link to this heading\">#</a></h{level}>\n"
    );

    let entry = TocEntry {
        text: state.text,
        id,
        level: level as u8,
    };
    (entry, html)
}

/// A paragraph whose whole text is `[TOC]`.
fn is_toc_marker(events: &[Event<'_>]) -> bool {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) => text.push_str(t),
            _ => return false,
        }
    }
    text.trim() == "[TOC]"
}

fn render_toc(toc: &[TocEntry]) -> String {
    let mut html = String::from("<nav class=\"toc\"><ul>");
    for entry in toc {
        html.push_str(&format!(
            "<li class=\"toc-h{}\"><a href=\"#{}\">{}</a></li>",
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.text)
        ));
    }
    html.push_str("</ul></nav>\n");
    html
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> MarkdownOutput {
        render_markdown(markdown, &SyntaxHighlighter::default())
    }

    #[test]
    fn test_render_basic_markdown() {
        let output = render("# Hello\n\nWorld");

        assert!(output.html.contains("<h1 id=\"hello\">Hello"));
        assert!(output.html.contains("<p>World</p>"));
        assert_eq!(
            output.toc,
            vec![TocEntry {
                text: "Hello".to_string(),
                id: "hello".to_string(),
                level: 1,
            }]
        );
    }

    #[test]
    fn test_inline_spans() {
        let output = render("**bold** *italic* `code` [label](https://example.com)");
        assert!(output.html.contains("<strong>bold</strong>"));
        assert!(output.html.contains("<em>italic</em>"));
        assert!(output.html.contains("<code>code</code>"));
        assert!(output.html.contains("<a href=\"https://example.com\">label</a>"));
    }

    #[test]
    fn test_heading_levels() {
        let output = render("# One\n## Two\n### Three\n");
        assert!(output.html.contains("<h1 id=\"one\">"));
        assert!(output.html.contains("<h2 id=\"two\">"));
        assert!(output.html.contains("<h3 id=\"three\">"));
        assert_eq!(output.toc.iter().map(|e| e.level).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let output = render("## Setup\n## Setup\n");
        let ids: Vec<_> = output.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1"]);
    }

    #[test]
    fn test_id_prefix() {
        let output =
            render_markdown_with_prefix("## Overview", &SyntaxHighlighter::default(), "doc-readme");
        assert_eq!(output.toc[0].id, "doc-readme-overview");
        assert!(output.html.contains("href=\"#doc-readme-overview\""));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let output = render("## The `run` command");
        assert_eq!(output.toc[0].text, "The run command");
        assert!(output.html.contains("The <code>run</code> command"));
    }

    #[test]
    fn test_script_tags_are_escaped() {
        let output = render("<script>alert('x')</script>\n\nHello <script>alert(1)</script>");
        assert!(!output.html.contains("<script>"));
        assert!(output.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_heading_key_value_attributes_are_dropped() {
        let output = render("## Setup {#setup .note onmouseover=alert(1) data-x=y}\n");
        assert!(output.html.contains("<h2 id=\"setup\" class=\"note\">"));
        assert!(!output.html.contains("onmouseover"));
        assert!(!output.html.contains("data-x"));
    }

    #[test]
    fn test_escaped_heading_text() {
        let output = render("# a &lt;script&gt; b");
        assert!(!output.html.contains("<script>"));
        assert!(output.html.contains("a &lt;script&gt; b"));
    }

    #[test]
    fn test_no_double_escaping() {
        let output = render("Fish &amp; chips & peas");
        assert!(output.html.contains("Fish &amp; chips &amp; peas"));
        assert!(!output.html.contains("&amp;amp;"));
    }

    #[test]
    fn test_html_comments_dropped() {
        let output = render("<!-- hidden -->\n\nvisible");
        assert!(!output.html.contains("hidden"));
        assert!(!output.html.contains("<p></p>"));
        assert!(output.html.contains("<p>visible</p>"));
    }

    #[test]
    fn test_javascript_links_neutralised() {
        let output = render("[click](javascript:alert(1))");
        assert!(!output.html.contains("javascript:"));
        assert!(output.html.contains("<a href=\"#\">click</a>"));
    }

    #[test]
    fn test_table() {
        let output = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(output.html.contains("<table>"));
        assert!(output.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_fenced_code_block() {
        let output = render("```swift\nlet x = 1\n```");
        assert!(output.html.contains("<pre"));
        assert!(output.html.contains("x"));
    }

    #[test]
    fn test_toc_marker() {
        let output = render("[TOC]\n\n# Intro\n\n## Usage\n");
        assert!(!output.html.contains("[TOC]"));
        assert!(output.html.starts_with("<nav class=\"toc\"><ul>"));
        assert!(output.html.contains("<li class=\"toc-h1\"><a href=\"#intro\">Intro</a></li>"));
        assert!(output.html.contains("<li class=\"toc-h2\"><a href=\"#usage\">Usage</a></li>"));
    }

    #[test]
    fn test_deterministic() {
        let input = "# Title\n\n- one\n- two\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(render(input).html, render(input).html);
    }
}
