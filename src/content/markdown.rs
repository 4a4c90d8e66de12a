//! Markdown rendering with utility-class styling
//!
//! Styling is applied as an event transform over the pulldown-cmark stream
//! rather than string substitution on the rendered HTML, so class injection
//! cannot partially match or depend on serializer quirks.

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::helpers::html_escape;

/// CSS utility classes applied to rendered elements
pub(crate) mod class {
    pub const TABLE: &str = "border-collapse w-full my-8";
    pub const THEAD: &str = "bg-gray-100";
    pub const TH: &str = "border border-gray-300 px-4 py-3 text-left font-semibold";
    pub const TD: &str = "border border-gray-300 px-4 py-3";
    pub const BLOCKQUOTE: &str =
        "border-l-4 border-green-500 pl-4 py-3 italic bg-gray-50 rounded-r-sm my-8";
    pub const OL: &str = "list-decimal pl-6 my-6 space-y-3";
    pub const UL: &str = "list-disc pl-6 my-6 space-y-3";
    pub const LI: &str = "ml-2 mb-2";
    pub const H2: &str = "text-2xl font-bold mt-12 mb-6";
    pub const H3: &str = "text-xl font-bold mt-10 mb-4";
    pub const P: &str = "mb-6 leading-relaxed";
    pub const LINK: &str = "text-green-600 font-medium hover:text-green-700 hover:underline";
    pub const DIVIDER: &str = "mt-12 mb-8 border-t border-gray-200 pt-4";
}

/// Markdown renderer with utility-class styling
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to styled HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let normalized = normalize_tables(markdown);

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION;
        let parser = Parser::new_ext(&normalized, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_table_head = false;

        for event in parser {
            match event {
                Event::Start(Tag::Table { .. }) => {
                    events.push(raw(format!(r#"<table class="{}">"#, class::TABLE)));
                }
                Event::End(TagEnd::Table) => {
                    events.push(raw("</tbody></table>".to_string()));
                }
                Event::Start(Tag::TableHead) => {
                    in_table_head = true;
                    events.push(raw(format!(r#"<thead class="{}"><tr>"#, class::THEAD)));
                }
                Event::End(TagEnd::TableHead) => {
                    in_table_head = false;
                    events.push(raw("</tr></thead><tbody>".to_string()));
                }
                Event::Start(Tag::TableRow) => {
                    events.push(raw("<tr>".to_string()));
                }
                Event::End(TagEnd::TableRow) => {
                    events.push(raw("</tr>".to_string()));
                }
                Event::Start(Tag::TableCell) => {
                    let cell = if in_table_head {
                        format!(r#"<th class="{}">"#, class::TH)
                    } else {
                        format!(r#"<td class="{}">"#, class::TD)
                    };
                    events.push(raw(cell));
                }
                Event::End(TagEnd::TableCell) => {
                    let cell = if in_table_head { "</th>" } else { "</td>" };
                    events.push(raw(cell.to_string()));
                }
                Event::Start(Tag::BlockQuote { .. }) => {
                    events.push(raw(format!(
                        r#"<blockquote class="{}">"#,
                        class::BLOCKQUOTE
                    )));
                }
                Event::End(TagEnd::BlockQuote { .. }) => {
                    events.push(raw("</blockquote>".to_string()));
                }
                Event::Start(Tag::List(Some(start))) => {
                    if start == 1 {
                        events.push(raw(format!(r#"<ol class="{}">"#, class::OL)));
                    } else {
                        events.push(raw(format!(
                            r#"<ol start="{}" class="{}">"#,
                            start,
                            class::OL
                        )));
                    }
                }
                Event::Start(Tag::List(None)) => {
                    events.push(raw(format!(r#"<ul class="{}">"#, class::UL)));
                }
                Event::End(TagEnd::List(ordered)) => {
                    events.push(raw(if ordered { "</ol>" } else { "</ul>" }.to_string()));
                }
                Event::Start(Tag::Item) => {
                    events.push(raw(format!(r#"<li class="{}">"#, class::LI)));
                }
                Event::End(TagEnd::Item) => {
                    events.push(raw("</li>".to_string()));
                }
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H2,
                    ..
                }) => {
                    // Section divider before each h2
                    events.push(raw(format!(
                        r#"<div class="{}"></div><h2 class="{}">"#,
                        class::DIVIDER,
                        class::H2
                    )));
                }
                Event::End(TagEnd::Heading(HeadingLevel::H2)) => {
                    events.push(raw("</h2>".to_string()));
                }
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H3,
                    ..
                }) => {
                    events.push(raw(format!(r#"<h3 class="{}">"#, class::H3)));
                }
                Event::End(TagEnd::Heading(HeadingLevel::H3)) => {
                    events.push(raw("</h3>".to_string()));
                }
                Event::Start(Tag::Paragraph) => {
                    events.push(raw(format!(r#"<p class="{}">"#, class::P)));
                }
                Event::End(TagEnd::Paragraph) => {
                    events.push(raw("</p>".to_string()));
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    let mut anchor =
                        format!(r#"<a class="{}" href="{}""#, class::LINK, html_escape(&dest_url));
                    if !title.is_empty() {
                        anchor.push_str(&format!(r#" title="{}""#, html_escape(&title)));
                    }
                    anchor.push('>');
                    events.push(raw(anchor));
                }
                Event::End(TagEnd::Link) => {
                    events.push(raw("</a>".to_string()));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn raw(s: String) -> Event<'static> {
    Event::Html(CowStr::from(s))
}

lazy_static! {
    /// A run of pipe-delimited rows
    static ref TABLE_BLOCK: Regex = Regex::new(r"(?m)^[ \t]*(\|.+\|[ \t]*\n)+").unwrap();
    /// A row containing only |, -, : and spaces
    static ref SEPARATOR_ROW: Regex = Regex::new(r"^\|[-:\s|]+\|$").unwrap();
}

/// Insert the `| --- |` separator row into pipe tables that lack one,
/// so the table extension recognizes them.
pub fn normalize_tables(content: &str) -> String {
    TABLE_BLOCK
        .replace_all(content, |caps: &regex::Captures| {
            let block = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let mut rows: Vec<String> = block
                .trim()
                .lines()
                .map(|row| row.trim().to_string())
                .collect();

            if rows.len() >= 2 && !SEPARATOR_ROW.is_match(&rows[1]) {
                let columns = rows[0].matches('|').count().saturating_sub(1);
                let separator = format!("| {} |", vec!["---"; columns].join(" | "));
                rows.insert(1, separator);
            }

            format!("{}\n\n", rows.join("\n"))
        })
        .into_owned()
}
