//! Choose between showing sanitized markup and plain paragraphs.
//!
//! Tables lose all meaning once flattened to text, so content that carries
//! one keeps a reduced set of markup. Other markup is cleaned and shown as
//! is; only tag-free content goes through the full text pipeline.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifacts::{is_empty_block, is_wiki_artifact, remove_text_artifacts};
use super::dom::{class_contains, serialize_fragment, Disposition, SerializePolicy};
use super::markup::is_html_content;
use super::paragraphs::ParagraphStructurer;
use super::{clean_html, clean_text_node, html_to_clean_text};

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<table\b|<div[^>]*class\s*=\s*["'][^"']*overflow-x-auto"#).unwrap()
});

const TABLE_ELEMENTS: &[&str] = &[
    "table", "caption", "colgroup", "col", "thead", "tbody", "tfoot", "tr", "th", "td",
];

const BLOCK_ELEMENTS: &[&str] = &["p", "br", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li"];

const TABLE_WRAPPER: (&str, &str) = (r#"<div class="overflow-x-auto">"#, "</div>");

fn default_locale() -> String {
    "de".to_string()
}

/// Article content as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContent {
    /// Identifies what the content belongs to (country, section, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub body: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl RawContent {
    pub fn new(body: impl Into<String>, locale: impl Into<String>) -> Self {
        RawContent {
            key: None,
            body: body.into(),
            locale: locale.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn is_html(&self) -> bool {
        is_html_content(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Html,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub mode: RenderMode,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
}

impl Rendered {
    /// Markup ready for display. Text mode wraps each paragraph in `<p>`.
    pub fn to_html(&self) -> String {
        match self.mode {
            RenderMode::Html => self.body.clone(),
            RenderMode::Text => self
                .paragraphs
                .iter()
                .map(|p| format!("<p>{}</p>", escape_html(p)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Render with the cues of the content's locale and default limits.
pub fn select_render_mode(content: &RawContent) -> Rendered {
    select_render_mode_with(content, &ParagraphStructurer::for_locale(&content.locale))
}

pub fn select_render_mode_with(content: &RawContent, structurer: &ParagraphStructurer) -> Rendered {
    let key = content.key.clone();
    let body = content.body.as_str();

    if body.trim().is_empty() {
        return Rendered {
            key,
            mode: RenderMode::Text,
            body: String::new(),
            paragraphs: Vec::new(),
        };
    }

    if has_table(body) {
        let sanitized = sanitize_preserving_tables(body);
        // The only table may have been an info box.
        if has_table(&sanitized) {
            debug!(key = ?key, mode = "html", reason = "table", "render mode selected");
            return Rendered {
                key,
                mode: RenderMode::Html,
                body: sanitized,
                paragraphs: Vec::new(),
            };
        }
    }

    // Checked on markup, never on entity-decoded text.
    if is_html_content(body) {
        let cleaned = clean_html(body);
        if is_html_content(&cleaned) {
            debug!(key = ?key, mode = "html", reason = "markup", "render mode selected");
            return Rendered {
                key,
                mode: RenderMode::Html,
                body: cleaned,
                paragraphs: Vec::new(),
            };
        }
    }

    let processed = html_to_clean_text(body, structurer);
    let paragraphs: Vec<String> = processed
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    debug!(key = ?key, mode = "text", paragraphs = paragraphs.len(), "render mode selected");
    Rendered {
        key,
        mode: RenderMode::Text,
        body: paragraphs.join("\n\n"),
        paragraphs,
    }
}

/// Markup reduced to tables and basic block structure. Artifacts are
/// removed, other elements are unwrapped, only `colspan`/`rowspan` survive
/// (and the class of a scroll wrapper without a table). Each table is wrapped
/// in a horizontally scrollable container and text nodes are cleaned.
pub fn sanitize_preserving_tables(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    serialize_fragment(&remove_text_artifacts(html), &TablesAndBlocks)
}

fn has_table(html: &str) -> bool {
    TABLE_RE.is_match(html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// An `overflow-x-auto` container without a table inside.
fn is_bare_wrapper(element: &ElementRef<'_>) -> bool {
    element.value().name() == "div"
        && class_contains(element, &["overflow-x-auto"])
        && !element
            .descendants()
            .any(|node| node.value().as_element().is_some_and(|e| e.name() == "table"))
}

struct TablesAndBlocks;

impl SerializePolicy for TablesAndBlocks {
    fn disposition(&self, element: &ElementRef<'_>) -> Disposition {
        let name = element.value().name();
        if is_wiki_artifact(element) || is_empty_block(element) {
            Disposition::Drop
        } else if TABLE_ELEMENTS.contains(&name) || BLOCK_ELEMENTS.contains(&name) {
            Disposition::Keep
        } else if is_bare_wrapper(element) {
            // A wrapper around a table is replaced by the table's own one.
            Disposition::Keep
        } else {
            Disposition::Unwrap
        }
    }

    fn keep_attribute(&self, element: &str, attribute: &str) -> bool {
        matches!((element, attribute), ("div", "class") | (_, "colspan" | "rowspan"))
    }

    fn text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        clean_text_node(text)
    }

    fn wrap(&self, element: &ElementRef<'_>) -> Option<(&'static str, &'static str)> {
        (element.value().name() == "table").then_some(TABLE_WRAPPER)
    }
}
