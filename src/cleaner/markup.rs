//! Tag stripping and structure-aware text extraction.
//!
//! Everything goes through the html5ever parser behind `scraper`, so entity
//! decoding and malformed markup behave the same on every platform.

use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use super::artifacts::remove_text_artifacts;

// A tag name must follow the bracket directly, so "a < b > c" is text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^>]*)?/?>").unwrap());
static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static EXTRA_NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const BLOCK_CONTAINERS: &[&str] = &[
    "div", "section", "article", "blockquote", "table", "tr", "dl", "dt", "dd", "figure",
    "header", "footer", "aside", "main", "nav", "pre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Text,
    Markdown,
}

/// True when `input` contains anything that looks like a tag.
pub fn is_html_content(input: &str) -> bool {
    TAG_RE.is_match(input)
}

/// Remove every tag and decode entities. Script and style blocks are removed
/// together with their content; a non-breaking space becomes a plain space.
pub fn strip_tags(input: &str) -> String {
    if !needs_parsing(input) {
        return input.to_string();
    }
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    collect_text(fragment.root_element(), &mut out);
    out.replace('\u{a0}', " ")
}

/// Plain text that keeps the block structure of the markup: paragraphs and
/// headings end with a blank line, list items become `• item` or `N. item`
/// lines, table cells are separated by spaces and rows by newlines.
pub fn html_to_text(html: &str) -> String {
    if !needs_parsing(html) {
        return html.to_string();
    }
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    write_children(fragment.root_element(), Flavor::Text, &mut out);
    out.replace('\u{a0}', " ")
}

/// Markdown-ish rendering: `#` headings, `**bold**`, `*italic*`, list
/// bullets. Wiki artifacts in the text are removed and spacing is tidied
/// line by line.
pub fn html_to_markdown(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(html.len());
    if needs_parsing(html) {
        let fragment = Html::parse_fragment(html);
        write_children(fragment.root_element(), Flavor::Markdown, &mut out);
    } else {
        out.push_str(html);
    }
    let out = remove_text_artifacts(&out.replace('\u{a0}', " "));
    tidy_lines(&out)
}

fn needs_parsing(input: &str) -> bool {
    input.contains(['<', '&'])
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text(el, out);
                }
            }
            _ => {}
        }
    }
}

fn write_children(element: ElementRef<'_>, flavor: Flavor, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    write_element(el, flavor, out);
                }
            }
            _ => {}
        }
    }
}

/// Children rendered on their own and trimmed.
fn inner(element: ElementRef<'_>, flavor: Flavor) -> String {
    let mut buf = String::new();
    write_children(element, flavor, &mut buf);
    buf.trim().to_string()
}

fn write_element(element: ElementRef<'_>, flavor: Flavor, out: &mut String) {
    let name = element.value().name();
    match name {
        _ if SKIPPED_ELEMENTS.contains(&name) => {}
        "p" => {
            let text = inner(element, flavor);
            if !text.is_empty() {
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let text = inner(element, flavor);
            if text.is_empty() {
                return;
            }
            if flavor == Flavor::Markdown {
                let level = usize::from(name.as_bytes()[1] - b'0');
                out.push('\n');
                out.push_str(&"#".repeat(level));
                out.push(' ');
            }
            out.push_str(&text);
            out.push_str("\n\n");
        }
        "ul" | "ol" => {
            out.push('\n');
            let items = element
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li");
            for (index, item) in items.enumerate() {
                let text = inner(item, flavor);
                if text.is_empty() {
                    continue;
                }
                if name == "ol" {
                    out.push_str(&format!("{}. {}\n", index + 1, text));
                } else {
                    out.push_str(&format!("• {text}\n"));
                }
            }
            out.push('\n');
        }
        "br" => out.push('\n'),
        "td" | "th" => {
            write_children(element, flavor, out);
            out.push(' ');
        }
        "b" | "strong" if flavor == Flavor::Markdown => emphasis(element, "**", out),
        "i" | "em" if flavor == Flavor::Markdown => emphasis(element, "*", out),
        _ if BLOCK_CONTAINERS.contains(&name) => {
            write_children(element, flavor, out);
            out.push('\n');
        }
        _ => write_children(element, flavor, out),
    }
}

fn emphasis(element: ElementRef<'_>, marker: &str, out: &mut String) {
    let text = inner(element, Flavor::Markdown);
    if text.is_empty() {
        return;
    }
    out.push_str(marker);
    out.push_str(&text);
    out.push_str(marker);
}

/// Collapse horizontal whitespace per line and limit blank lines to one.
fn tidy_lines(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| HSPACE_RE.replace_all(line.trim(), " ").into_owned())
        .collect();
    let joined = lines.join("\n");
    EXTRA_NEWLINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}
