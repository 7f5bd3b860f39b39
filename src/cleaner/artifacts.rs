use std::sync::LazyLock;

use scraper::ElementRef;
use tracing::debug;

use super::dom::{class_contains, serialize_fragment, Disposition, SerializePolicy};
use super::markup::is_html_content;
use super::rules::{apply_rules, Rule};

/// Class substrings that mark boxes, thumbnails and reference widgets.
const ARTIFACT_CLASSES: &[&str] = &[
    "infobox",
    "reference",
    "cite_note",
    "navbox",
    "mw-ref",
    "thumb",
    "mw-file-element",
    "hatnote",
    "mw-default-size",
    "mw-file-description",
];

const ARTIFACT_ELEMENTS: &[&str] = &["figure", "figcaption", "script", "style"];

static CITATION: LazyLock<Rule> = LazyLock::new(|| Rule::new("citation", r"\[\d+\]", ""));

static INNERMOST_TEMPLATE: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("template", r"\{\{[^{}]*\}\}", ""));

static LINKS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("piped_link", r"\[\[([^\[\]|]*)\|([^\[\]]*)\]\]", "${2}"),
        Rule::new("link", r"\[\[([^\[\]]*)\]\]", "${1}"),
    ]
});

static LEFTOVERS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("citation", r"\[\d+\]", ""),
        Rule::new("stray_delimiter", r"\{\{|\}\}|\[\[|\]\]", ""),
    ]
});

/// Remove citation markers, templates and wiki-link syntax from plain text.
pub fn remove_text_artifacts(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = CITATION.apply(text).into_owned();

    while INNERMOST_TEMPLATE.is_match(&out) {
        out = INNERMOST_TEMPLATE.apply(&out).into_owned();
    }
    out = apply_rules(&LINKS, &out);

    // Deleting a stray delimiter can join two halves into a new one.
    loop {
        let next = apply_rules(&LEFTOVERS, &out);
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Remove wiki artifacts from text or markup.
///
/// Text artifacts go first. Markup additionally loses info boxes, navigation
/// boxes, figures, footnote markers, reference lists and paragraphs left empty; the rest
/// is re-serialized and swept for text artifacts once more, since pruning can
/// bring two halves of a marker together.
pub fn remove_artifacts(input: &str) -> String {
    let text = remove_text_artifacts(input);
    if !is_html_content(&text) {
        return text;
    }
    let pruned = serialize_fragment(&text, &WikiArtifacts);
    debug!(before = text.len(), after = pruned.len(), "pruned wiki markup");
    remove_text_artifacts(&pruned)
}

struct WikiArtifacts;

impl SerializePolicy for WikiArtifacts {
    fn disposition(&self, element: &ElementRef<'_>) -> Disposition {
        if is_wiki_artifact(element) || is_empty_block(element) {
            Disposition::Drop
        } else {
            Disposition::Keep
        }
    }
}

pub(crate) fn is_wiki_artifact(element: &ElementRef<'_>) -> bool {
    let name = element.value().name();
    ARTIFACT_ELEMENTS.contains(&name) || class_contains(element, ARTIFACT_CLASSES)
}

/// `<p>` or `<div>` with neither text nor child elements.
pub(crate) fn is_empty_block(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "p" | "div")
        && !element.children().any(|child| child.value().is_element())
        && element.text().all(|t| t.trim().is_empty())
}
