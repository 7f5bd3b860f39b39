//! Parse-and-reserialize helper shared by the artifact remover and the
//! table-preserving sanitizer. A [`SerializePolicy`] decides per element
//! whether it is kept, unwrapped (children only) or dropped with its subtree.

use std::borrow::Cow;

use scraper::node::Node;
use scraper::{ElementRef, Html};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) enum Disposition {
    Keep,
    Unwrap,
    Drop,
}

pub(crate) trait SerializePolicy {
    fn disposition(&self, element: &ElementRef<'_>) -> Disposition;

    fn keep_attribute(&self, _element: &str, _attribute: &str) -> bool {
        true
    }

    fn text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        Cow::Borrowed(text)
    }

    /// Markup placed around a kept element.
    fn wrap(&self, _element: &ElementRef<'_>) -> Option<(&'static str, &'static str)> {
        None
    }
}

/// Parse `html` as a body fragment and serialize it back under `policy`.
pub(crate) fn serialize_fragment(html: &str, policy: &impl SerializePolicy) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    serialize_children(fragment.root_element(), policy, &mut out);
    out
}

/// True when the element's `class` attribute contains any marker (ASCII
/// case-insensitive substring match).
pub(crate) fn class_contains(element: &ElementRef<'_>, markers: &[&str]) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| class.to_ascii_lowercase())
        .is_some_and(|class| markers.iter().any(|m| class.contains(m)))
}

fn serialize_children(element: ElementRef<'_>, policy: &impl SerializePolicy, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_text(&policy.text(text), out),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                match policy.disposition(&child) {
                    Disposition::Drop => {}
                    Disposition::Unwrap => serialize_children(child, policy, out),
                    Disposition::Keep => serialize_element(child, policy, out),
                }
            }
            _ => {}
        }
    }
}

fn serialize_element(element: ElementRef<'_>, policy: &impl SerializePolicy, out: &mut String) {
    let wrap = policy.wrap(&element);
    if let Some((open, _)) = wrap {
        out.push_str(open);
    }

    let name = element.value().name();
    out.push('<');
    out.push_str(name);
    for (attribute, value) in element.value().attrs() {
        if !policy.keep_attribute(name, attribute) {
            continue;
        }
        out.push(' ');
        out.push_str(attribute);
        out.push_str("=\"");
        escape_attribute(value, out);
        out.push('"');
    }
    out.push('>');

    if !VOID_ELEMENTS.contains(&name) {
        serialize_children(element, policy, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    if let Some((_, close)) = wrap {
        out.push_str(close);
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KeepAll;

    impl SerializePolicy for KeepAll {
        fn disposition(&self, _element: &ElementRef<'_>) -> Disposition {
            Disposition::Keep
        }
    }

    struct NoSpans;

    impl SerializePolicy for NoSpans {
        fn disposition(&self, element: &ElementRef<'_>) -> Disposition {
            match element.value().name() {
                "span" => Disposition::Unwrap,
                "sup" => Disposition::Drop,
                _ => Disposition::Keep,
            }
        }

        fn keep_attribute(&self, _element: &str, attribute: &str) -> bool {
            attribute != "style"
        }
    }

    #[test]
    fn roundtrip_keeps_markup() {
        let out = serialize_fragment(r#"<p class="a">x &amp; y<br>z</p>"#, &KeepAll);
        assert_eq!(out, r#"<p class="a">x &amp; y<br>z</p>"#);
    }

    #[test]
    fn unwrap_and_drop() {
        let out = serialize_fragment(
            r#"<p style="color:red">a <span>b</span><sup>[1]</sup></p>"#,
            &NoSpans,
        );
        assert_eq!(out, "<p>a b</p>");
    }

    #[test]
    fn class_match_is_substring() {
        let html = Html::parse_fragment(r#"<div class="mw-Thumbnail big">x</div>"#);
        let div = html
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .unwrap();
        assert!(class_contains(&div, &["thumb"]));
        assert!(!class_contains(&div, &["infobox"]));
    }
}
