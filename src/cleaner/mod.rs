//! Cleaning pipeline for wiki-sourced article content.
//!
//! 1. Artifacts: citations, templates and wiki links; info boxes and
//!    figures when the input is markup.
//! 2. Markup to text, keeping block structure.
//! 3. Line-break repair and whitespace tidy.
//! 4. Paragraph structuring.
//!
//! [`render::select_render_mode`] sits on top and decides whether the result
//! is shown as sanitized markup or as plain paragraphs.

pub mod artifacts;
mod dom;
pub mod linebreaks;
pub mod markup;
pub mod options;
pub mod paragraphs;
pub mod render;
pub mod rules;
pub mod truncate;

use std::borrow::Cow;

use scraper::ElementRef;

pub use artifacts::{remove_artifacts, remove_text_artifacts};
pub use linebreaks::normalize_line_breaks;
pub use markup::{html_to_markdown, html_to_text, is_html_content, strip_tags};
pub use options::CleaningOptions;
pub use paragraphs::{join_paragraphs, structure_paragraphs, ParagraphStructurer, TopicCues};
pub use render::{select_render_mode, RawContent, RenderMode, Rendered};
pub use truncate::smart_truncate;

use dom::{serialize_fragment, Disposition, SerializePolicy};

/// Remove wiki artifacts and clean every text node, keeping the markup.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    serialize_fragment(&remove_text_artifacts(html), &CleanTextNodes)
}

/// Full pipeline from markup (or plain text) to paragraphs joined by blank
/// lines.
pub fn html_to_clean_text(html: &str, structurer: &ParagraphStructurer) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let text = html_to_text(&remove_artifacts(html));
    let text = remove_text_artifacts(&text);
    let flat = normalize_line_breaks(&text, &CleaningOptions::default().flattened());
    join_paragraphs(&structurer.structure(&flat))
}

/// Tags stripped and text cleaned with default options; paragraph breaks of
/// the source are kept but not regrouped.
pub fn extract_clean_text(html: &str) -> String {
    extract_clean_text_with(html, &CleaningOptions::default())
}

pub fn extract_clean_text_with(html: &str, options: &CleaningOptions) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = strip_tags(&remove_artifacts(html));
    normalize_line_breaks(&remove_text_artifacts(&text), options)
}

/// Paragraphs of `content`, structured with the cues of its locale.
pub fn process_content(content: &RawContent) -> Vec<String> {
    process_content_with(content, &ParagraphStructurer::for_locale(&content.locale))
}

pub fn process_content_with(content: &RawContent, structurer: &ParagraphStructurer) -> Vec<String> {
    html_to_clean_text(&content.body, structurer)
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Clean one text node in isolation. Surrounding whitespace is kept as a
/// single space so inline neighbours stay separated.
pub(crate) fn clean_text_node(text: &str) -> Cow<'_, str> {
    if text.is_empty() {
        return Cow::Borrowed(text);
    }
    if text.trim().is_empty() {
        return Cow::Borrowed(" ");
    }
    let core = normalize_line_breaks(
        &remove_text_artifacts(text),
        &CleaningOptions::default().flattened(),
    );
    let lead = if text.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if text.ends_with(char::is_whitespace) { " " } else { "" };
    Cow::Owned(format!("{lead}{core}{trail}"))
}

struct CleanTextNodes;

impl SerializePolicy for CleanTextNodes {
    fn disposition(&self, element: &ElementRef<'_>) -> Disposition {
        if artifacts::is_wiki_artifact(element) || artifacts::is_empty_block(element) {
            Disposition::Drop
        } else {
            Disposition::Keep
        }
    }

    fn text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        clean_text_node(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_html_keeps_markup() {
        let html = "<p>Die Partei wurde am 15.\nJanuar 1997 gegründet[1].</p><div class=\"navbox\">Nav</div>";
        assert_eq!(
            clean_html(html),
            "<p>Die Partei wurde am 15. Januar 1997 gegründet.</p>"
        );
    }

    #[test]
    fn clean_html_keeps_inline_spacing() {
        assert_eq!(
            clean_html("<p>Die <b>Hauptstadt</b> ist   Tirana.</p>"),
            "<p>Die <b>Hauptstadt</b> ist Tirana.</p>"
        );
    }

    #[test]
    fn html_to_clean_text_end_to_end() {
        let html = concat!(
            r#"<table class="infobox"><tr><td>Hauptstadt</td><td>Tirana</td></tr></table>"#,
            "<p>Albanien liegt in Südosteuropa.<sup class=\"reference\">[1]</sup> ",
            "Die Fläche beträgt 28.748\nkm².</p>",
            "<p>Seit 1991 ist das Land eine Republik.</p>",
        );
        assert_eq!(
            html_to_clean_text(html, &ParagraphStructurer::default()),
            "Albanien liegt in Südosteuropa.\n\nDie Fläche beträgt 28.748 km².\n\n\
             Seit 1991 ist das Land eine Republik."
        );
    }

    #[test]
    fn plain_text_through_html_pipeline() {
        assert_eq!(
            html_to_clean_text("Just plain text.", &ParagraphStructurer::for_locale("en")),
            "Just plain text."
        );
        assert_eq!(html_to_clean_text("", &ParagraphStructurer::default()), "");
    }

    #[test]
    fn extract_keeps_source_paragraphs() {
        let html = "<p>Erster Absatz[2] mit\nUmbruch.</p>\n\n<p>Zweiter Absatz.</p>";
        assert_eq!(
            extract_clean_text(html),
            "Erster Absatz mit Umbruch.\n\nZweiter Absatz."
        );
    }

    #[test]
    fn process_content_uses_locale() {
        let content = RawContent::new("It is a small country. Since 1912 it is independent.", "en");
        assert_eq!(
            process_content(&content),
            vec!["It is a small country.", "Since 1912 it is independent."]
        );
        let german = RawContent::new("It is a small country. Since 1912 it is independent.", "de");
        assert_eq!(process_content(&german).len(), 1);
    }

    #[test]
    fn text_node_whitespace() {
        assert_eq!(clean_text_node(" a  b "), " a b ");
        assert_eq!(clean_text_node("\n  "), " ");
        assert_eq!(clean_text_node(""), "");
    }
}
