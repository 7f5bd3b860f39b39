//! Property-based tests for the cleaning pipeline:
//! - paragraph structuring is idempotent
//! - tag stripping leaves no tags behind
//! - citation markers never survive artifact removal
//! - no paragraph falls below the length floor

use proptest::prelude::*;
use regex::Regex;
use wikiclean::cleaner::join_paragraphs;
use wikiclean::{remove_artifacts, strip_tags, structure_paragraphs, CleaningOptions};

const OPENERS: &[&str] = &["Der", "Die", "Seit", "Außerdem", "1990", "Albanien", "Es", "Im Jahr"];
const ENDINGS: &[&str] = &[".", "!", "?"];
const TAGS: &[&str] = &["p", "b", "i", "div", "span", "h2", "em", "script", "style", "sup"];

fn sentence() -> impl Strategy<Value = String> {
    (
        prop::sample::select(OPENERS),
        prop::collection::vec("[a-zäöüß0-9]{1,10}", 0..12),
        prop::sample::select(ENDINGS),
    )
        .prop_map(|(opener, words, end)| format!("{opener} {}{end}", words.join(" ")))
}

fn element() -> impl Strategy<Value = String> {
    (
        prop::sample::select(TAGS),
        prop::sample::select(TAGS),
        "[a-zA-Z0-9 .,]{0,20}",
        "[a-zA-Z0-9 .,]{0,20}",
    )
        .prop_map(|(outer, inner, head, tail)| {
            format!(r#"<{outer} class="x">{head}<{inner}>{tail}</{inner}></{outer}>"#)
        })
}

// ============================================================================
// Paragraph structuring
// ============================================================================

/// Property: structuring joined paragraphs again changes nothing
#[test]
fn proptest_structuring_idempotent() {
    proptest!(|(sentences in prop::collection::vec(sentence(), 0..40), sep in "[ \n]{1,3}")| {
        let text = sentences.join(&sep);
        let once = structure_paragraphs(&text);
        let twice = structure_paragraphs(&join_paragraphs(&once));
        prop_assert_eq!(once, twice);
    });
}

/// Property: every paragraph reaches the minimum length
#[test]
fn proptest_length_floor() {
    proptest!(|(text in "\\PC{0,600}")| {
        for paragraph in structure_paragraphs(&text) {
            prop_assert!(paragraph.trim().chars().count() >= 10, "short paragraph {:?}", paragraph);
        }
    });
}

// ============================================================================
// Markup
// ============================================================================

/// Property: stripped output contains nothing that looks like a tag
#[test]
fn proptest_strip_leaves_no_tags() {
    let tag = Regex::new(r"<[^>]*>").unwrap();
    proptest!(|(elements in prop::collection::vec(element(), 0..10))| {
        let html = elements.concat();
        let text = strip_tags(&html);
        prop_assert!(!tag.is_match(&text), "tag left in {:?}", text);
    });
}

/// Property: citation markers are always removed
#[test]
fn proptest_citations_removed() {
    proptest!(|(a in "[a-zA-Z ,.]{0,30}", b in "[a-zA-Z ,.]{0,30}", html in any::<bool>())| {
        let body = format!("{a}[12]{b}[3]");
        let input = if html { format!("<p>{body}</p>") } else { body };
        let out = remove_artifacts(&input);
        prop_assert!(!out.contains("[12]") && !out.contains("[3]"));
    });
}

/// Property: the normalizer never panics and never leaves a newline inside
/// flattened output
#[test]
fn proptest_flattened_is_single_line() {
    let opts = CleaningOptions::default().flattened();
    proptest!(|(text in "\\PC{0,300}")| {
        let out = wikiclean::normalize_line_breaks(&text, &opts);
        prop_assert!(!out.contains('\n'));
    });
}
