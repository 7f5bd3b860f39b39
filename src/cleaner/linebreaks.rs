//! Line-break repair for wiki-sourced text.
//!
//! The source wraps lines in the middle of dates, organization names and
//! measurements. Repairs run as ordered stages of [`Rule`]s, each stage gated
//! by one [`CleaningOptions`] flag. Line-break repair runs before the date and
//! organization stages, whose patterns expect the breaks to be gone already
//! (they still tolerate a leftover newline).

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::options::CleaningOptions;
use super::rules::{apply_rules, Rule};

const ORGANIZATIONS: &str = "Weltgesundheitsorganisation|Welttourismusorganisation|Internationale Fernmeldeunion|Vereinte Nationen|Europäische Union|World Health Organization|World Tourism Organization|International Telecommunication Union|United Nations|European Union";

static BLANK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

struct Stage {
    name: &'static str,
    enabled: fn(&CleaningOptions) -> bool,
    rules: Vec<Rule>,
}

static STAGES: LazyLock<Vec<Stage>> = LazyLock::new(|| {
    vec![
        Stage {
            name: "line_breaks",
            enabled: |o| o.fix_line_breaks,
            rules: vec![
                Rule::new(
                    "date_break",
                    r"\b(\d{1,2})\.\s*\n\s*([A-ZÄÖÜ][a-zäöü]+)\s+(\d{4})",
                    "${1}. ${2} ${3}",
                ),
                Rule::new(
                    "name_abbreviation_break",
                    r"([A-ZÄÖÜ][a-zäöü]+(?:[ \t]+[a-zäöü]+)*)\s*\n\s*\(([A-Z]+)\)",
                    "${1} (${2})",
                ),
                Rule::new("abbreviation_break", r"\s*\n\s*\(([A-Z]{2,})\)", " (${1})"),
                Rule::new("seit_break", r",\s+seit\s*\n\s*(\d+)", ", seit ${1}"),
                Rule::new("mid_sentence_break", r"([a-zäöü])\s*\n\s*([a-zäöü])", "${1} ${2}"),
                Rule::new("list_comma_break", r",\s*\n\s*([a-zäöü])", ", ${1}"),
            ],
        },
        Stage {
            name: "dates",
            enabled: |o| o.fix_dates,
            rules: vec![
                Rule::new(
                    "day_month_year",
                    r"\b(\d{1,2})\.\s*([A-ZÄÖÜ][a-zäöü]+)\s*(\d{4})",
                    "${1}. ${2} ${3}",
                ),
                Rule::new(
                    "seit_day_month_year",
                    r"seit\s+(\d{1,2})\.\s*([A-ZÄÖÜ][a-zäöü]+)\s*(\d{4})",
                    "seit ${1}. ${2} ${3}",
                ),
            ],
        },
        Stage {
            name: "organizations",
            enabled: |o| o.fix_organizations,
            rules: vec![
                Rule::new(
                    "known_organization",
                    &format!(r"({ORGANIZATIONS})\s*\n?\s*\(([A-Z]+)\)"),
                    "${1} (${2})",
                ),
                Rule::new(
                    "organization_since_date",
                    r"([A-ZÄÖÜ][a-zäöü]+(?:\s+[a-zäöü]+)*)\s*\(([A-Z]+)\),?\s*\n?\s*seit\s*\n?\s*(\d{1,2}\.\s*[A-ZÄÖÜ][a-zäöü]+\s*\d{4})",
                    "${1} (${2}), seit ${3}",
                ),
            ],
        },
        Stage {
            name: "numbers",
            enabled: |o| o.fix_numbers,
            rules: vec![
                Rule::new(
                    "number_unit",
                    r"(\d+(?:[.,]\d+)?)\s*\n\s*(km²|km|m²|m|%|°C|°F)",
                    "${1} ${2}",
                ),
                Rule::new(
                    "number_currency",
                    r"(\d+(?:[.,]\d+)?)\s*\n\s*(€|\$|USD|EUR|Euro|Dollar)",
                    "${1} ${2}",
                ),
            ],
        },
        Stage {
            name: "extra_spaces",
            enabled: |o| o.remove_extra_spaces,
            rules: vec![
                Rule::new("space_runs", r"[ \t]+", " "),
                Rule::new(
                    "space_before_punctuation",
                    r"(?:[ \t]+|[ \t]*\n[ \t]*)([,.;:!?])",
                    "${1}",
                ),
                Rule::new("spaces_after_punctuation", r"([,.;:!?])[ \t]{2,}", "${1} "),
            ],
        },
    ]
});

/// Repair broken line breaks and spacing in `input`.
///
/// Stages run in a fixed order and each is a no-op when its flag is off.
/// The result is always trimmed with whitespace runs collapsed; with
/// `preserve_paragraphs` paragraphs stay separated by exactly one blank line,
/// otherwise the text is flattened to a single line.
pub fn normalize_line_breaks(input: &str, options: &CleaningOptions) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut text = input.replace("\r\n", "\n");
    for stage in STAGES.iter() {
        if (stage.enabled)(options) {
            trace!(stage = stage.name, "applying line-break stage");
            text = apply_rules(&stage.rules, &text);
        }
    }

    arrange_paragraphs(&text, options.preserve_paragraphs)
}

/// Join wrapped lines, collapse whitespace, and keep or drop paragraph breaks.
fn arrange_paragraphs(text: &str, preserve_paragraphs: bool) -> String {
    if !preserve_paragraphs {
        return collapse_whitespace(text);
    }
    BLANK_LINE_RE
        .split(text)
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
