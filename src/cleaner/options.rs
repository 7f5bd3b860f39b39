use serde::{Deserialize, Serialize};

/// Switches for the line-break normalizer. Each flag gates exactly one stage.
///
/// Every flag defaults to `true`. The HTML pipelines flatten the text before
/// structuring paragraphs themselves, so they run with
/// [`CleaningOptions::flattened`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    pub fix_line_breaks: bool,
    pub fix_dates: bool,
    pub fix_organizations: bool,
    pub fix_numbers: bool,
    pub remove_extra_spaces: bool,
    pub preserve_paragraphs: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        CleaningOptions {
            fix_line_breaks: true,
            fix_dates: true,
            fix_organizations: true,
            fix_numbers: true,
            remove_extra_spaces: true,
            preserve_paragraphs: true,
        }
    }
}

impl CleaningOptions {
    /// Every stage disabled; only the final whitespace tidy runs.
    pub const fn none() -> Self {
        CleaningOptions {
            fix_line_breaks: false,
            fix_dates: false,
            fix_organizations: false,
            fix_numbers: false,
            remove_extra_spaces: false,
            preserve_paragraphs: false,
        }
    }

    /// Same as `self` but with every newline flattened to a space.
    pub const fn flattened(self) -> Self {
        CleaningOptions {
            preserve_paragraphs: false,
            ..self
        }
    }
}
