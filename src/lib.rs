//! Cleaning and paragraph structuring for Wikipedia-sourced article content.

pub mod batch;
pub mod cleaner;
pub mod error;
pub mod settings;
pub mod source;

pub use cleaner::{
    clean_html, extract_clean_text, html_to_clean_text, normalize_line_breaks, process_content,
    remove_artifacts, select_render_mode, smart_truncate, strip_tags, structure_paragraphs,
    CleaningOptions, ParagraphStructurer, RawContent, RenderMode, Rendered,
};
pub use error::{Error, Result};
pub use settings::Settings;
