//! Layered settings: built-in defaults, an optional settings file, then
//! `WIKICLEAN__*` environment variables
//! (`WIKICLEAN__PARAGRAPHS__MAX_CHARS=400`).

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::cleaner::paragraphs::{DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS};
use crate::cleaner::{CleaningOptions, ParagraphStructurer};
use crate::error::Result;

pub const ENV_PREFIX: &str = "WIKICLEAN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphSettings {
    pub max_chars: usize,
    pub min_chars: usize,
}

impl Default for ParagraphSettings {
    fn default() -> Self {
        ParagraphSettings {
            max_chars: DEFAULT_MAX_CHARS,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cleaning: CleaningOptions,
    pub paragraphs: ParagraphSettings,
    pub default_locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cleaning: CleaningOptions::default(),
            paragraphs: ParagraphSettings::default(),
            default_locale: "de".to_string(),
        }
    }
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    fn load_with_prefix(file: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Structurer for `locale`, falling back to the default locale when it
    /// is empty.
    pub fn structurer_for(&self, locale: &str) -> ParagraphStructurer {
        let locale = if locale.trim().is_empty() {
            &self.default_locale
        } else {
            locale
        };
        ParagraphStructurer::for_locale(locale)
            .with_limits(self.paragraphs.max_chars, self.paragraphs.min_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::load_with_prefix(None, "WIKICLEAN_TEST_UNSET").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.paragraphs.max_chars, 300);
        assert_eq!(settings.default_locale, "de");
    }

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("wikiclean-settings-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "default_locale = \"en\"\n[cleaning]\nfix_numbers = false\n[paragraphs]\nmax_chars = 120\n",
        )
        .unwrap();
        let settings = Settings::load_with_prefix(Some(&path), "WIKICLEAN_TEST_UNSET").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.default_locale, "en");
        assert!(!settings.cleaning.fix_numbers);
        assert!(settings.cleaning.fix_dates);
        assert_eq!(settings.paragraphs.max_chars, 120);
        assert_eq!(settings.paragraphs.min_chars, 10);
    }

    #[test]
    fn environment_overrides() {
        std::env::set_var("WIKICLEAN_TEST_ENV__PARAGRAPHS__MIN_CHARS", "25");
        std::env::set_var("WIKICLEAN_TEST_ENV__CLEANING__FIX_DATES", "false");
        let settings = Settings::load_with_prefix(None, "WIKICLEAN_TEST_ENV").unwrap();
        assert_eq!(settings.paragraphs.min_chars, 25);
        assert!(!settings.cleaning.fix_dates);
        assert!(settings.cleaning.fix_numbers);
    }

    #[test]
    fn missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/wikiclean.toml");
        assert!(Settings::load_with_prefix(Some(missing), "WIKICLEAN_TEST_UNSET").is_err());
    }

    #[test]
    fn structurer_uses_limits_and_fallback_locale() {
        let mut settings = Settings::default();
        settings.paragraphs.max_chars = 42;
        settings.default_locale = "en".into();
        let structurer = settings.structurer_for("");
        assert_eq!(structurer.max_chars, 42);
        assert_eq!(structurer.cues().locale(), "en");
        assert_eq!(settings.structurer_for("de").cues().locale(), "de");
    }
}
