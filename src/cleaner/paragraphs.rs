//! Regroup flattened text into readable paragraphs.
//!
//! Sentences are accumulated greedily. A new paragraph starts when the
//! running one grows past `max_chars`, or when a sentence opens with a
//! topic-shift cue ("Seit", "Außerdem", ...) or a bare four-digit year.

use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_MAX_CHARS: usize = 300;
pub const DEFAULT_MIN_CHARS: usize = 10;

static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());
static YEAR_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}\s").unwrap());

const GERMAN_CUES: &[&str] = &[
    "Der",
    "Die",
    "Das",
    "Seit",
    "Nach",
    "Heute",
    "Im Jahr",
    "Ab",
    "Bis",
    "Während",
    "Trotz",
    "Außerdem",
    "Darüber hinaus",
    "Ferner",
    "Weiterhin",
    "Zudem",
    "Allerdings",
    "Jedoch",
    "Dennoch",
];

const ENGLISH_CUES: &[&str] = &[
    "The",
    "Since",
    "After",
    "Today",
    "In the year",
    "From",
    "Until",
    "During",
    "Despite",
    "Moreover",
    "Furthermore",
    "In addition",
    "Additionally",
    "However",
    "Nevertheless",
];

static GERMAN: LazyLock<TopicCues> = LazyLock::new(|| TopicCues::new("de", GERMAN_CUES));
static ENGLISH: LazyLock<TopicCues> = LazyLock::new(|| TopicCues::new("en", ENGLISH_CUES));

/// Sentence openers that signal a topic shift, for one language.
#[derive(Debug, Clone)]
pub struct TopicCues {
    locale: String,
    pattern: Option<Regex>,
}

impl TopicCues {
    pub fn new(locale: impl Into<String>, cues: &[&str]) -> Self {
        let pattern = (!cues.is_empty()).then(|| {
            let alternation = cues
                .iter()
                .map(|cue| regex::escape(cue))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"^(?:{alternation})\s")).unwrap()
        });
        TopicCues {
            locale: locale.into(),
            pattern,
        }
    }

    /// Cues for a locale tag such as `de`, `de-AT` or `en_GB`. Languages
    /// without a list get an empty set, leaving only the length and year
    /// triggers.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" => GERMAN.clone(),
            "en" => ENGLISH.clone(),
            _ => TopicCues::new(language, &[]),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// True when `sentence` opens with a cue followed by whitespace.
    pub fn starts_topic(&self, sentence: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(sentence))
    }
}

#[derive(Debug, Clone)]
pub struct ParagraphStructurer {
    pub max_chars: usize,
    pub min_chars: usize,
    cues: TopicCues,
}

impl Default for ParagraphStructurer {
    fn default() -> Self {
        ParagraphStructurer::for_locale("de")
    }
}

impl ParagraphStructurer {
    pub fn for_locale(locale: &str) -> Self {
        ParagraphStructurer {
            max_chars: DEFAULT_MAX_CHARS,
            min_chars: DEFAULT_MIN_CHARS,
            cues: TopicCues::for_locale(locale),
        }
    }

    pub fn with_limits(mut self, max_chars: usize, min_chars: usize) -> Self {
        self.max_chars = max_chars;
        self.min_chars = min_chars;
        self
    }

    pub fn cues(&self) -> &TopicCues {
        &self.cues
    }

    pub fn structure(&self, text: &str) -> Vec<String> {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();

        for sentence in split_sentences(text) {
            if self.starts_new_paragraph(&current, sentence.body) && !current.trim().is_empty() {
                paragraphs.push(std::mem::take(&mut current).trim().to_string());
            }
            current.push_str(sentence.body);
            current.push_str(sentence.terminator);
            current.push(' ');
        }

        if !current.trim().is_empty() {
            paragraphs.push(current.trim().to_string());
        }

        paragraphs.retain(|p| p.chars().count() >= self.min_chars);
        paragraphs
    }

    fn starts_new_paragraph(&self, current: &str, sentence: &str) -> bool {
        current.chars().count() > self.max_chars
            || self.cues.starts_topic(sentence)
            || YEAR_START_RE.is_match(sentence)
    }
}

struct Sentence<'a> {
    body: &'a str,
    terminator: &'a str,
}

/// Split on `.`, `!` or `?` followed by whitespace. Bodies are trimmed and
/// whitespace-only bodies are skipped; the trailing remainder has no
/// terminator.
fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END_RE.find_iter(text) {
        let body = text[start..m.start()].trim();
        if !body.is_empty() {
            sentences.push(Sentence {
                body,
                terminator: &text[m.start()..m.start() + 1],
            });
        }
        start = m.end();
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(Sentence {
            body: rest,
            terminator: "",
        });
    }
    sentences
}

/// German structuring with the default limits.
pub fn structure_paragraphs(text: &str) -> Vec<String> {
    ParagraphStructurer::default().structure(text)
}

pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join("\n\n")
}
