use std::borrow::Cow;

use regex::Regex;
use tracing::trace;

/// A named pattern rewrite. Every non-overlapping match of `pattern` is
/// replaced by `replacement` (`${n}` refers to capture groups).
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    pub fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Rule {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(input, self.replacement)
    }
}

/// Apply `rules` in order, each over the output of the previous one.
pub fn apply_rules(rules: &[Rule], input: &str) -> String {
    let mut out = input.to_string();
    for rule in rules {
        let rewritten = match rule.apply(&out) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(s) = rewritten {
            trace!(rule = rule.name, "rule rewrote input");
            out = s;
        }
    }
    out
}
