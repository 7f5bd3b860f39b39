//! Reading article bodies and batch records.

use std::io::{BufRead, Read};
use std::path::Path;

use tracing::debug;

use crate::cleaner::RawContent;
use crate::error::{Error, Result};

/// Whole file, or stdin when `path` is `None` or `-`.
pub fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| Error::Read {
                    path: "<stdin>".into(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// One JSON [`RawContent`] per line; blank lines are skipped. Records
/// without a locale get `default_locale`.
pub fn read_records(reader: impl BufRead, default_locale: &str) -> Result<Vec<RawContent>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Read {
            path: "<records>".into(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(&line).map_err(|source| Error::Parse {
            line: index + 1,
            source,
        })?;
        let has_locale = value.get("locale").is_some();
        let mut record: RawContent =
            serde_json::from_value(value).map_err(|source| Error::Parse {
                line: index + 1,
                source,
            })?;
        if !has_locale {
            record.locale = default_locale.to_string();
        }
        records.push(record);
    }
    debug!(records = records.len(), "read batch records");
    Ok(records)
}

pub fn read_records_file(path: &Path, default_locale: &str) -> Result<Vec<RawContent>> {
    let file = std::fs::File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(std::io::BufReader::new(file), default_locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_with_and_without_locale() {
        let input = concat!(
            r#"{"key": "AL", "body": "<p>Tirana</p>", "locale": "de"}"#,
            "\n\n",
            r#"{"body": "London"}"#,
            "\n",
        );
        let records = read_records(input.as_bytes(), "en").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key.as_deref(), Some("AL"));
        assert_eq!(records[0].locale, "de");
        assert_eq!(records[1].locale, "en");
        assert!(records[0].is_html());
    }

    #[test]
    fn bad_record_reports_line() {
        let input = "{\"body\": \"ok\"}\n{\"body\": 3}\n";
        let err = read_records(input.as_bytes(), "de").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
        assert!(err.to_string().starts_with("line 2:"));
    }

    #[test]
    fn missing_file() {
        let err = read_text(Some(Path::new("/nonexistent/artikel.html"))).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/artikel.html"));
    }

    #[test]
    fn fixture_file() {
        let text = read_text(Some(Path::new("tests/fixtures/geschichte.txt"))).unwrap();
        assert!(text.contains("Albanien"));
    }
}
