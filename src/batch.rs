use std::io::Write;

use rayon::prelude::*;

use crate::cleaner::render::{select_render_mode_with, RenderMode, Rendered};
use crate::cleaner::RawContent;
use crate::error::Result;
use crate::settings::Settings;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderCounts {
    pub html: usize,
    pub text: usize,
    pub paragraphs: usize,
}

impl RenderCounts {
    pub fn add(&mut self, rendered: &Rendered) {
        match rendered.mode {
            RenderMode::Html => self.html += 1,
            RenderMode::Text => self.text += 1,
        }
        self.paragraphs += rendered.paragraphs.len();
    }

    pub fn total(&self) -> usize {
        self.html + self.text
    }
}

/// Render independent records in parallel, preserving input order.
pub fn render_all(records: &[RawContent], settings: &Settings) -> Vec<Rendered> {
    records
        .par_iter()
        .map(|record| {
            let structurer = settings.structurer_for(&record.locale);
            select_render_mode_with(record, &structurer)
        })
        .collect()
}

/// Write one JSON object per line.
pub fn write_records(mut writer: impl Write, rendered: &[Rendered]) -> Result<()> {
    for record in rendered {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        writer.write_all(&line)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn renders_in_order_and_counts() {
        let records = vec![
            RawContent::new("<table><tr><td>1</td></tr></table>", "de").with_key("a"),
            RawContent::new("Ein ganz normaler Satz.", "de").with_key("b"),
            RawContent::new("", "de").with_key("c"),
        ];
        let rendered = render_all(&records, &Settings::default());
        let keys: Vec<_> = rendered.iter().map(|r| r.key.as_deref().unwrap()).collect();
        assert_eq!(keys, ["a", "b", "c"]);

        let mut counts = RenderCounts::default();
        rendered.iter().for_each(|r| counts.add(r));
        assert_eq!(counts, RenderCounts { html: 1, text: 2, paragraphs: 1 });
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn writes_json_lines() {
        let rendered = render_all(&[RawContent::new("Ein ganz normaler Satz.", "de")], &Settings::default());
        let mut out = Vec::new();
        write_records(&mut out, &rendered).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line,
            "{\"mode\":\"text\",\"body\":\"Ein ganz normaler Satz.\",\"paragraphs\":[\"Ein ganz normaler Satz.\"]}\n"
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported_as_write_error() {
        let rendered = render_all(&[RawContent::new("Ein ganz normaler Satz.", "de")], &Settings::default());
        let err = write_records(ClosedPipe, &rendered).unwrap_err();
        assert!(matches!(err, Error::Write(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe));
        assert!(err.to_string().starts_with("failed to write output"));
    }
}
