use crate::domain::verdict::Verdict;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One output row per evaluated event.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct VerdictRow {
    pub session: String,
    pub event: String,
    pub satisfied: bool,
    pub skipped: bool,
    pub selected: Option<String>,
    pub summary: Option<String>,
    pub errors: Option<String>,
}

impl VerdictRow {
    pub fn new(
        session: &str,
        event: &str,
        verdict: &Verdict,
        selected: Option<String>,
        summary: Option<String>,
    ) -> Self {
        let errors = if verdict.errors().is_empty() {
            None
        } else {
            Some(
                verdict
                    .errors()
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        Self {
            session: session.to_string(),
            event: event.to_string(),
            satisfied: verdict.is_satisfied(),
            skipped: verdict.is_skipped(),
            selected,
            summary,
            errors,
        }
    }
}

/// Writes verdict rows as CSV, header included.
pub struct VerdictWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> VerdictWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    pub fn write_rows(&mut self, rows: Vec<VerdictRow>) -> Result<()> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
