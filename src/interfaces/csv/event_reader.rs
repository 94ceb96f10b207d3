use crate::domain::provider::FormData;
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// What kind of call the checkout controller made.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Render,
    Submit,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Render => "render",
            EventKind::Submit => "submit",
        }
    }
}

/// One scenario row: a render of, or a submission to, the payment step.
///
/// `total` is the payable amount of the session's cart at that moment;
/// `form` holds `field=value` pairs joined with `;`, repeated fields
/// accumulating into the raw value set.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CheckoutEvent {
    pub event: EventKind,
    pub session: String,
    pub customer: u64,
    pub store: u32,
    pub total: Decimal,
    pub recurring: Option<bool>,
    pub method: Option<String>,
    pub form: Option<String>,
}

impl CheckoutEvent {
    /// Parses the `form` column into raw form data.
    pub fn form_data(&self) -> Result<FormData> {
        let mut form = FormData::new();
        let Some(raw) = self.form.as_deref() else {
            return Ok(form);
        };
        for pair in raw.split(';').filter(|p| !p.is_empty()) {
            let (field, value) = pair.split_once('=').ok_or_else(|| {
                CheckoutError::Scenario(format!("malformed form pair: {pair}"))
            })?;
            form.append(field.trim(), value.trim());
        }
        Ok(form)
    }
}

/// Reads checkout events from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<CheckoutEvent>`,
/// handling whitespace trimming and flexible record lengths automatically.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes events.
    pub fn events(self) -> impl Iterator<Item = Result<CheckoutEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
