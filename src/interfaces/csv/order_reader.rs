use crate::domain::order::Order;
use crate::error::{CheckoutError, Result};
use std::io::Read;

/// Reads prior-order seeds from a CSV source.
///
/// Expected header: `id, customer, store, payment_method, placed_at,
/// reference` (reference may be empty).
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn orders(self) -> impl Iterator<Item = Result<Order>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
