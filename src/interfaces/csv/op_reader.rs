use crate::error::{PointError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Charge,
    Use,
    Balance,
    History,
}

/// One row of the operation stream: `type,user,amount`.
///
/// `amount` is absent for the `balance` and `history` queries.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Op {
    pub r#type: OpType,
    pub user: u64,
    pub amount: Option<i64>,
}

/// Reads ledger operations from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Op>`, with
/// whitespace trimming and flexible record lengths handled automatically.
pub struct OpReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OpReader<R> {
    /// Creates a new `OpReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations,
    /// so large files stream without loading everything into memory.
    pub fn ops(self) -> impl Iterator<Item = Result<Op>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PointError::from))
    }
}
