//! Thin adapters translating external requests into ledger operations.

pub mod csv;
