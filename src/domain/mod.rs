//! Domain layer: point balances, history records and the store ports.

pub mod history;
pub mod point;
pub mod ports;
