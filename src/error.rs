use thiserror::Error;

pub type Result<T> = std::result::Result<T, PointError>;

#[derive(Error, Debug)]
pub enum PointError {
    #[error("invalid amount {0}: amount must be a positive integer")]
    InvalidAmount(i64),
    #[error("balance limit exceeded: {current} + {amount} is over the {max} cap")]
    BalanceLimitExceeded { current: i64, amount: i64, max: i64 },
    #[error("insufficient balance: tried to use {amount} with only {current} available")]
    InsufficientBalance { current: i64, amount: i64 },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
