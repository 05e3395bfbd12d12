use super::history::{PointHistory, TransactionType};
use super::point::UserPoint;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Reads the current balance, returning the zero-point default for a
    /// user that has never been seen.
    async fn read(&self, id: u64) -> Result<UserPoint>;
    /// Writes the new balance with upsert semantics and stamps the record
    /// with the write time.
    async fn write(&self, id: u64, point: i64) -> Result<UserPoint>;
    /// Returns every known user point record.
    async fn all(&self) -> Result<Vec<UserPoint>>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(
        &self,
        id: u64,
        amount: i64,
        r#type: TransactionType,
        update_millis: i64,
    ) -> Result<()>;
    async fn read_all(&self, id: u64) -> Result<Vec<PointHistory>>;
}

pub type BalanceStoreBox = Box<dyn BalanceStore>;
pub type HistoryStoreBox = Box<dyn HistoryStore>;
