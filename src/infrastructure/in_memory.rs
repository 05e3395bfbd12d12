use crate::domain::history::{PointHistory, TransactionType};
use crate::domain::point::{UserPoint, now_millis};
use crate::domain::ports::{BalanceStore, HistoryStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for user point balances.
///
/// Uses `Arc<RwLock<HashMap<u64, UserPoint>>>` to allow shared concurrent
/// access. Per-key atomicity is all the ledger needs from it; cross-key
/// serialization is the lock registry's job.
#[derive(Default, Clone)]
pub struct InMemoryBalanceStore {
    points: Arc<RwLock<HashMap<u64, UserPoint>>>,
}

impl InMemoryBalanceStore {
    /// Creates a new, empty in-memory balance store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    async fn read(&self, id: u64) -> Result<UserPoint> {
        let points = self.points.read().await;
        Ok(points.get(&id).copied().unwrap_or_else(|| UserPoint::empty(id)))
    }

    async fn write(&self, id: u64, point: i64) -> Result<UserPoint> {
        let mut points = self.points.write().await;
        let previous = points.get(&id).copied().unwrap_or_else(|| UserPoint::empty(id));
        let updated = UserPoint {
            id,
            point,
            // Clamp against clock regression: per-user stamps never decrease.
            update_millis: now_millis().max(previous.update_millis),
        };
        points.insert(id, updated);
        Ok(updated)
    }

    async fn all(&self) -> Result<Vec<UserPoint>> {
        let points = self.points.read().await;
        Ok(points.values().copied().collect())
    }
}

/// A thread-safe in-memory append-only history store.
///
/// Each append is assigned the next per-user sequence number, so records
/// that share a millisecond timestamp still order unambiguously.
#[derive(Default, Clone)]
pub struct InMemoryHistoryStore {
    records: Arc<RwLock<HashMap<u64, Vec<PointHistory>>>>,
}

impl InMemoryHistoryStore {
    /// Creates a new, empty in-memory history store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(
        &self,
        id: u64,
        amount: i64,
        r#type: TransactionType,
        update_millis: i64,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        let user_records = records.entry(id).or_default();
        user_records.push(PointHistory {
            user_id: id,
            seq: user_records.len() as u64 + 1,
            amount,
            r#type,
            update_millis,
        });
        Ok(())
    }

    async fn read_all(&self, id: u64) -> Result<Vec<PointHistory>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned().unwrap_or_default())
    }
}
