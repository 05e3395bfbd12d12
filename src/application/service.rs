use crate::application::locks::KeyedLockRegistry;
use crate::domain::history::{PointHistory, TransactionType};
use crate::domain::point::{Amount, MAX_BALANCE, UserPoint, now_millis};
use crate::domain::ports::{BalanceStoreBox, HistoryStoreBox};
use crate::error::{PointError, Result};
use tracing::{debug, warn};

/// The entry point for point balance queries and mutations.
///
/// `PointService` owns the storage backends and a [`KeyedLockRegistry`].
/// Every mutating operation runs its read-validate-write-append sequence
/// under the exclusive lock for the user id, so mutations on one user are
/// totally ordered while different users proceed in parallel. Reads skip
/// the lock: they may race an in-flight mutation and return either the
/// pre- or post-write value, which is an accepted relaxation.
pub struct PointService {
    balances: BalanceStoreBox,
    histories: HistoryStoreBox,
    locks: KeyedLockRegistry,
}

impl PointService {
    pub fn new(balances: BalanceStoreBox, histories: HistoryStoreBox) -> Self {
        Self {
            balances,
            histories,
            locks: KeyedLockRegistry::new(),
        }
    }

    /// Reads the current balance without locking. Returns the zero-point
    /// default for a user that has never been seen.
    pub async fn balance(&self, id: u64) -> Result<UserPoint> {
        self.balances.read(id).await
    }

    /// Increases the user's balance by `amount`.
    ///
    /// Fails with [`PointError::BalanceLimitExceeded`] when the new balance
    /// would pass `MAX_BALANCE`, leaving balance and history untouched.
    pub async fn charge(&self, id: u64, amount: i64) -> Result<UserPoint> {
        let amount = Amount::new(amount)?;
        let _guard = self.locks.acquire(id).await;

        let current = self.balances.read(id).await?;
        // checked_add: an adversarial amount could wrap i64 before the
        // cap comparison; overflow counts as exceeding the cap.
        let total = match current.point.checked_add(amount.value()) {
            Some(total) if total <= MAX_BALANCE => total,
            _ => {
                warn!(
                    id,
                    amount = amount.value(),
                    current = current.point,
                    "charge rejected: balance limit exceeded"
                );
                return Err(PointError::BalanceLimitExceeded {
                    current: current.point,
                    amount: amount.value(),
                    max: MAX_BALANCE,
                });
            }
        };

        let updated = self.balances.write(id, total).await?;
        self.histories
            .append(id, amount.value(), TransactionType::Charge, now_millis())
            .await?;
        debug!(id, point = updated.point, "charge applied");
        Ok(updated)
    }

    /// Decreases the user's balance by `amount`.
    ///
    /// Fails with [`PointError::InsufficientBalance`] when the balance is
    /// smaller than `amount`, leaving balance and history untouched.
    pub async fn use_points(&self, id: u64, amount: i64) -> Result<UserPoint> {
        let amount = Amount::new(amount)?;
        let _guard = self.locks.acquire(id).await;

        let current = self.balances.read(id).await?;
        if current.point < amount.value() {
            warn!(
                id,
                amount = amount.value(),
                current = current.point,
                "use rejected: insufficient balance"
            );
            return Err(PointError::InsufficientBalance {
                current: current.point,
                amount: amount.value(),
            });
        }

        let updated = self.balances.write(id, current.point - amount.value()).await?;
        self.histories
            .append(id, amount.value(), TransactionType::Use, now_millis())
            .await?;
        debug!(id, point = updated.point, "use applied");
        Ok(updated)
    }

    /// Returns the user's history records in storage order, without
    /// locking. Callers wanting recency sort by `(update_millis, seq)`.
    pub async fn history(&self, id: u64) -> Result<Vec<PointHistory>> {
        self.histories.read_all(id).await
    }

    /// Consumes the service and returns the final state of all user points.
    pub async fn into_results(self) -> Result<Vec<UserPoint>> {
        let mut points = self.balances.all().await?;
        points.sort_by_key(|p| p.id);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{InMemoryBalanceStore, InMemoryHistoryStore};

    fn service() -> PointService {
        PointService::new(
            Box::new(InMemoryBalanceStore::new()),
            Box::new(InMemoryHistoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_unseen_user_defaults_to_zero() {
        let service = service();
        let point = service.balance(1).await.unwrap();
        assert_eq!(point, UserPoint::empty(1));
    }

    #[tokio::test]
    async fn test_sequential_charges_accumulate() {
        let service = service();
        service.charge(1, 100).await.unwrap();
        let point = service.charge(1, 200).await.unwrap();
        assert_eq!(point.point, 300);
    }

    #[tokio::test]
    async fn test_charge_over_cap_rejected_and_state_unchanged() {
        let service = service();
        service.charge(1, 300).await.unwrap();

        let err = service.charge(1, 9_999_701).await.unwrap_err();
        assert!(matches!(
            err,
            PointError::BalanceLimitExceeded {
                current: 300,
                amount: 9_999_701,
                max: MAX_BALANCE,
            }
        ));
        assert_eq!(service.balance(1).await.unwrap().point, 300);
        // The rejected charge left no history record behind.
        assert_eq!(service.history(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_charge_to_exact_cap_succeeds() {
        let service = service();
        let point = service.charge(1, MAX_BALANCE).await.unwrap();
        assert_eq!(point.point, MAX_BALANCE);
    }

    #[tokio::test]
    async fn test_charge_overflow_amount_rejected() {
        let service = service();
        service.charge(1, 1).await.unwrap();
        let err = service.charge(1, i64::MAX).await.unwrap_err();
        assert!(matches!(err, PointError::BalanceLimitExceeded { .. }));
        assert_eq!(service.balance(1).await.unwrap().point, 1);
    }

    #[tokio::test]
    async fn test_use_more_than_balance_rejected() {
        let service = service();
        service.charge(1, 50).await.unwrap();

        let err = service.use_points(1, 51).await.unwrap_err();
        assert!(matches!(
            err,
            PointError::InsufficientBalance {
                current: 50,
                amount: 51,
            }
        ));
        assert_eq!(service.balance(1).await.unwrap().point, 50);
    }

    #[tokio::test]
    async fn test_use_on_zero_balance_mentions_insufficient_balance() {
        let service = service();
        let err = service.use_points(1, 10).await.unwrap_err();
        assert!(err.to_string().contains("insufficient balance"));
    }

    #[tokio::test]
    async fn test_zero_and_negative_amounts_rejected_without_side_effects() {
        let service = service();
        assert!(matches!(
            service.charge(1, 0).await.unwrap_err(),
            PointError::InvalidAmount(0)
        ));
        assert!(matches!(
            service.use_points(1, -3).await.unwrap_err(),
            PointError::InvalidAmount(-3)
        ));
        assert!(service.history(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_every_successful_mutation_appends_one_record() {
        let service = service();
        service.charge(1, 100).await.unwrap();
        service.use_points(1, 40).await.unwrap();
        service.charge(1, 5).await.unwrap();

        let history = service.history(1).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].r#type, TransactionType::Charge);
        assert_eq!(history[0].amount, 100);
        assert_eq!(history[1].r#type, TransactionType::Use);
        assert_eq!(history[1].amount, 40);
        assert_eq!(history[2].r#type, TransactionType::Charge);
        assert_eq!(history[2].amount, 5);
    }

    #[tokio::test]
    async fn test_history_sequence_is_monotonic_per_user() {
        let service = service();
        for _ in 0..5 {
            service.charge(1, 10).await.unwrap();
        }
        service.charge(2, 10).await.unwrap();

        let history = service.history(1).await.unwrap();
        let seqs: Vec<u64> = history.iter().map(|h| h.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
        assert_eq!(service.history(2).await.unwrap()[0].seq, 1);
    }

    #[tokio::test]
    async fn test_charge_use_scenario() {
        let service = service();
        assert_eq!(service.charge(1, 100).await.unwrap().point, 100);
        assert_eq!(service.charge(1, 200).await.unwrap().point, 300);
        assert_eq!(service.use_points(1, 200).await.unwrap().point, 100);
        assert_eq!(service.use_points(1, 100).await.unwrap().point, 0);
        assert!(matches!(
            service.use_points(1, 1).await.unwrap_err(),
            PointError::InsufficientBalance { .. }
        ));
    }

    #[tokio::test]
    async fn test_into_results_reports_all_users_sorted() {
        let service = service();
        service.charge(3, 30).await.unwrap();
        service.charge(1, 10).await.unwrap();
        service.charge(2, 20).await.unwrap();

        let points = service.into_results().await.unwrap();
        let ids: Vec<u64> = points.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(points[2].point, 30);
    }
}
