use crate::error::PointError;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound on any user's point balance.
pub const MAX_BALANCE: i64 = 10_000_000;

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A positive point amount for charge/use operations.
///
/// Ensures that mutation amounts are always strictly positive; a zero or
/// negative value is rejected before any lock is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, PointError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PointError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = PointError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A user's current point balance.
///
/// Created implicitly with zero points on first access; `update_millis` is
/// monotonically non-decreasing per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoint {
    /// The unique identifier for the user.
    pub id: u64,
    /// Current point balance, always within `[0, MAX_BALANCE]`.
    pub point: i64,
    /// Milliseconds timestamp of the last balance write.
    pub update_millis: i64,
}

impl UserPoint {
    /// The zero-balance default returned for users that have never been seen.
    pub fn empty(id: u64) -> Self {
        Self {
            id,
            point: 0,
            update_millis: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_validation() {
        assert_eq!(Amount::new(1).unwrap().value(), 1);
        assert!(matches!(Amount::new(0), Err(PointError::InvalidAmount(0))));
        assert!(matches!(
            Amount::new(-5),
            Err(PointError::InvalidAmount(-5))
        ));
    }

    #[test]
    fn test_amount_try_from() {
        let amount: Amount = 42i64.try_into().unwrap();
        assert_eq!(i64::from(amount), 42);
    }

    #[test]
    fn test_empty_user_point() {
        let point = UserPoint::empty(7);
        assert_eq!(point.id, 7);
        assert_eq!(point.point, 0);
        assert_eq!(point.update_millis, 0);
    }

    #[test]
    fn test_now_millis_advances() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
        assert!(a > 0);
    }
}
