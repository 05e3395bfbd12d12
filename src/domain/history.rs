use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Charge,
    Use,
}

/// An immutable record of one successful balance mutation.
///
/// `seq` is a per-user counter assigned by the history store on append, so
/// records sharing a millisecond timestamp still have an unambiguous order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointHistory {
    pub user_id: u64,
    pub seq: u64,
    pub amount: i64,
    pub r#type: TransactionType,
    pub update_millis: i64,
}
