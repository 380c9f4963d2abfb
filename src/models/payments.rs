use serde::{Deserialize, Serialize};

use super::partners::Currency;
use super::users::{BalanceUpdate, UserId};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CompletedPayment {
    pub payment_id: String,
    pub user_id: UserId,
    pub package_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub payment_id: String,
    pub user_id: UserId,
    pub package_id: String,
    pub amount: i64,
    pub currency: Currency,
    pub tokens: i64,
    pub spins: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Granted(BalanceUpdate),
    /// The payment id was already settled.
    Duplicate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub success: bool,
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_spins: Option<i32>,
}
