use serde::{Deserialize, Serialize};

use super::users::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceChangeReason {
    SpinReward,
    PackagePurchase,
}

impl BalanceChangeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceChangeReason::SpinReward => "spin_reward",
            BalanceChangeReason::PackagePurchase => "package_purchase",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BalanceChange {
    pub user_id: UserId,
    pub old_balance: i64,
    pub new_balance: i64,
    pub reason: BalanceChangeReason,
    pub metadata: serde_json::Value,
}

impl BalanceChange {
    pub fn delta(&self) -> i64 {
        self.new_balance - self.old_balance
    }
}
