use async_trait::async_trait;

use crate::models::{
    events::EventSettings,
    ledger::BalanceChange,
    partners::{PartnerCredit, PartnerTransaction},
    payments::{Purchase, PurchaseOutcome},
    spins::SpinHistoryRecord,
    users::{BalanceUpdate, User, UserId},
};

pub mod events;
pub mod ledger;
pub mod partners;
pub mod payments;
pub mod spins;
pub mod users;

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, anyhow::Error>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, anyhow::Error>;

    /// Takes one spin credit and adds `credit` tokens in a single conditional
    /// write. `None` when the user is missing or holds no credit.
    async fn consume_spin(
        &self,
        id: UserId,
        credit: i64,
    ) -> Result<Option<BalanceUpdate>, anyhow::Error>;
}

#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    async fn get_event_settings(&self, key: &str) -> Result<Option<EventSettings>, anyhow::Error>;
}

#[async_trait]
pub trait SpinHistoryStore: Send + Sync + 'static {
    async fn insert_spin(&self, record: &SpinHistoryRecord) -> Result<(), anyhow::Error>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    async fn insert_balance_change(&self, change: &BalanceChange) -> Result<(), anyhow::Error>;
}

#[async_trait]
pub trait PartnerStore: Send + Sync + 'static {
    /// Records the commission and credits the partner. `false` when the
    /// payment already carried a commission.
    async fn record_commission(
        &self,
        transaction: &PartnerTransaction,
        credit: PartnerCredit,
    ) -> Result<bool, anyhow::Error>;
}

#[async_trait]
pub trait PurchaseStore: Send + Sync + 'static {
    /// `None` when the buyer does not exist.
    async fn settle_purchase(
        &self,
        purchase: &Purchase,
    ) -> Result<Option<PurchaseOutcome>, anyhow::Error>;
}
