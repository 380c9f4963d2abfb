use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::bail;
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use super::{EventStore, LedgerStore, PartnerStore, PurchaseStore, SpinHistoryStore, UserStore};
use crate::models::{
    events::EventSettings,
    ledger::BalanceChange,
    partners::{PartnerCredit, PartnerTransaction},
    payments::{Purchase, PurchaseOutcome},
    spins::SpinHistoryRecord,
    users::{BalanceUpdate, User, UserId},
};

/// Process-local stand-in for the Postgres repositories.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    events: DashMap<String, EventSettings>,
    history: Mutex<Vec<SpinHistoryRecord>>,
    balance_changes: Mutex<Vec<BalanceChange>>,
    partner_transactions: DashMap<String, PartnerTransaction>,
    purchases: DashMap<String, Purchase>,
    calls: AtomicUsize,
    fail_history: AtomicBool,
    fail_ledger: AtomicBool,
    fail_writes: AtomicBool,
    lose_spin_race: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|user| user.clone())
    }

    pub fn set_event(&self, settings: EventSettings) {
        self.events.insert(settings.event_key.clone(), settings);
    }

    pub fn history(&self) -> Vec<SpinHistoryRecord> {
        self.history.lock().unwrap().clone()
    }

    pub fn balance_changes(&self) -> Vec<BalanceChange> {
        self.balance_changes.lock().unwrap().clone()
    }

    pub fn partner_transactions(&self) -> Vec<PartnerTransaction> {
        self.partner_transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn purchase_count(&self) -> usize {
        self.purchases.len()
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    pub fn fail_ledger(&self, fail: bool) {
        self.fail_ledger.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes `consume_spin` behave as if another request took the last credit.
    pub fn lose_spin_race(&self, lose: bool) {
        self.lose_spin_race.store(lose, Ordering::SeqCst);
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn user(id: UserId, balance: i64, spins: i32) -> User {
    User {
        id,
        username: None,
        balance,
        spins,
        ref_code: None,
        partner_percent: 0,
        partner_balance_stars: 0,
        partner_balance_money: 0.0,
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, anyhow::Error> {
        self.record_call();
        Ok(self.user(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, anyhow::Error> {
        self.record_call();
        Ok(self
            .users
            .iter()
            .filter(|entry| entry.username.as_deref() == Some(username))
            .min_by_key(|entry| entry.id)
            .map(|entry| entry.value().clone()))
    }

    async fn consume_spin(
        &self,
        id: UserId,
        credit: i64,
    ) -> Result<Option<BalanceUpdate>, anyhow::Error> {
        self.record_call();
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("connection reset");
        }
        if self.lose_spin_race.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        if user.spins < 1 {
            return Ok(None);
        }

        let old_balance = user.balance;
        user.spins -= 1;
        user.balance += credit;

        Ok(Some(BalanceUpdate {
            old_balance,
            new_balance: user.balance,
            spins: user.spins,
        }))
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_event_settings(&self, key: &str) -> Result<Option<EventSettings>, anyhow::Error> {
        self.record_call();
        Ok(self.events.get(key).map(|settings| settings.clone()))
    }
}

#[async_trait]
impl SpinHistoryStore for MemoryStore {
    async fn insert_spin(&self, record: &SpinHistoryRecord) -> Result<(), anyhow::Error> {
        self.record_call();
        if self.fail_history.load(Ordering::SeqCst) {
            bail!("spin_history unavailable");
        }

        self.history.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_balance_change(&self, change: &BalanceChange) -> Result<(), anyhow::Error> {
        self.record_call();
        if self.fail_ledger.load(Ordering::SeqCst) {
            bail!("balance_audit_log unavailable");
        }

        self.balance_changes.lock().unwrap().push(change.clone());
        Ok(())
    }
}

#[async_trait]
impl PartnerStore for MemoryStore {
    async fn record_commission(
        &self,
        transaction: &PartnerTransaction,
        credit: PartnerCredit,
    ) -> Result<bool, anyhow::Error> {
        self.record_call();

        match self.partner_transactions.entry(transaction.payment_id.clone()) {
            Entry::Occupied(_) => return Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(transaction.clone());
            }
        }

        if let Some(mut partner) = self.users.get_mut(&transaction.partner_id) {
            match credit {
                PartnerCredit::Stars(stars) => partner.partner_balance_stars += stars,
                PartnerCredit::Money(money) => partner.partner_balance_money += money,
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn settle_purchase(
        &self,
        purchase: &Purchase,
    ) -> Result<Option<PurchaseOutcome>, anyhow::Error> {
        self.record_call();
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("connection reset");
        }

        if self.purchases.contains_key(&purchase.payment_id) {
            return Ok(Some(PurchaseOutcome::Duplicate));
        }

        let Some(mut user) = self.users.get_mut(&purchase.user_id) else {
            return Ok(None);
        };

        let old_balance = user.balance;
        user.balance += purchase.tokens;
        user.spins += purchase.spins;
        let update = BalanceUpdate {
            old_balance,
            new_balance: user.balance,
            spins: user.spins,
        };
        drop(user);

        self.purchases
            .insert(purchase.payment_id.clone(), purchase.clone());
        Ok(Some(PurchaseOutcome::Granted(update)))
    }
}
