use serde::{Deserialize, Serialize};

/// Telegram user id.
pub type UserId = i64;

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub balance: i64,
    pub spins: i32,
    /// Username of the partner who referred this user.
    pub ref_code: Option<String>,
    pub partner_percent: i32,
    pub partner_balance_stars: i64,
    pub partner_balance_money: f64,
}

impl User {
    pub fn referrer(&self) -> Option<&str> {
        self.ref_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Balance and spin credits after a conditional update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct BalanceUpdate {
    pub old_balance: i64,
    pub new_balance: i64,
    pub spins: i32,
}
