use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::LedgerStore;
use crate::models::ledger::BalanceChange;

#[derive(Clone)]
pub struct LedgerRepository {
    conn: PgPool,
}

impl LedgerRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn insert_balance_change(&self, change: &BalanceChange) -> Result<(), anyhow::Error> {
        let id = Uuid::new_v4().hyphenated().to_string();

        sqlx::query(
            r#"
            INSERT INTO balance_audit_log
            (id, user_id, old_balance, new_balance, reason, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(change.user_id)
        .bind(change.old_balance)
        .bind(change.new_balance)
        .bind(change.reason.as_str())
        .bind(&change.metadata)
        .execute(&self.conn)
        .await?;

        Ok(())
    }
}
