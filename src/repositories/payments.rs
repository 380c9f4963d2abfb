use async_trait::async_trait;
use sqlx::PgPool;

use super::PurchaseStore;
use crate::models::{
    payments::{Purchase, PurchaseOutcome},
    users::BalanceUpdate,
};

#[derive(Clone)]
pub struct PurchaseRepository {
    conn: PgPool,
}

impl PurchaseRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PurchaseStore for PurchaseRepository {
    async fn settle_purchase(
        &self,
        purchase: &Purchase,
    ) -> Result<Option<PurchaseOutcome>, anyhow::Error> {
        let mut tx = self.conn.begin().await?;

        let inserted: Option<String> = sqlx::query_scalar(
            r#"
            INSERT INTO purchases
            (payment_id, user_id, package_id, amount, currency, tokens, spins)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (payment_id) DO NOTHING
            RETURNING payment_id
            "#,
        )
        .bind(&purchase.payment_id)
        .bind(purchase.user_id)
        .bind(&purchase.package_id)
        .bind(purchase.amount)
        .bind(purchase.currency.as_str())
        .bind(purchase.tokens)
        .bind(purchase.spins)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_none() {
            tx.rollback().await?;
            return Ok(Some(PurchaseOutcome::Duplicate));
        }

        let update = sqlx::query_as::<_, BalanceUpdate>(
            r#"
            UPDATE users
            SET balance = balance + $2, spins = spins + $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING balance - $2 AS old_balance, balance AS new_balance, spins
            "#,
        )
        .bind(purchase.user_id)
        .bind(purchase.tokens)
        .bind(purchase.spins)
        .fetch_optional(&mut *tx)
        .await?;

        match update {
            Some(update) => {
                tx.commit().await?;
                Ok(Some(PurchaseOutcome::Granted(update)))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }
}
