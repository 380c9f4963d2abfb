use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PartnerStore;
use crate::models::partners::{PartnerCredit, PartnerTransaction};

#[derive(Clone)]
pub struct PartnerRepository {
    conn: PgPool,
}

impl PartnerRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PartnerStore for PartnerRepository {
    async fn record_commission(
        &self,
        transaction: &PartnerTransaction,
        credit: PartnerCredit,
    ) -> Result<bool, anyhow::Error> {
        let id = Uuid::new_v4().hyphenated().to_string();
        let mut tx = self.conn.begin().await?;

        let inserted: Option<String> = sqlx::query_scalar(
            r#"
            INSERT INTO partner_transactions
            (id, payment_id, partner_id, source_user_id, amount, currency, bonus_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (payment_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&transaction.payment_id)
        .bind(transaction.partner_id)
        .bind(transaction.source_user_id)
        .bind(transaction.amount)
        .bind(transaction.currency.as_str())
        .bind(transaction.bonus_amount)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        match credit {
            PartnerCredit::Stars(stars) => {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET partner_balance_stars = partner_balance_stars + $1, updated_at = CURRENT_TIMESTAMP
                    WHERE id = $2
                    "#,
                )
                .bind(stars)
                .bind(transaction.partner_id)
                .execute(&mut *tx)
                .await?;
            }
            PartnerCredit::Money(money) => {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET partner_balance_money = partner_balance_money + $1, updated_at = CURRENT_TIMESTAMP
                    WHERE id = $2
                    "#,
                )
                .bind(money)
                .bind(transaction.partner_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }
}
