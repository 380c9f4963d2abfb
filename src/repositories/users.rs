use async_trait::async_trait;
use sqlx::PgPool;

use super::UserStore;
use crate::models::users::{BalanceUpdate, User, UserId};

const USER_COLUMNS: &str = r#"
    id, username, balance, spins, ref_code, partner_percent,
    partner_balance_stars, partner_balance_money
"#;

#[derive(Clone)]
pub struct UserRepository {
    conn: PgPool,
}

impl UserRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, anyhow::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 ORDER BY id LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.conn)
        .await?;

        Ok(user)
    }

    async fn consume_spin(
        &self,
        id: UserId,
        credit: i64,
    ) -> Result<Option<BalanceUpdate>, anyhow::Error> {
        let update = sqlx::query_as::<_, BalanceUpdate>(
            r#"
            UPDATE users
            SET spins = spins - 1, balance = balance + $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND spins >= 1
            RETURNING balance - $2 AS old_balance, balance AS new_balance, spins
            "#,
        )
        .bind(id)
        .bind(credit)
        .fetch_optional(&self.conn)
        .await?;

        Ok(update)
    }
}
