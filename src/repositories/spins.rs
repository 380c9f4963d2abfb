use async_trait::async_trait;
use sqlx::PgPool;

use super::SpinHistoryStore;
use crate::models::spins::SpinHistoryRecord;

#[derive(Clone)]
pub struct SpinHistoryRepository {
    conn: PgPool,
}

impl SpinHistoryRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SpinHistoryStore for SpinHistoryRepository {
    async fn insert_spin(&self, record: &SpinHistoryRecord) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO spin_history (id, user_id, prize_type, prize_amount)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.id)
        .bind(record.user_id)
        .bind(record.prize_type.as_str())
        .bind(record.prize_amount)
        .execute(&self.conn)
        .await?;

        Ok(())
    }
}
