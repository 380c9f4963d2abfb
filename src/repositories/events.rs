use async_trait::async_trait;
use sqlx::PgPool;

use super::EventStore;
use crate::models::events::EventSettings;

#[derive(Clone)]
pub struct EventRepository {
    conn: PgPool,
}

impl EventRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn get_event_settings(&self, key: &str) -> Result<Option<EventSettings>, anyhow::Error> {
        let settings = sqlx::query_as::<_, EventSettings>(
            "SELECT event_key, enabled, start_date, end_date FROM event_settings WHERE event_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.conn)
        .await?;

        Ok(settings)
    }
}
