use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct EventSettings {
    pub event_key: String,
    pub enabled: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl EventSettings {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.enabled
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| end >= now)
    }
}

/// An event without a settings row is not gated.
pub fn event_active(settings: Option<&EventSettings>, now: DateTime<Utc>) -> bool {
    settings.map_or(true, |settings| settings.is_active(now))
}
