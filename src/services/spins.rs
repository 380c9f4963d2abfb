use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::ledger::{submit_balance_change, LedgerRequest};
use super::{RequestHandler, Service, ServiceError};
use crate::models::{
    events,
    ledger::{BalanceChange, BalanceChangeReason},
    spins::{select_segment, SpinHistoryRecord, SpinResult, SPIN_SEGMENTS},
    users::UserId,
};
use crate::repositories::{EventStore, SpinHistoryStore, UserStore};

/// Uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Sync + 'static {
    fn next_draw(&self) -> f64;
}

pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

pub enum SpinRequest {
    Spin {
        user_id: Option<UserId>,
        response: oneshot::Sender<Result<SpinResult, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct SpinRequestHandler {
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventStore>,
    history: Arc<dyn SpinHistoryStore>,
    ledger_channel: mpsc::Sender<LedgerRequest>,
    random: Arc<dyn RandomSource>,
    event_key: String,
}

impl SpinRequestHandler {
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
        history: Arc<dyn SpinHistoryStore>,
        ledger_channel: mpsc::Sender<LedgerRequest>,
        random: Arc<dyn RandomSource>,
        event_key: String,
    ) -> Self {
        SpinRequestHandler {
            users,
            events,
            history,
            ledger_channel,
            random,
            event_key,
        }
    }

    async fn spin(&self, user_id: Option<UserId>) -> Result<SpinResult, ServiceError> {
        let user_id =
            user_id.ok_or_else(|| ServiceError::InvalidInput("user_id is required".to_string()))?;

        let settings = self
            .events
            .get_event_settings(&self.event_key)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        if !events::event_active(settings.as_ref(), Utc::now()) {
            return Err(ServiceError::FeatureDisabled);
        }

        let user = self
            .users
            .get_user(user_id)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("User {}", user_id)))?;
        if user.spins < 1 {
            return Err(ServiceError::InsufficientCredits);
        }

        let draw = self.random.next_draw();
        let segment = *select_segment(&SPIN_SEGMENTS, draw)
            .ok_or_else(|| ServiceError::Internal("Spin wheel has no segments".to_string()))?;

        // A concurrent spin may have taken the last credit since the read above.
        let update = self
            .users
            .consume_spin(user_id, segment.balance_credit())
            .await
            .map_err(|e| {
                log::error!("Failed to apply spin for user {}: {}", user_id, e);
                ServiceError::Persistence(e.to_string())
            })?
            .ok_or(ServiceError::InsufficientCredits)?;

        log::info!(
            "User {} spun segment {} ({} {}), draw={:.6}, spins left={}",
            user_id,
            segment.index,
            segment.value,
            segment.prize_type.as_str(),
            draw,
            update.spins
        );

        let record = SpinHistoryRecord {
            id: Uuid::new_v4().hyphenated().to_string(),
            user_id,
            prize_type: segment.prize_type,
            prize_amount: segment.value,
        };
        if let Err(e) = self.history.insert_spin(&record).await {
            log::error!("Failed to record spin history for user {}: {}", user_id, e);
        }

        if update.new_balance != update.old_balance {
            submit_balance_change(
                &self.ledger_channel,
                BalanceChange {
                    user_id,
                    old_balance: update.old_balance,
                    new_balance: update.new_balance,
                    reason: BalanceChangeReason::SpinReward,
                    metadata: json!({
                        "prize_index": segment.index,
                        "prize_value": segment.value,
                        "prize_type": segment.prize_type.as_str(),
                    }),
                },
            );
        }

        Ok(SpinResult {
            success: true,
            prize_index: segment.index,
            prize_value: segment.value,
            prize_type: segment.prize_type,
            remaining_spins: update.spins,
            new_balance: update.new_balance,
        })
    }
}

#[async_trait]
impl RequestHandler<SpinRequest> for SpinRequestHandler {
    async fn handle_request(&self, request: SpinRequest) {
        match request {
            SpinRequest::Spin { user_id, response } => {
                let result = self.spin(user_id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct SpinService;

impl SpinService {
    pub fn new() -> Self {
        SpinService {}
    }
}

#[async_trait]
impl Service<SpinRequest, SpinRequestHandler> for SpinService {}
