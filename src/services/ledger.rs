use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{RequestHandler, Service};
use crate::models::ledger::BalanceChange;
use crate::repositories::LedgerStore;

pub enum LedgerRequest {
    LogBalanceChange(BalanceChange),
}

/// Queues a balance change without waiting for it to be written.
pub fn submit_balance_change(channel: &mpsc::Sender<LedgerRequest>, change: BalanceChange) {
    let channel = channel.clone();

    tokio::spawn(async move {
        if let Err(e) = channel.send(LedgerRequest::LogBalanceChange(change)).await {
            log::error!("Could not queue balance change: {}", e);
        }
    });
}

#[derive(Clone)]
pub struct LedgerRequestHandler {
    repository: Arc<dyn LedgerStore>,
}

impl LedgerRequestHandler {
    pub fn new(repository: Arc<dyn LedgerStore>) -> Self {
        LedgerRequestHandler { repository }
    }

    async fn log_balance_change(&self, change: BalanceChange) {
        match self.repository.insert_balance_change(&change).await {
            Ok(()) => log::debug!(
                "Balance change logged: user={}, {} -> {} ({:+}, {})",
                change.user_id,
                change.old_balance,
                change.new_balance,
                change.delta(),
                change.reason.as_str()
            ),
            Err(e) => log::error!(
                "Failed to log balance change for user {} ({} -> {}, {}): {}",
                change.user_id,
                change.old_balance,
                change.new_balance,
                change.reason.as_str(),
                e
            ),
        }
    }
}

#[async_trait]
impl RequestHandler<LedgerRequest> for LedgerRequestHandler {
    async fn handle_request(&self, request: LedgerRequest) {
        match request {
            LedgerRequest::LogBalanceChange(change) => self.log_balance_change(change).await,
        }
    }
}

pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        LedgerService {}
    }
}

#[async_trait]
impl Service<LedgerRequest, LedgerRequestHandler> for LedgerService {}
