use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use super::ledger::{submit_balance_change, LedgerRequest};
use super::partners::{submit_partner_bonus, PartnerRequest};
use super::{RequestHandler, Service, ServiceError};
use crate::models::{
    ledger::{BalanceChange, BalanceChangeReason},
    packages,
    payments::{CompletedPayment, Purchase, PurchaseOutcome, SettlementResult},
};
use crate::repositories::PurchaseStore;

pub enum PaymentRequest {
    Complete {
        payment: CompletedPayment,
        response: oneshot::Sender<Result<SettlementResult, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct PaymentRequestHandler {
    repository: Arc<dyn PurchaseStore>,
    ledger_channel: mpsc::Sender<LedgerRequest>,
    partner_channel: mpsc::Sender<PartnerRequest>,
}

impl PaymentRequestHandler {
    pub fn new(
        repository: Arc<dyn PurchaseStore>,
        ledger_channel: mpsc::Sender<LedgerRequest>,
        partner_channel: mpsc::Sender<PartnerRequest>,
    ) -> Self {
        PaymentRequestHandler {
            repository,
            ledger_channel,
            partner_channel,
        }
    }

    async fn complete_payment(
        &self,
        payment: CompletedPayment,
    ) -> Result<SettlementResult, ServiceError> {
        let payment_id = payment.payment_id.trim();
        if payment_id.is_empty() {
            return Err(ServiceError::InvalidInput(
                "payment_id is required".to_string(),
            ));
        }

        let package = packages::find_package(&payment.package_id).ok_or_else(|| {
            ServiceError::InvalidInput(format!("Unknown package: {}", payment.package_id))
        })?;

        let purchase = Purchase {
            payment_id: payment_id.to_string(),
            user_id: payment.user_id,
            package_id: package.id.to_string(),
            amount: package.price,
            currency: package.currency,
            tokens: package.tokens,
            spins: package.bonus_spins,
        };

        let outcome = self
            .repository
            .settle_purchase(&purchase)
            .await
            .map_err(|e| {
                log::error!("Failed to settle payment {}: {}", purchase.payment_id, e);
                ServiceError::Persistence(e.to_string())
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("User {}", purchase.user_id)))?;

        let update = match outcome {
            PurchaseOutcome::Duplicate => {
                log::warn!("Payment {} was already settled.", purchase.payment_id);
                return Ok(SettlementResult {
                    success: true,
                    duplicate: true,
                    new_balance: None,
                    remaining_spins: None,
                });
            }
            PurchaseOutcome::Granted(update) => update,
        };

        log::info!(
            "Payment {} settled: user {} bought {} ({} tokens, {} spins)",
            purchase.payment_id,
            purchase.user_id,
            purchase.package_id,
            purchase.tokens,
            purchase.spins
        );

        submit_balance_change(
            &self.ledger_channel,
            BalanceChange {
                user_id: purchase.user_id,
                old_balance: update.old_balance,
                new_balance: update.new_balance,
                reason: BalanceChangeReason::PackagePurchase,
                metadata: json!({
                    "payment_id": purchase.payment_id,
                    "package_id": purchase.package_id,
                    "amount": purchase.amount,
                    "currency": purchase.currency.as_str(),
                }),
            },
        );

        submit_partner_bonus(
            &self.partner_channel,
            PartnerRequest::ProcessBonus {
                payment_id: purchase.payment_id.clone(),
                source_user_id: purchase.user_id,
                amount: purchase.amount,
                currency: purchase.currency,
            },
        );

        Ok(SettlementResult {
            success: true,
            duplicate: false,
            new_balance: Some(update.new_balance),
            remaining_spins: Some(update.spins),
        })
    }
}

#[async_trait]
impl RequestHandler<PaymentRequest> for PaymentRequestHandler {
    async fn handle_request(&self, request: PaymentRequest) {
        match request {
            PaymentRequest::Complete { payment, response } => {
                let result = self.complete_payment(payment).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct PaymentService;

impl PaymentService {
    pub fn new() -> Self {
        PaymentService {}
    }
}

#[async_trait]
impl Service<PaymentRequest, PaymentRequestHandler> for PaymentService {}
