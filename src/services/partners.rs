use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{RequestHandler, Service, ServiceError};
use crate::models::{
    partners::{self, Currency, PartnerTransaction},
    users::UserId,
};
use crate::repositories::{PartnerStore, UserStore};

pub enum PartnerRequest {
    ProcessBonus {
        payment_id: String,
        source_user_id: UserId,
        amount: i64,
        currency: Currency,
    },
}

/// Queues a commission for a completed payment. Never blocks the caller.
pub fn submit_partner_bonus(channel: &mpsc::Sender<PartnerRequest>, request: PartnerRequest) {
    let channel = channel.clone();

    tokio::spawn(async move {
        if let Err(e) = channel.send(request).await {
            log::error!("Could not queue partner bonus: {}", e);
        }
    });
}

#[derive(Clone)]
pub struct PartnerRequestHandler {
    users: Arc<dyn UserStore>,
    repository: Arc<dyn PartnerStore>,
    usd_to_rub_rate: f64,
}

impl PartnerRequestHandler {
    pub fn new(
        users: Arc<dyn UserStore>,
        repository: Arc<dyn PartnerStore>,
        usd_to_rub_rate: f64,
    ) -> Self {
        PartnerRequestHandler {
            users,
            repository,
            usd_to_rub_rate,
        }
    }

    /// Returns the recorded transaction, or `None` when no commission applies.
    async fn process_partner_bonus(
        &self,
        payment_id: String,
        source_user_id: UserId,
        amount: i64,
        currency: Currency,
    ) -> Result<Option<PartnerTransaction>, ServiceError> {
        let source = self
            .users
            .get_user(source_user_id)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        let Some(ref_code) = source.as_ref().and_then(|user| user.referrer()) else {
            return Ok(None);
        };

        let Some(partner) = self
            .users
            .get_user_by_username(ref_code)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?
        else {
            log::debug!("No partner matches referral code {}", ref_code);
            return Ok(None);
        };

        if partner.partner_percent <= 0 {
            return Ok(None);
        }

        let bonus = partners::commission(amount, partner.partner_percent);
        if bonus <= 0 {
            return Ok(None);
        }

        let transaction = PartnerTransaction {
            payment_id,
            partner_id: partner.id,
            source_user_id,
            amount,
            currency,
            bonus_amount: bonus,
        };
        let credit = partners::partner_credit(bonus, currency, self.usd_to_rub_rate);

        let recorded = self
            .repository
            .record_commission(&transaction, credit)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        if !recorded {
            log::warn!(
                "Commission for payment {} was already recorded, skipping.",
                transaction.payment_id
            );
            return Ok(None);
        }

        Ok(Some(transaction))
    }
}

#[async_trait]
impl RequestHandler<PartnerRequest> for PartnerRequestHandler {
    async fn handle_request(&self, request: PartnerRequest) {
        match request {
            PartnerRequest::ProcessBonus {
                payment_id,
                source_user_id,
                amount,
                currency,
            } => {
                let result = self
                    .process_partner_bonus(payment_id.clone(), source_user_id, amount, currency)
                    .await;

                match result {
                    Ok(Some(transaction)) => log::info!(
                        "Partner {} earned {} {} from payment {} by user {}",
                        transaction.partner_id,
                        transaction.bonus_amount,
                        transaction.currency,
                        transaction.payment_id,
                        transaction.source_user_id
                    ),
                    Ok(None) => log::debug!("No partner commission for payment {}", payment_id),
                    Err(e) => log::error!(
                        "Failed to process partner commission for payment {}: {}",
                        payment_id,
                        e
                    ),
                }
            }
        }
    }
}

pub struct PartnerService;

impl PartnerService {
    pub fn new() -> Self {
        PartnerService {}
    }
}

#[async_trait]
impl Service<PartnerRequest, PartnerRequestHandler> for PartnerService {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::User;
    use crate::repositories::memory::{user, MemoryStore};

    const BUYER: UserId = 10;
    const PARTNER: UserId = 20;

    fn store_with(ref_code: Option<&str>, partner_percent: i32) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.insert_user(User {
            ref_code: ref_code.map(str::to_string),
            ..user(BUYER, 0, 0)
        });
        store.insert_user(User {
            username: Some("partner".to_string()),
            partner_percent,
            ..user(PARTNER, 0, 0)
        });
        store
    }

    fn handler(store: &Arc<MemoryStore>) -> PartnerRequestHandler {
        PartnerRequestHandler::new(store.clone(), store.clone(), 90.0)
    }

    async fn process(store: &Arc<MemoryStore>, payment_id: &str, amount: i64, currency: Currency) {
        handler(store)
            .handle_request(PartnerRequest::ProcessBonus {
                payment_id: payment_id.to_string(),
                source_user_id: BUYER,
                amount,
                currency,
            })
            .await;
    }

    #[tokio::test]
    async fn no_referral_code_is_a_no_op() {
        let store = store_with(None, 10);

        process(&store, "p1", 1000, Currency::Xtr).await;

        assert!(store.partner_transactions().is_empty());
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_stars, 0);
    }

    #[tokio::test]
    async fn unknown_partner_is_a_no_op() {
        let store = store_with(Some("someone_else"), 10);

        process(&store, "p1", 1000, Currency::Xtr).await;

        assert!(store.partner_transactions().is_empty());
    }

    #[tokio::test]
    async fn zero_percent_is_a_no_op() {
        let store = store_with(Some("partner"), 0);

        process(&store, "p1", 1000, Currency::Xtr).await;

        assert!(store.partner_transactions().is_empty());
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_stars, 0);
    }

    #[tokio::test]
    async fn bonus_rounding_to_zero_is_a_no_op() {
        let store = store_with(Some("partner"), 10);

        process(&store, "p1", 9, Currency::Xtr).await;

        assert!(store.partner_transactions().is_empty());
    }

    #[tokio::test]
    async fn unknown_source_user_is_a_no_op() {
        let store = store_with(Some("partner"), 10);
        let handler = handler(&store);

        let result = handler
            .process_partner_bonus("p1".to_string(), 999, 1000, Currency::Xtr)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn stars_payment_credits_floor_of_percent() {
        let store = store_with(Some("partner"), 15);

        process(&store, "p1", 333, Currency::Xtr).await;

        let transactions = store.partner_transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].bonus_amount, 49);
        assert_eq!(transactions[0].partner_id, PARTNER);
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_stars, 49);
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_money, 0.0);
    }

    #[tokio::test]
    async fn rub_payment_credits_major_units() {
        let store = store_with(Some("partner"), 10);

        process(&store, "p1", 44_900, Currency::Rub).await;

        let partner = store.user(PARTNER).unwrap();
        assert_eq!(store.partner_transactions()[0].bonus_amount, 4_490);
        assert_eq!(partner.partner_balance_money, 44.9);
        assert_eq!(partner.partner_balance_stars, 0);
    }

    #[tokio::test]
    async fn usd_payment_is_converted_before_crediting() {
        let store = store_with(Some("partner"), 20);

        process(&store, "p1", 1_000, Currency::Usd).await;

        assert_eq!(store.partner_transactions()[0].bonus_amount, 200);
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_money, 180.0);
    }

    #[tokio::test]
    async fn same_payment_is_credited_once() {
        let store = store_with(Some("partner"), 10);

        process(&store, "p1", 1000, Currency::Xtr).await;
        process(&store, "p1", 1000, Currency::Xtr).await;
        process(&store, "p2", 1000, Currency::Xtr).await;

        assert_eq!(store.partner_transactions().len(), 2);
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_stars, 200);
    }

    #[tokio::test]
    async fn shared_username_credits_the_lowest_id() {
        let store = store_with(Some("partner"), 10);
        store.insert_user(User {
            username: Some("partner".to_string()),
            partner_percent: 50,
            ..user(PARTNER + 5, 0, 0)
        });

        for _ in 0..3 {
            process(&store, "p1", 1000, Currency::Xtr).await;
        }

        let transactions = store.partner_transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].partner_id, PARTNER);
        assert_eq!(store.user(PARTNER).unwrap().partner_balance_stars, 100);
        assert_eq!(store.user(PARTNER + 5).unwrap().partner_balance_stars, 0);
    }
}
