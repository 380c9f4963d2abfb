use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::repositories::{
    events::EventRepository, ledger::LedgerRepository, partners::PartnerRepository,
    payments::PurchaseRepository, spins::SpinHistoryRepository, users::UserRepository,
};
use crate::settings::Settings;

pub mod http;
pub mod ledger;
pub mod partners;
pub mod payments;
pub mod spins;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Event is not active")]
    FeatureDisabled,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No spins left")]
    InsufficientCredits,
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let capacity = settings.services.channel_capacity;
    let (ledger_tx, mut ledger_rx) = mpsc::channel(capacity);
    let (partner_tx, mut partner_rx) = mpsc::channel(capacity);
    let (spin_tx, mut spin_rx) = mpsc::channel(capacity);
    let (payment_tx, mut payment_rx) = mpsc::channel(capacity);

    let users = Arc::new(UserRepository::new(pool.clone()));

    let mut ledger_service = ledger::LedgerService::new();
    let mut partner_service = partners::PartnerService::new();
    let mut spin_service = spins::SpinService::new();
    let mut payment_service = payments::PaymentService::new();

    log::info!("Starting ledger service.");
    let ledger_handler =
        ledger::LedgerRequestHandler::new(Arc::new(LedgerRepository::new(pool.clone())));
    tokio::spawn(async move {
        ledger_service.run(ledger_handler, &mut ledger_rx).await;
    });

    log::info!("Starting partner service.");
    let partner_handler = partners::PartnerRequestHandler::new(
        users.clone(),
        Arc::new(PartnerRepository::new(pool.clone())),
        settings.partners.usd_to_rub_rate,
    );
    tokio::spawn(async move {
        partner_service.run(partner_handler, &mut partner_rx).await;
    });

    log::info!("Starting spin service.");
    let spin_handler = spins::SpinRequestHandler::new(
        users.clone(),
        Arc::new(EventRepository::new(pool.clone())),
        Arc::new(SpinHistoryRepository::new(pool.clone())),
        ledger_tx.clone(),
        Arc::new(spins::ThreadRandom),
        settings.spin.event_key,
    );
    tokio::spawn(async move {
        spin_service.run(spin_handler, &mut spin_rx).await;
    });

    log::info!("Starting payment service.");
    let payment_handler = payments::PaymentRequestHandler::new(
        Arc::new(PurchaseRepository::new(pool.clone())),
        ledger_tx.clone(),
        partner_tx.clone(),
    );
    tokio::spawn(async move {
        payment_service.run(payment_handler, &mut payment_rx).await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(&settings.http.listen, spin_tx, payment_tx).await
}
