use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use super::{payments::PaymentRequest, spins::SpinRequest, ServiceError};
use crate::models::packages::{TokenPackage, TOKEN_PACKAGES};

mod payments;
mod spins;

#[derive(Clone)]
pub struct AppState {
    spin_channel: mpsc::Sender<SpinRequest>,
    payment_channel: mpsc::Sender<PaymentRequest>,
}

pub type ErrorResponse = (StatusCode, Json<Value>);

pub fn error_response(error: &ServiceError) -> ErrorResponse {
    match error {
        ServiceError::InvalidInput(message) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
        }
        ServiceError::FeatureDisabled => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Event is not active", "event_disabled": true })),
        ),
        ServiceError::NotFound(message) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("{} not found", message) })),
        ),
        ServiceError::InsufficientCredits => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "No spins left" })),
        ),
        ServiceError::Persistence(_) | ServiceError::Internal(_) | ServiceError::Communication(..) => {
            log::error!("Request failed: {}", error);
            internal_error()
        }
    }
}

pub fn internal_error() -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

async fn list_packages() -> Json<&'static [TokenPackage]> {
    Json(TOKEN_PACKAGES)
}

pub fn router(
    spin_channel: mpsc::Sender<SpinRequest>,
    payment_channel: mpsc::Sender<PaymentRequest>,
) -> Router {
    let app_state = AppState {
        spin_channel,
        payment_channel,
    };

    Router::new()
        .route("/spin", post(spins::spin))
        .route("/payments/completed", post(payments::complete_payment))
        .route("/packages", get(list_packages))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(
    listen: &str,
    spin_channel: mpsc::Sender<SpinRequest>,
    payment_channel: mpsc::Sender<PaymentRequest>,
) -> Result<(), anyhow::Error> {
    let app = router(spin_channel, payment_channel);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
