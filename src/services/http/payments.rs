use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use super::{error_response, AppState};
use crate::models::payments::CompletedPayment;
use crate::services::{payments::PaymentRequest, ServiceError};

pub async fn complete_payment(
    State(state): State<AppState>,
    payment: Result<Json<CompletedPayment>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payment) = match payment {
        Ok(payment) => payment,
        Err(rejection) => {
            return error_response(&ServiceError::InvalidInput(rejection.body_text()));
        }
    };
    let (payment_tx, payment_rx) = oneshot::channel();

    let send_result = state
        .payment_channel
        .send(PaymentRequest::Complete {
            payment,
            response: payment_tx,
        })
        .await;
    if let Err(e) = send_result {
        return error_response(&ServiceError::Communication(
            "HTTP => Payment".to_string(),
            e.to_string(),
        ));
    }

    match payment_rx.await {
        Ok(Ok(result)) => (StatusCode::OK, Json(json!(result))),
        Ok(Err(service_error)) => error_response(&service_error),
        Err(e) => error_response(&ServiceError::Communication(
            "Payment => HTTP".to_string(),
            e.to_string(),
        )),
    }
}
