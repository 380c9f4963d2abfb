use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use super::{error_response, AppState};
use crate::models::users::UserId;
use crate::services::{spins::SpinRequest, ServiceError};

#[derive(Deserialize)]
pub struct SpinBody {
    user_id: Option<UserId>,
}

pub async fn spin(
    State(state): State<AppState>,
    body: Result<Json<SpinBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(&ServiceError::InvalidInput(rejection.body_text()));
        }
    };
    let (spin_tx, spin_rx) = oneshot::channel();

    let send_result = state
        .spin_channel
        .send(SpinRequest::Spin {
            user_id: body.user_id,
            response: spin_tx,
        })
        .await;
    if let Err(e) = send_result {
        return error_response(&ServiceError::Communication(
            "HTTP => Spin".to_string(),
            e.to_string(),
        ));
    }

    match spin_rx.await {
        Ok(Ok(result)) => (StatusCode::OK, Json(json!(result))),
        Ok(Err(service_error)) => error_response(&service_error),
        Err(e) => error_response(&ServiceError::Communication(
            "Spin => HTTP".to_string(),
            e.to_string(),
        )),
    }
}
