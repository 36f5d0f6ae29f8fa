//! Health check controller.
//!
//! | Path            | Aggregates |
//! |-----------------|------------|
//! | `/health-check` | full set   |
//! | `/liveness`     | liveness   |
//! | `/readiness`    | readiness  |
//! | `/healthcheck`  | liveness   |

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::health::CheckKind;
use crate::http::response::HealthCheckResponse;
use crate::http::server::AppState;

pub async fn check(State(state): State<AppState>) -> Response {
    respond(&state, CheckKind::Full).await
}

pub async fn liveness(State(state): State<AppState>) -> Response {
    respond(&state, CheckKind::Liveness).await
}

pub async fn readiness(State(state): State<AppState>) -> Response {
    respond(&state, CheckKind::Readiness).await
}

async fn respond(state: &AppState, kind: CheckKind) -> Response {
    let (status, result) = match state.service.run(kind).await {
        Ok(result) => (StatusCode::OK, result),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.result),
    };

    let body = HealthCheckResponse::new(state.git_sha.as_ref(), result);
    (status, Json(body)).into_response()
}
