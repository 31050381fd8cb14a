use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::api::ApiState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub translation: HealthCheck,
    pub checked_at: String,
}

/// Pricing readiness decides the status code. A disabled translator only
/// degrades the translation check; the pricing endpoints never depend on it.
pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state);
    let translation = translation_check(&state);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "mandi-server runtime initialized".to_string(),
        },
        catalog,
        translation,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(state: &ApiState) -> HealthCheck {
    let crops = state.advisor.catalog().len();
    if crops == 0 {
        return HealthCheck { status: "degraded", detail: "price catalog is empty".to_string() };
    }
    HealthCheck { status: "ready", detail: format!("{crops} crops priced") }
}

fn translation_check(state: &ApiState) -> HealthCheck {
    match state.translation.backend() {
        "disabled" => HealthCheck {
            status: "disabled",
            detail: "translation requests return fallback text".to_string(),
        },
        backend => HealthCheck { status: "ready", detail: format!("{backend} backend configured") },
    }
}
