//! JSON endpoints for price discovery, negotiation advice and message translation.
//!
//! - `POST /price`      `{crop, quantity}`    -> `{min, avg, recommended}`
//! - `POST /negotiate`  `{offer, avg}`        -> `{advice}`
//! - `POST /translate`  `{text, targetLang}`  -> `{translatedText}`
//! - `GET  /crops`                            -> `{crops: [{crop, min, avg}]}`
//! - `GET  /health`                           -> readiness payload
//!
//! Every failure is rendered as `{error}` with a client or server status code.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mandi_core::{
    ApplicationError, DomainError, InterfaceError, MarketAdvisor, TranslationService,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

#[derive(Clone, Debug)]
pub struct ApiState {
    pub advisor: MarketAdvisor,
    pub translation: TranslationService,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Numeric request fields decode as JSON numbers only; strings are rejected.
#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub crop: String,
    pub quantity: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct PriceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub recommended: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct NegotiateRequest {
    pub offer: f64,
    pub avg: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct NegotiateResponse {
    pub advice: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "targetLang")]
    pub target_lang: String,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

#[derive(Debug, Serialize)]
pub struct CropListing {
    pub crop: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CropsResponse {
    pub crops: Vec<CropListing>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn domain(error: DomainError, correlation_id: &str) -> Self {
        Self(ApplicationError::from(error).into_interface(correlation_id))
    }

    fn malformed(rejection: JsonRejection, correlation_id: &str) -> Self {
        Self::domain(DomainError::InvalidInput(rejection.body_text()), correlation_id)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        };
        warn!(
            event_name = "api.request.rejected",
            correlation_id = self.0.correlation_id(),
            status = status.as_u16(),
            error = %self.0,
            "request rejected"
        );
        (status, Json(ApiErrorBody { error: self.0.message().to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/price", post(price))
        .route("/negotiate", post(negotiate))
        .route("/translate", post(translate))
        .route("/crops", get(list_crops))
        .route("/health", get(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

fn require_finite(field: &str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::InvalidInput(format!("{field} must be a finite number")))
    }
}

/// Converts a wire number to `Decimal`, failing when it is outside `Decimal`'s range.
fn decimal_in_range(field: &str, value: f64) -> Result<Decimal, DomainError> {
    Decimal::try_from(require_finite(field, value)?).map_err(|_| {
        DomainError::InvalidInput(format!("{field} {value} is outside the supported range"))
    })
}

/// Offers are unbounded. Magnitudes beyond `Decimal`'s range clamp to its extremes,
/// which keeps the tier because the reference average always fits.
fn saturating_offer(value: f64) -> Result<Decimal, DomainError> {
    let value = require_finite("offer", value)?;
    Ok(Decimal::try_from(value).unwrap_or(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn price(
    State(state): State<ApiState>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Json(request) =
        payload.map_err(|rejection| ApiError::malformed(rejection, &correlation_id))?;

    let quote = decimal_in_range("quantity", request.quantity)
        .and_then(|quantity| state.advisor.price(&request.crop, quantity))
        .map_err(|error| ApiError::domain(error, &correlation_id))?;

    info!(
        event_name = "api.price.quoted",
        correlation_id = %correlation_id,
        crop = %quote.crop_id,
        quantity = %quote.quantity,
        avg = %quote.avg_price,
        "price quote computed"
    );

    Ok(Json(PriceResponse {
        min: quote.min_price,
        avg: quote.avg_price,
        recommended: quote.recommended_price,
    }))
}

pub async fn negotiate(
    State(state): State<ApiState>,
    payload: Result<Json<NegotiateRequest>, JsonRejection>,
) -> Result<Json<NegotiateResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Json(request) =
        payload.map_err(|rejection| ApiError::malformed(rejection, &correlation_id))?;

    let evaluated = saturating_offer(request.offer).and_then(|offer| {
        let avg = decimal_in_range("avg", request.avg)?;
        Ok((offer, avg, state.advisor.negotiate(offer, avg)?))
    });
    let (offer, avg, verdict) =
        evaluated.map_err(|error| ApiError::domain(error, &correlation_id))?;

    info!(
        event_name = "api.negotiate.evaluated",
        correlation_id = %correlation_id,
        offer = %offer,
        avg = %avg,
        tier = verdict.tier.as_str(),
        "offer classified"
    );

    Ok(Json(NegotiateResponse { advice: verdict.advice }))
}

/// Never fails once the body parses: translation errors fold into fallback text.
pub async fn translate(
    State(state): State<ApiState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Json(request) =
        payload.map_err(|rejection| ApiError::malformed(rejection, &correlation_id))?;

    let translated_text = state
        .translation
        .translate(&request.text, &request.target_lang, &correlation_id)
        .await;

    Ok(Json(TranslateResponse { translated_text }))
}

pub async fn list_crops(State(state): State<ApiState>) -> Json<CropsResponse> {
    let crops = state
        .advisor
        .catalog()
        .entries()
        .map(|entry| CropListing {
            crop: entry.crop_id.to_string(),
            min: entry.min_unit_price,
            avg: entry.avg_unit_price,
        })
        .collect();

    Json(CropsResponse { crops })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use mandi_core::{
        config::AppConfig, MarketAdvisor, NegotiationPolicy, TranslationError,
        TranslationService, Translator, TRANSLATION_FAILED,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{router, ApiState};

    struct EchoTranslator;

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(
            &self,
            text: &str,
            target_lang: &str,
        ) -> Result<String, TranslationError> {
            Ok(format!("{target_lang}:{text}"))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn app(translation: TranslationService) -> Router {
        let catalog = AppConfig::default().price_catalog().expect("default catalog is valid");
        router(ApiState {
            advisor: MarketAdvisor::new(catalog, NegotiationPolicy::default()),
            translation,
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, body.to_string()).await
    }

    async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn price_scales_catalog_entry_by_quantity() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/price",
            json!({ "crop": "tomato", "quantity": 5 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["min"].as_f64(), Some(90.0));
        assert_eq!(payload["avg"].as_f64(), Some(110.0));
        assert_eq!(payload["recommended"].as_f64(), Some(110.0));
    }

    #[tokio::test]
    async fn price_lookup_normalizes_crop_name() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/price",
            json!({ "crop": " Onion ", "quantity": 3 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["min"].as_f64(), Some(60.0));
        assert_eq!(payload["avg"].as_f64(), Some(78.0));
    }

    #[tokio::test]
    async fn unknown_crop_returns_client_error() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/price",
            json!({ "crop": "potato", "quantity": 1 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload, json!({ "error": "Crop not found" }));
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/price",
            json!({ "crop": "tomato", "quantity": 0 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().is_some_and(|message| message.contains("quantity")));
    }

    #[tokio::test]
    async fn non_numeric_quantity_is_rejected() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/price",
            json!({ "crop": "tomato", "quantity": "lots" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (status, payload) =
            post_raw(app(TranslationService::disabled()), "/negotiate", "{\"offer\":".to_string())
                .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn negotiate_returns_tier_advice() {
        let cases = [
            (80, "❌ Offer is too low. Consider increasing the price."),
            (100, "✅ This is a fair and reasonable price."),
            (120, "👍 Good deal for the vendor."),
        ];

        for (offer, advice) in cases {
            let (status, payload) = post_json(
                app(TranslationService::disabled()),
                "/negotiate",
                json!({ "offer": offer, "avg": 110 }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(payload, json!({ "advice": advice }));
        }
    }

    #[tokio::test]
    async fn negotiate_accepts_fractional_values() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/negotiate",
            json!({ "offer": 70.5, "avg": 78.0 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["advice"], "✅ This is a fair and reasonable price.");
    }

    #[tokio::test]
    async fn negotiate_rejects_non_positive_average() {
        let (status, _) = post_json(
            app(TranslationService::disabled()),
            "/negotiate",
            json!({ "offer": 10, "avg": 0 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn offers_beyond_decimal_range_are_still_classified() {
        let cases = [
            (1e30, "👍 Good deal for the vendor."),
            (-1e30, "❌ Offer is too low. Consider increasing the price."),
        ];

        for (offer, advice) in cases {
            let (status, payload) = post_json(
                app(TranslationService::disabled()),
                "/negotiate",
                json!({ "offer": offer, "avg": 110 }),
            )
            .await;

            assert_eq!(status, StatusCode::OK, "offer {offer}");
            assert_eq!(payload, json!({ "advice": advice }));
        }
    }

    #[tokio::test]
    async fn average_beyond_decimal_range_is_rejected() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/negotiate",
            json!({ "offer": 100, "avg": 1e30 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().is_some_and(|message| message.contains("avg")));
    }

    #[tokio::test]
    async fn numeric_strings_are_not_accepted_as_numbers() {
        let requests = [
            ("/negotiate", json!({ "offer": "100", "avg": 110 })),
            ("/negotiate", json!({ "offer": 100, "avg": "110" })),
            ("/price", json!({ "crop": "tomato", "quantity": "5" })),
        ];

        for (uri, body) in requests {
            let (status, payload) =
                post_json(app(TranslationService::disabled()), uri, body.clone()).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
            assert!(payload["error"].is_string());
        }
    }

    #[tokio::test]
    async fn translate_returns_translated_text() {
        let service = TranslationService::new(Arc::new(EchoTranslator));
        let (status, payload) = post_json(
            app(service),
            "/translate",
            json!({ "text": "fresh onions", "targetLang": "hi" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "translatedText": "hi:fresh onions" }));
    }

    #[tokio::test]
    async fn translate_with_empty_text_returns_empty_string() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/translate",
            json!({ "text": "", "targetLang": "hi" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "translatedText": "" }));
    }

    #[tokio::test]
    async fn translate_failure_degrades_to_fallback_text() {
        let (status, payload) = post_json(
            app(TranslationService::disabled()),
            "/translate",
            json!({ "text": "how much?", "targetLang": "ta" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["translatedText"], TRANSLATION_FAILED);
    }

    #[tokio::test]
    async fn crops_lists_catalog_sorted_by_id() {
        let response = app(TranslationService::disabled())
            .oneshot(
                Request::builder().uri("/crops").body(Body::empty()).expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        let payload: Value = serde_json::from_slice(&bytes).expect("json body");
        let crops: Vec<&str> = payload["crops"]
            .as_array()
            .expect("crops array")
            .iter()
            .filter_map(|crop| crop["crop"].as_str())
            .collect();
        assert_eq!(crops, vec!["onion", "tomato"]);
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let response = app(TranslationService::disabled())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/price")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
