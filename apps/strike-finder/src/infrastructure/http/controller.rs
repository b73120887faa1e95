//! HTTP Controller (Driver Adapter)
//!
//! Axum-based JSON API that delegates to the options desk service. Every
//! request runs in a span carrying a fresh request id, echoed back in the
//! `x-request-id` header.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{MatchedPath, Query, Request, State, rejection::QueryRejection},
    http::HeaderValue,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::dto::{CoveredCallReport, DeltaStrikeReport, PriceReport};
use crate::application::ports::{ContractPremium, OptionChainPort, PriceHistoryPort};
use crate::application::services::{CoveredCallRequest, OptionsDeskService, local_today};
use crate::error::AppError;
use crate::observability::record_api_request;

use super::request::{
    CoveredCallQuery, DeltaStrikeQuery, OptionPremiumQuery, PriceQuery, PutPremiumQuery,
    StrikePremiumQuery, parse_right,
};
use super::response::HealthResponse;

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
pub struct AppState<C, H>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    /// The options desk.
    pub desk: Arc<OptionsDeskService<C, H>>,
    /// Application version.
    pub version: String,
}

impl<C, H> Clone for AppState<C, H>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    fn clone(&self) -> Self {
        Self {
            desk: Arc::clone(&self.desk),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<C, H>(state: AppState<C, H>) -> Router
where
    C: OptionChainPort + 'static,
    H: PriceHistoryPort + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/price", get(price))
        .route("/delta-strike", get(delta_strike))
        .route("/strike-premium", get(strike_premium))
        .route("/put-premium", get(put_premium))
        .route("/option-premium", get(option_premium))
        .route("/covered-call", get(covered_call))
        .route_layer(middleware::from_fn(track_request))
        .with_state(state)
}

/// Wrap each request in a span with a request id and count it by route.
async fn track_request(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let route = request.extensions().get::<MatchedPath>().map_or_else(
        || request.uri().path().to_string(),
        |path| path.as_str().to_string(),
    );

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        route = %route,
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();

    span.in_scope(|| {
        tracing::info!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
    });
    record_api_request(&route, status);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::input(rejection.body_text()))
}

/// Health check endpoint.
async fn health_check<C, H>(State(state): State<AppState<C, H>>) -> impl IntoResponse
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
    })
}

/// Close on a date, or the latest price.
async fn price<C, H>(
    State(state): State<AppState<C, H>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PriceReport>, AppError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let params = query_params(query)?;
    let report = state.desk.price(&params.ticker, params.date).await?;
    Ok(Json(report))
}

/// Strike for a target delta on one expiry.
///
/// `method` in the response is `exact`, `interpolated` or `clamped`. A
/// target outside the listed deltas is `clamped` to the nearest boundary
/// quote rather than rejected.
async fn delta_strike<C, H>(
    State(state): State<AppState<C, H>>,
    query: Result<Query<DeltaStrikeQuery>, QueryRejection>,
) -> Result<Json<DeltaStrikeReport>, AppError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let params = query_params(query)?;
    let right = parse_right(params.right.as_deref())?;
    let report = state
        .desk
        .delta_strike(&params.ticker, params.expiry, right, params.target_delta)
        .await?;
    Ok(Json(report))
}

/// Strike for a target delta, defaulting to the nearest expiry.
///
/// Same response as `/delta-strike`, including `clamped` results.
async fn strike_premium<C, H>(
    State(state): State<AppState<C, H>>,
    query: Result<Query<StrikePremiumQuery>, QueryRejection>,
) -> Result<Json<DeltaStrikeReport>, AppError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let params = query_params(query)?;
    let right = parse_right(params.right.as_deref())?;
    let asof = params.asof.unwrap_or_else(local_today);
    let report = state
        .desk
        .strike_premium(
            &params.ticker,
            right,
            params.target_delta,
            params.expiry,
            asof,
        )
        .await?;
    Ok(Json(report))
}

/// Quote for one listed put.
async fn put_premium<C, H>(
    State(state): State<AppState<C, H>>,
    query: Result<Query<PutPremiumQuery>, QueryRejection>,
) -> Result<Json<ContractPremium>, AppError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let params = query_params(query)?;
    let premium = state
        .desk
        .put_premium(&params.ticker, params.expiry, params.strike)
        .await?;
    Ok(Json(premium))
}

/// Quote for one listed contract of either right.
async fn option_premium<C, H>(
    State(state): State<AppState<C, H>>,
    query: Result<Query<OptionPremiumQuery>, QueryRejection>,
) -> Result<Json<ContractPremium>, AppError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let params = query_params(query)?;
    let right = parse_right(params.right.as_deref())?;
    let premium = state
        .desk
        .option_premium(&params.ticker, params.expiry, params.strike, right)
        .await?;
    Ok(Json(premium))
}

/// Covered call analysis.
async fn covered_call<C, H>(
    State(state): State<AppState<C, H>>,
    query: Result<Query<CoveredCallQuery>, QueryRejection>,
) -> Result<Json<CoveredCallReport>, AppError>
where
    C: OptionChainPort,
    H: PriceHistoryPort,
{
    let params = query_params(query)?;
    let report = state
        .desk
        .covered_call(CoveredCallRequest {
            ticker: params.ticker,
            expiry: params.expiry,
            asof: params.asof.unwrap_or_else(local_today),
            spot: params.spot,
            strike: params.strike,
            target_delta: params.target_delta,
            shares: params.shares,
        })
        .await?;
    Ok(Json(report))
}
