use crate::models::CheckProductResponse;
use crate::services::{parse_product_query, record_check, CheckError};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::Method,
    Json,
};
use service_core::error::AppError;

/// `POST /check_product`: report whether the named product can be manufactured.
pub async fn check_product(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CheckProductResponse>, AppError> {
    let body = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Failed to read product check body");
        CheckError::UnreadableBody(rejection)
    })?;
    tracing::debug!(body_len = body.len(), "Received product check request");

    let query = parse_product_query(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected product check request");
        e
    })?;

    let result = state.resolver.resolve(&query).await.map_err(|e| {
        tracing::error!(product = %query.product_name(), error = %e, "Product lookup failed");
        record_check("store_error");
        e
    })?;

    record_check(result.outcome());
    tracing::info!(
        product = %query.product_name(),
        outcome = result.outcome(),
        "Product check resolved"
    );

    Ok(Json(result.into()))
}

pub async fn method_not_allowed(method: Method) -> AppError {
    tracing::warn!(method = %method, "Method not allowed on /check_product");
    CheckError::MethodNotAllowed.into()
}
