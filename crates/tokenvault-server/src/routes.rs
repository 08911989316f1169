//! HTTP surface over the vault operations.
//!
//! The router is generic over the store and environment so tests can run
//! the exact production handlers against an in-memory store.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokenvault_core::{Environment, TtlStore, Vault, path};
use tower_http::trace::TraceLayer;

use crate::{error::ApiError, extract::BearerToken, middleware, ttl_secs};

/// Builds the API router around a vault.
pub fn router<S, E>(vault: Vault<S, E>) -> Router
where
    S: TtlStore,
    E: Environment,
{
    Router::new()
        .route("/token", post(issue_token::<S, E>).delete(revoke_token::<S, E>))
        .route("/token/valid", get(validate_token::<S, E>))
        .route(
            "/secret/*key",
            get(fetch_secret::<S, E>)
                .put(store_secret::<S, E>)
                .delete(delete_secret::<S, E>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::request_id))
        .with_state(vault)
}

#[derive(Debug, Deserialize)]
struct IssueQuery {
    /// Requested lifetime in seconds; omitted means the server default.
    ttl: Option<u64>,
}

#[derive(Debug, Serialize)]
struct IssueResponse {
    token: String,
    ttl: u64,
}

async fn issue_token<S: TtlStore, E: Environment>(
    State(vault): State<Vault<S, E>>,
    Query(query): Query<IssueQuery>,
) -> Result<(StatusCode, Json<IssueResponse>), ApiError> {
    let issued = vault.issue_token(query.ttl.map(Duration::from_secs)).await?;
    Ok((
        StatusCode::CREATED,
        Json(IssueResponse { token: issued.token, ttl: ttl_secs(issued.ttl) }),
    ))
}

#[derive(Debug, Serialize)]
struct ValidResponse {
    valid: bool,
    ttl: u64,
}

async fn validate_token<S: TtlStore, E: Environment>(
    State(vault): State<Vault<S, E>>,
    BearerToken(token): BearerToken,
) -> Result<Json<ValidResponse>, ApiError> {
    let session = vault.authenticate(&token).await?;
    Ok(Json(ValidResponse { valid: true, ttl: ttl_secs(session.remaining) }))
}

async fn revoke_token<S: TtlStore, E: Environment>(
    State(vault): State<Vault<S, E>>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, ApiError> {
    let deleted = vault.revoke_token(&token).await?;
    tracing::debug!(deleted, "token revoked over HTTP");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct StoreRequest {
    value: String,
}

#[derive(Debug, Serialize)]
struct StoreResponse {
    key: String,
    ttl: u64,
}

async fn store_secret<S: TtlStore, E: Environment>(
    State(vault): State<Vault<S, E>>,
    BearerToken(token): BearerToken,
    Path(key): Path<String>,
    Json(body): Json<StoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    let key = path::normalize_key_path(&key);
    let stored = vault.store_secret(&token, key, &body.value).await?;
    Ok((
        StatusCode::CREATED,
        Json(StoreResponse { key: stored.key_path, ttl: ttl_secs(stored.ttl) }),
    ))
}

#[derive(Debug, Serialize)]
struct FetchResponse {
    value: String,
    ttl: u64,
}

async fn fetch_secret<S: TtlStore, E: Environment>(
    State(vault): State<Vault<S, E>>,
    BearerToken(token): BearerToken,
    Path(key): Path<String>,
) -> Result<Json<FetchResponse>, ApiError> {
    let key = path::normalize_key_path(&key);
    let fetched = vault.fetch_secret(&token, key).await?;
    Ok(Json(FetchResponse { value: fetched.value, ttl: ttl_secs(fetched.ttl) }))
}

async fn delete_secret<S: TtlStore, E: Environment>(
    State(vault): State<Vault<S, E>>,
    BearerToken(token): BearerToken,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let key = path::normalize_key_path(&key);
    vault.delete_secret(&token, key).await?;
    Ok(StatusCode::NO_CONTENT)
}
