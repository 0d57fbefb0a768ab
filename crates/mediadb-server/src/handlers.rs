use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use mediadb_api::ApiError;
use mediadb_catalog::{CacheStatsSnapshot, Category, SubcategorySnapshot};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "service": "MediaDB Category Service",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.service.backend_name(),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

/// `?localeId=` filter shared by the domain endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleQuery {
    #[serde(default)]
    pub locale_id: Option<String>,
}

impl LocaleQuery {
    /// A blank `localeId` means "every locale".
    pub fn locale(&self) -> Option<&str> {
        non_blank(self.locale_id.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryCheckQuery {
    #[serde(default)]
    pub subcategory_id: Option<String>,
    #[serde(default)]
    pub locale_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryExistsResponse {
    pub subcategory_id: String,
    pub exists: bool,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_domain(domain: &str) -> Result<&str, ApiError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("domain must not be blank"));
    }
    Ok(trimmed)
}

pub async fn list_categories(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let domain = require_domain(&domain)?;
    let tree = state.service.category_tree(domain, query.locale()).await?;
    Ok(Json(tree))
}

pub async fn subcategory_exists(
    State(state): State<AppState>,
    Path((domain, subcategory_id)): Path<(String, String)>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<SubcategoryExistsResponse>, ApiError> {
    check_subcategory(&state, &domain, &subcategory_id, query.locale()).await
}

/// Query-string variant; a missing `subcategoryId` is checked as blank.
pub async fn subcategory_check(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(query): Query<SubcategoryCheckQuery>,
) -> Result<Json<SubcategoryExistsResponse>, ApiError> {
    let candidate = query.subcategory_id.as_deref().unwrap_or_default();
    let locale = non_blank(query.locale_id.as_deref());
    check_subcategory(&state, &domain, candidate, locale).await
}

async fn check_subcategory(
    state: &AppState,
    domain: &str,
    candidate: &str,
    locale: Option<&str>,
) -> Result<Json<SubcategoryExistsResponse>, ApiError> {
    let domain = require_domain(domain)?;
    let exists = state
        .service
        .subcategory_exists(domain, locale, candidate)
        .await?;
    Ok(Json(SubcategoryExistsResponse {
        subcategory_id: candidate.to_string(),
        exists,
    }))
}

pub async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.service.cache().invalidate();
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub domain: String,
    pub locale_id: Option<String>,
    pub subcategory_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub built_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expiry: OffsetDateTime,
}

impl From<&SubcategorySnapshot> for SnapshotSummary {
    fn from(snapshot: &SubcategorySnapshot) -> Self {
        Self {
            domain: snapshot.domain.clone(),
            locale_id: snapshot.locale_id.clone(),
            subcategory_count: snapshot.ids.len(),
            built_at: snapshot.built_at,
            expiry: snapshot.expiry,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub ttl_secs: i64,
    pub counters: CacheStatsSnapshot,
    pub snapshot: Option<SnapshotSummary>,
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache = state.service.cache();
    Json(CacheStatsResponse {
        ttl_secs: cache.ttl().whole_seconds(),
        counters: cache.stats(),
        snapshot: cache.snapshot().as_deref().map(SnapshotSummary::from),
    })
}
