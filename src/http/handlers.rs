//! Endpoint handlers.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::dataset::{FinalView, MAX_YEAR, MIN_YEAR};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::lookup::{self, LookupError, PlayerFinal};
use crate::security::auth::Principal;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn health() -> (StatusCode, Json<HealthStatus>) {
    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "healthy",
            message: "Wimbledon API is running",
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

/// Parse and range-check the `year` parameter.
pub fn validate_year(raw: Option<&str>) -> Result<i32, ApiError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        ApiError::validation(
            "Missing required parameter 'year'",
            "Please provide a year parameter (e.g., ?year=2021)",
        )
    })?;

    match raw.parse::<i32>() {
        Ok(year) if (MIN_YEAR..=MAX_YEAR).contains(&year) => Ok(year),
        _ => Err(ApiError::validation(
            "Invalid year parameter",
            format!("Year must be a valid integer between {MIN_YEAR} and {MAX_YEAR}"),
        )),
    }
}

/// `GET /wimbledon?year=YYYY`
pub async fn get_final(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<FinalView>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::validation("Invalid year parameter", rejection.body_text())
    })?;
    let year = validate_year(query.year.as_deref())?;

    let record = state
        .store
        .load(year)
        .await?
        .ok_or(LookupError::YearNotFound(year))?;

    tracing::info!(year, principal = %caller(principal.as_deref()), "Retrieved final");
    Ok(Json(record.to_view()))
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    #[serde(default)]
    pub details: bool,
}

#[derive(Serialize)]
pub struct PlayerSummary {
    pub player_search: String,
    pub total_finals: usize,
    pub wins: usize,
    pub losses: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finals: Option<Vec<PlayerFinal>>,
}

/// `GET /wimbledon/player/{name}`
pub async fn get_player_finals(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(name): Path<String>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Json<PlayerSummary>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::validation("Invalid query parameters", rejection.body_text())
    })?;
    if name.trim().is_empty() {
        return Err(ApiError::validation(
            "Missing player name",
            "Please provide a player name (e.g., /wimbledon/player/Roger Federer)",
        ));
    }

    let records = state.store.load_all().await?;
    let history = lookup::by_player(&records, &name)?;

    tracing::info!(
        player = %name,
        finals = history.total(),
        principal = %caller(principal.as_deref()),
        "Retrieved player finals"
    );
    Ok(Json(PlayerSummary {
        player_search: history.query.clone(),
        total_finals: history.total(),
        wins: history.wins(),
        losses: history.losses(),
        finals: query.details.then_some(history.finals),
    }))
}

/// Log label for whoever passed the auth gate; `anonymous` when it is off.
fn caller(principal: Option<&Principal>) -> String {
    match principal {
        Some(Principal::ApiKey) => "api_key".to_string(),
        Some(Principal::Basic { username }) => format!("basic:{username}"),
        None => "anonymous".to_string(),
    }
}
