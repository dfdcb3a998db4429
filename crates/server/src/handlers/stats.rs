use crate::errors::AppResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use nbooks_core::stats::{CalendarEntry, ReadingStats, reading_calendar};
use tracing::instrument;

#[instrument(name = "http.stats", skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<ReadingStats>> {
    let catalog = state.db.fetch_catalog().await?;
    Ok(Json(ReadingStats::from_catalog(&catalog)))
}

#[instrument(name = "http.calendar", skip(state))]
pub async fn get_calendar(State(state): State<AppState>) -> AppResult<Json<Vec<CalendarEntry>>> {
    let catalog = state.db.fetch_catalog().await?;
    Ok(Json(reading_calendar(&catalog)))
}
