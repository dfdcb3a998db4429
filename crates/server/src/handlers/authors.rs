use crate::errors::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nbooks_core::database::types::{AuthorRecord, CategoryRecord};
use nbooks_core::library;
use serde::Deserialize;
use tracing::instrument;

#[derive(Deserialize, Debug)]
pub struct NameRequest {
    pub name: String,
}

#[instrument(name = "http.authors", skip(state))]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorRecord>>> {
    Ok(Json(state.db.fetch_authors().await?))
}

#[instrument(name = "http.add_author", skip(state))]
pub async fn create_author(
    State(state): State<AppState>,
    AppJson(request): AppJson<NameRequest>,
) -> AppResult<(StatusCode, Json<AuthorRecord>)> {
    let author = library::add_author(&state.db, &request.name).await?;
    tracing::info!(id = author.id, "author added");
    Ok((StatusCode::CREATED, Json(author)))
}

#[instrument(name = "http.categories", skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryRecord>>> {
    Ok(Json(state.db.fetch_categories().await?))
}

#[instrument(name = "http.add_category", skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(request): AppJson<NameRequest>,
) -> AppResult<(StatusCode, Json<CategoryRecord>)> {
    let category = library::add_category(&state.db, &request.name).await?;
    tracing::info!(id = category.id, "category added");
    Ok((StatusCode::CREATED, Json(category)))
}
