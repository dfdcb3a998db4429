use crate::errors::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Local;
use nbooks_core::catalog::presentation::CatalogCard;
use nbooks_core::catalog::status::ReadingStatus;
use nbooks_core::library::form::BookSubmission;
use nbooks_core::library::{self, SavedBook, StatusChange};
use nbooks_core::storage::{cover_key, image_extension};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[instrument(
    name = "http.register_book",
    skip_all,
    fields(name = %submission.name)
)]
pub async fn register_book(
    State(state): State<AppState>,
    AppJson(submission): AppJson<BookSubmission>,
) -> AppResult<(StatusCode, Json<SavedBook>)> {
    let saved = library::register_book(&state.db, &submission, None).await?;
    if !saved.categories.skipped.is_empty() {
        tracing::warn!(skipped = ?saved.categories.skipped, "some categories were not linked");
    }
    tracing::info!(id = saved.id, "book registered");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(
    name = "http.edit_book",
    skip_all,
    fields(id = id, name = %submission.name)
)]
pub async fn edit_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(submission): AppJson<BookSubmission>,
) -> AppResult<Json<SavedBook>> {
    let saved = library::edit_book(&state.db, id, &submission).await?;
    if !saved.categories.skipped.is_empty() {
        tracing::warn!(skipped = ?saved.categories.skipped, "some categories were not linked");
    }
    tracing::info!("book updated");
    Ok(Json(saved))
}

#[derive(Deserialize, Debug)]
pub struct StatusRequest {
    pub status: ReadingStatus,
}

#[derive(Serialize, Debug)]
pub struct StatusResponse {
    pub change: StatusChange,
}

#[instrument(name = "http.change_status", skip(state))]
pub async fn change_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<StatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let change = library::change_status(&state.db, id, request.status).await?;
    Ok(Json(StatusResponse { change }))
}

/// Stores the request body as the book's new cover. The previous cover object is left in the
/// bucket.
#[instrument(name = "http.upload_cover", skip(state, body), fields(bytes = body.len()))]
pub async fn upload_cover(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    body: Bytes,
) -> AppResult<Json<CatalogCard>> {
    if body.is_empty() {
        return Err(AppError::bad_request("La portada está vacía."));
    }
    let book = state
        .db
        .fetch_book(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {id} does not exist")))?;

    let key = cover_key(
        book.name.as_deref().unwrap_or_default(),
        image_extension(&body),
        Local::now().naive_local(),
    );
    state
        .storage
        .upload(&state.cover_bucket, &key, body.to_vec())
        .await?;
    library::set_cover(&state.db, id, &key).await?;
    tracing::info!(key = %key, "cover uploaded");

    let book = state
        .db
        .fetch_book(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {id} does not exist")))?;
    Ok(Json(state.card(&book)))
}
