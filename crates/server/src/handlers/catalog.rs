use crate::errors::{AppError, AppResult};
use crate::extract::AppPath;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use nbooks_core::catalog::filter::{
    ALL_SENTINEL, CatalogFilter, CategorySelector, StatusSelector, available_categories,
    filter_catalog,
};
use nbooks_core::catalog::presentation::CatalogCard;
use nbooks_core::catalog::status::ReadingStatus;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Catalog filters as query parameters: `q`, `category`, `author`, `status`
#[derive(Deserialize, Debug, Default)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CatalogResponse {
    pub books: Vec<CatalogCard>,
    /// Options of the category picker, sentinel first
    pub categories: Vec<String>,
    /// Options of the status picker, sentinel first
    pub statuses: Vec<&'static str>,
}

#[instrument(name = "http.catalog", skip(state))]
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<CatalogResponse>> {
    let status = StatusSelector::from_param(query.status.as_deref()).ok_or_else(|| {
        AppError::bad_request(format!(
            "unknown reading status `{}`",
            query.status.as_deref().unwrap_or_default()
        ))
    })?;
    let filter = CatalogFilter::default()
        .with_text(query.q.as_deref().unwrap_or_default())
        .with_category(CategorySelector::from_param(query.category.as_deref()))
        .with_author(query.author.as_deref().unwrap_or_default())
        .with_status(status);

    let catalog = state.db.fetch_catalog().await?;
    let books: Vec<CatalogCard> = filter_catalog(&catalog, &filter)
        .into_iter()
        .map(|book| state.card(book))
        .collect();
    tracing::info!(total = catalog.len(), shown = books.len(), "catalog filtered");

    let categories = core::iter::once(ALL_SENTINEL.to_owned())
        .chain(available_categories(&catalog))
        .collect();
    let statuses = core::iter::once(ALL_SENTINEL)
        .chain(ReadingStatus::ALL.iter().map(|status| status.label()))
        .collect();

    Ok(Json(CatalogResponse {
        books,
        categories,
        statuses,
    }))
}

#[instrument(name = "http.book", skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<CatalogCard>> {
    let book = state
        .db
        .fetch_book(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {id} does not exist")))?;
    Ok(Json(state.card(&book)))
}
