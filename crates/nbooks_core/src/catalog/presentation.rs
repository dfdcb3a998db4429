use crate::catalog::badge::{Badge, category_badges, status_badge};
use crate::database::types::BookRecord;
use chrono::NaiveDate;
use serde::Serialize;

pub const UNKNOWN_TITLE: &str = "Título Desconocido";
pub const UNKNOWN_AUTHOR: &str = "Desconocido";
pub const NO_DESCRIPTION: &str = "No hay descripción disponible.";
pub const COVER_PLACEHOLDER_URL: &str = "https://placehold.co/100x150?text=Sin+portada";

/// Everything the catalog and the details view show for one book.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogCard {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub categories: Vec<Badge>,
    pub status: Badge,
    pub cover_url: String,
    pub on_kindle: bool,
    pub description: String,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

impl CatalogCard {
    /// Builds the card of a book. `cover_url` turns a stored cover path into a public URL, books
    /// without a cover get the placeholder image.
    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "Large function")]
    pub fn from_record<F>(book: &BookRecord, cover_url: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            id: book.id,
            title: non_blank(book.name.as_deref()).unwrap_or(UNKNOWN_TITLE).to_owned(),
            author: non_blank(book.author.as_deref())
                .unwrap_or(UNKNOWN_AUTHOR)
                .to_owned(),
            categories: category_badges(&book.category_names()),
            status: status_badge(&book.status),
            cover_url: non_blank(book.cover_path.as_deref())
                .map_or_else(|| COVER_PLACEHOLDER_URL.to_owned(), cover_url),
            on_kindle: book.on_kindle,
            description: book
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            started_on: book.started_on,
            finished_on: book.finished_on,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|inner| !inner.trim().is_empty())
}
