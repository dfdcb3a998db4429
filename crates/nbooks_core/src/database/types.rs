use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used on the wire and in the `fecha_*` columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the catalog projection (`vista_libros`): a book with its author name and its
/// categories flattened into a comma-separated string.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: i64,
    pub name: Option<String>,
    pub author: Option<String>,
    pub categories: Option<String>,
    pub status: String,
    pub cover_path: Option<String>,
    pub on_kindle: bool,
    pub description: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

impl BookRecord {
    /// Minimal constructor, the optional fields can be filled in afterwards with the `with_*`
    /// methods.
    #[must_use]
    #[inline]
    pub fn new(id: i64, name: &str, author: &str, categories: &str, status: &str) -> Self {
        Self {
            id,
            name: Some(name.to_owned()),
            author: Some(author.to_owned()),
            categories: Some(categories.to_owned()),
            status: status.to_owned(),
            cover_path: None,
            on_kindle: false,
            description: None,
            started_on: None,
            finished_on: None,
        }
    }

    #[must_use]
    #[inline]
    pub fn with_cover_path(mut self, cover_path: &str) -> Self {
        self.cover_path = Some(cover_path.to_owned());
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_kindle(mut self, on_kindle: bool) -> Self {
        self.on_kindle = on_kindle;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_dates(
        mut self,
        started_on: Option<NaiveDate>,
        finished_on: Option<NaiveDate>,
    ) -> Self {
        self.started_on = started_on;
        self.finished_on = finished_on;
        self
    }

    /// The individual category names of this book, trimmed, in stored order
    #[must_use]
    #[inline]
    pub fn category_names(&self) -> Vec<&str> {
        split_categories(self.categories.as_deref().unwrap_or_default())
    }
}

/// Splits a comma-separated category field into trimmed, non-empty names.
#[must_use]
#[inline]
pub fn split_categories(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parses an ISO `YYYY-MM-DD` date. Anything unparseable is treated as no date at all.
#[must_use]
#[inline]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Raw `vista_libros` row, dates still as stored text
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CatalogRow {
    pub id: i64,
    pub nombre: Option<String>,
    pub autor: Option<String>,
    pub tipos: Option<String>,
    pub estado_lectura: String,
    pub portada_path: Option<String>,
    pub en_kindle: bool,
    pub descripcion: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_leido: Option<String>,
}

impl From<CatalogRow> for BookRecord {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            name: row.nombre,
            author: row.autor,
            categories: row.tipos,
            status: row.estado_lectura,
            cover_path: row.portada_path,
            on_kindle: row.en_kindle,
            description: row.descripcion,
            started_on: row.fecha_inicio.as_deref().and_then(parse_date),
            finished_on: row.fecha_leido.as_deref().and_then(parse_date),
        }
    }
}

#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthorRecord {
    pub id: i64,
    #[sqlx(rename = "nombre")]
    pub name: String,
}

#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: i64,
    #[sqlx(rename = "nombre")]
    pub name: String,
}

/// The scalar columns of a `libros` row as written by registration and editing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub name: String,
    pub author_id: i64,
    pub status: String,
    pub on_kindle: bool,
    pub cover_path: Option<String>,
    pub description: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}
