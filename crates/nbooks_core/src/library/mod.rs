//! Library management
//!
//! The write paths of the application: registering and editing books, keeping their category
//! links in sync with the form, changing reading status and creating authors and categories.
pub mod errors;
pub mod form;

use crate::catalog::status::ReadingStatus;
use crate::database::queries::Db;
use crate::database::types::{AuthorRecord, BookRow, CategoryRecord};
use crate::library::errors::LibraryError;
use crate::library::form::{BookSubmission, Selection, ValidatedBook};
use serde::Serialize;

/// Outcome of syncing a book's categories.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Category names the book is now linked to
    pub linked: Vec<String>,
    /// Names that could not be resolved to a category and were left out
    pub skipped: Vec<String>,
}

/// A book that was registered or edited
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedBook {
    pub id: i64,
    pub categories: ReconcileReport,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusChange {
    Updated,
    Unchanged,
}

/// Replaces all category links of a book with `targets`.
///
/// Existing links are deleted first, then names entered as new are created, then one link is
/// inserted per target. A target naming a category that cannot be found is skipped and reported
/// rather than failing the whole operation. The steps are not wrapped in a transaction: an error
/// half way leaves the book with only the links inserted so far.
/// # Errors
/// Fails on the first database error
#[allow(clippy::missing_inline_in_public_items, reason = "Called once per save")]
pub async fn reconcile_categories(
    db: &Db,
    book_id: i64,
    targets: &[Selection],
) -> Result<ReconcileReport, LibraryError> {
    let removed = db.delete_book_categories(book_id).await?;
    log::info!("Removed {removed} category link(s) of book {book_id}");

    for target in targets {
        if let Selection::New(name) = target {
            let category = db.insert_category(name).await?;
            log::info!("Created category `{}` ({})", category.name, category.id);
        }
    }

    // Read the lookup after creating, so names created by this or any other writer resolve
    let lookup = db.category_ids_by_name().await?;
    let mut report = ReconcileReport::default();
    for target in targets {
        let name = target.name();
        if let Some(&category_id) = lookup.get(name) {
            db.insert_book_category(book_id, category_id).await?;
            report.linked.push(name.to_owned());
        } else {
            log::warn!("Category `{name}` not found, book {book_id} will not be linked to it");
            report.skipped.push(name.to_owned());
        }
    }

    Ok(report)
}

/// Creates one book from the registration form, creating its author and new categories on the
/// way.
/// # Errors
/// Fails without writing anything if the form is incomplete or names an author that does not
/// exist. Database errors abort the remaining steps.
#[allow(clippy::missing_inline_in_public_items, reason = "Called once per save")]
pub async fn register_book(
    db: &Db,
    submission: &BookSubmission,
    cover_path: Option<String>,
) -> Result<SavedBook, LibraryError> {
    let book = submission.validate()?;
    let author_id = resolve_author(db, &book.author).await?;

    let row = book_row(&book, author_id, cover_path);
    let id = db.insert_book(&row).await?;
    log::info!("Registered book `{}` with id {id}", book.name);

    let categories = reconcile_categories(db, id, &book.categories).await?;
    Ok(SavedBook { id, categories })
}

/// Replaces the fields and categories of an existing book with the edit form. The cover is kept.
/// # Errors
/// Fails without writing anything if the form is incomplete, the book does not exist or the
/// author does not exist. Database errors abort the remaining steps.
#[allow(clippy::missing_inline_in_public_items, reason = "Called once per save")]
pub async fn edit_book(
    db: &Db,
    id: i64,
    submission: &BookSubmission,
) -> Result<SavedBook, LibraryError> {
    let book = submission.validate()?;
    let current = db
        .fetch_book(id)
        .await?
        .ok_or(LibraryError::BookNotFound(id))?;
    let author_id = resolve_author(db, &book.author).await?;

    let row = book_row(&book, author_id, current.cover_path);
    if db.update_book(id, &row).await? == 0 {
        return Err(LibraryError::BookNotFound(id));
    }
    log::info!("Updated book `{}` ({id})", book.name);

    let categories = reconcile_categories(db, id, &book.categories).await?;
    Ok(SavedBook { id, categories })
}

/// Sets the reading status of a book. A book stored with a legacy spelling of the same status
/// is rewritten to the canonical label.
/// # Errors
/// Fails if the book does not exist or on database errors
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub async fn change_status(
    db: &Db,
    id: i64,
    status: ReadingStatus,
) -> Result<StatusChange, LibraryError> {
    let current = db
        .fetch_book(id)
        .await?
        .ok_or(LibraryError::BookNotFound(id))?;
    if current.status == status.label() {
        return Ok(StatusChange::Unchanged);
    }

    if db.update_status(id, status.label()).await? == 0 {
        return Err(LibraryError::BookNotFound(id));
    }
    log::info!("Status of book {id} changed from `{}` to `{status}`", current.status);
    Ok(StatusChange::Updated)
}

/// Records the storage key of a book's cover.
/// # Errors
/// Fails if the book does not exist or on database errors
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub async fn set_cover(db: &Db, id: i64, cover_path: &str) -> Result<(), LibraryError> {
    if db.update_cover(id, cover_path).await? == 0 {
        return Err(LibraryError::BookNotFound(id));
    }
    Ok(())
}

/// # Errors
/// Fails on blank names or database errors
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub async fn add_author(db: &Db, name: &str) -> Result<AuthorRecord, LibraryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LibraryError::EmptyName);
    }
    Ok(db.insert_author(name).await?)
}

/// # Errors
/// Fails on blank names or database errors
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub async fn add_category(db: &Db, name: &str) -> Result<CategoryRecord, LibraryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LibraryError::EmptyName);
    }
    Ok(db.insert_category(name).await?)
}

async fn resolve_author(db: &Db, author: &Selection) -> Result<i64, LibraryError> {
    match author {
        Selection::Existing(name) => db
            .find_author_id(name)
            .await?
            .ok_or_else(|| LibraryError::UnknownAuthor(name.clone())),
        Selection::New(name) => {
            let created = db.insert_author(name).await?;
            log::info!("Created author `{}` ({})", created.name, created.id);
            Ok(created.id)
        }
    }
}

fn book_row(book: &ValidatedBook, author_id: i64, cover_path: Option<String>) -> BookRow {
    BookRow {
        name: book.name.clone(),
        author_id,
        status: book.status.label().to_owned(),
        on_kindle: book.on_kindle,
        cover_path,
        description: book.description.clone(),
        started_on: book.started_on,
        finished_on: book.finished_on,
    }
}
