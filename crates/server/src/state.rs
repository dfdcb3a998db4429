use nbooks_core::catalog::presentation::CatalogCard;
use nbooks_core::database::queries::Db;
use nbooks_core::database::types::BookRecord;
use nbooks_core::storage::ObjectStorage;
use std::sync::Arc;

/// Shared by all handlers. The database handle and storage client are created once in `main`
/// and live as long as the server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Db,
    pub storage: Arc<ObjectStorage>,
    pub cover_bucket: Arc<str>,
}

impl AppState {
    pub fn new(db: Db, storage: ObjectStorage, cover_bucket: &str) -> Self {
        log::info!("Serving covers from bucket `{cover_bucket}`");
        Self {
            db,
            storage: Arc::new(storage),
            cover_bucket: Arc::from(cover_bucket),
        }
    }

    pub fn card(&self, book: &BookRecord) -> CatalogCard {
        CatalogCard::from_record(book, |path| {
            self.storage.public_url(&self.cover_bucket, path)
        })
    }
}
