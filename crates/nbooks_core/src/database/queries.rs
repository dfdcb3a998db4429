use crate::database::types::{AuthorRecord, BookRecord, BookRow, CatalogRow, CategoryRecord};
use core::str::FromStr as _;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::HashMap;
use std::path::Path;

const CATALOG_COLUMNS: &str = "
    id,
    nombre,
    autor,
    tipos,
    estado_lectura,
    portada_path,
    en_kindle,
    descripcion,
    fecha_inicio,
    fecha_leido
";

/// Handle to the library database. Created once at startup and shared by reference with every
/// component that reads or writes books, authors or categories.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at start of program"
    )]
    pub async fn init(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .foreign_keys(true)
            .create_if_missing(true)
            .filename(path);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!().run(&pool).await?;
        log::info!("Opened library database at {}", path.display());

        Ok(Self { pool })
    }

    /// Private in-memory database. Limited to a single connection that is never recycled, since
    /// every SQLite connection to `:memory:` opens its own empty database.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once per database"
    )]
    pub async fn init_in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }

    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at end of program"
    )]
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// The whole catalog projection, in insertion order
    #[allow(clippy::missing_inline_in_public_items, reason = "Large function")]
    pub async fn fetch_catalog(&self) -> Result<Vec<BookRecord>, sqlx::Error> {
        let rows: Vec<CatalogRow> = sqlx::query_as(&format!(
            "SELECT {CATALOG_COLUMNS} FROM vista_libros ORDER BY id ASC;"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookRecord::from).collect())
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_book(&self, id: i64) -> Result<Option<BookRecord>, sqlx::Error> {
        let row: Option<CatalogRow> = sqlx::query_as(&format!(
            "SELECT {CATALOG_COLUMNS} FROM vista_libros WHERE id = ?;"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BookRecord::from))
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_authors(&self) -> Result<Vec<AuthorRecord>, sqlx::Error> {
        sqlx::query_as("SELECT id, nombre FROM autores ORDER BY nombre ASC;")
            .fetch_all(&self.pool)
            .await
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        sqlx::query_as("SELECT id, nombre FROM tipos ORDER BY nombre ASC;")
            .fetch_all(&self.pool)
            .await
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn find_author_id(&self, name: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM autores WHERE nombre = ?;")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    /// Snapshot of the category lookup table, name to id
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn category_ids_by_name(&self) -> Result<HashMap<String, i64>, sqlx::Error> {
        let categories = self.fetch_categories().await?;
        Ok(categories
            .into_iter()
            .map(|category| (category.name, category.id))
            .collect())
    }

    /// Creates an author. If one with the same name exists already, that row is returned.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn insert_author(&self, name: &str) -> Result<AuthorRecord, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO autores(nombre)
            VALUES (?)
            ON CONFLICT(nombre) DO UPDATE SET
                nombre = excluded.nombre
            RETURNING id, nombre;
        ",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Creates a category. If one with the same name exists already, that row is returned.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn insert_category(&self, name: &str) -> Result<CategoryRecord, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO tipos(nombre)
            VALUES (?)
            ON CONFLICT(nombre) DO UPDATE SET
                nombre = excluded.nombre
            RETURNING id, nombre;
        ",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn insert_book(&self, book: &BookRow) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r"
            INSERT INTO libros (
                nombre,
                autor_id,
                portada_path,
                estado_lectura,
                en_kindle,
                descripcion,
                fecha_inicio,
                fecha_leido
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id;
        ",
        )
        .bind(&book.name)
        .bind(book.author_id)
        .bind(&book.cover_path)
        .bind(&book.status)
        .bind(book.on_kindle)
        .bind(&book.description)
        .bind(book.started_on)
        .bind(book.finished_on)
        .fetch_one(&self.pool)
        .await
    }

    /// Replaces the scalar fields of a book. The cover path is left alone, it only changes
    /// through [`Db::update_cover`]. Returns the number of affected rows.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn update_book(&self, id: i64, book: &BookRow) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE libros SET
                nombre = ?,
                autor_id = ?,
                estado_lectura = ?,
                en_kindle = ?,
                descripcion = ?,
                fecha_inicio = ?,
                fecha_leido = ?
            WHERE id = ?;
        ",
        )
        .bind(&book.name)
        .bind(book.author_id)
        .bind(&book.status)
        .bind(book.on_kindle)
        .bind(&book.description)
        .bind(book.started_on)
        .bind(book.finished_on)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn update_status(&self, id: i64, status: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE libros SET estado_lectura = ? WHERE id = ?;")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn update_cover(&self, id: i64, cover_path: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE libros SET portada_path = ? WHERE id = ?;")
            .bind(cover_path)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Removes every category link of a book. Deleting nothing is not an error.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn delete_book_categories(&self, book_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM libro_tipos WHERE libro_id = ?;")
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Links a book to a category, a link that exists already is left as is
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn insert_book_category(
        &self,
        book_id: i64,
        category_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            INSERT OR IGNORE INTO libro_tipos(libro_id, tipo_id)
            VALUES (?1, ?2);
        ",
        )
        .bind(book_id)
        .bind(category_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_book_category_names(
        &self,
        book_id: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT t.nombre
            FROM tipos AS t
                JOIN libro_tipos AS lt ON lt.tipo_id = t.id
            WHERE lt.libro_id = ?
            ORDER BY t.nombre ASC;
        ",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn count_books(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM libros;")
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::types::BookRow;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn book_row(name: &str, author_id: i64) -> BookRow {
        BookRow {
            name: name.to_owned(),
            author_id,
            status: String::from("Por leer"),
            on_kindle: false,
            cover_path: None,
            description: None,
            started_on: None,
            finished_on: None,
        }
    }

    #[tokio::test]
    async fn test_catalog_view_joins_author_and_categories() {
        let db = Db::init_in_memory().await.unwrap();
        let author = db.insert_author("Herbert").await.unwrap();
        let scifi = db.insert_category("Sci-Fi").await.unwrap();
        let classic = db.insert_category("Classic").await.unwrap();

        let mut row = book_row("Dune", author.id);
        row.finished_on = NaiveDate::from_ymd_opt(2024, 1, 15);
        let id = db.insert_book(&row).await.unwrap();
        db.insert_book_category(id, scifi.id).await.unwrap();
        db.insert_book_category(id, classic.id).await.unwrap();

        let catalog = db.fetch_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        let dune = &catalog[0];
        assert_eq!(dune.name.as_deref(), Some("Dune"));
        assert_eq!(dune.author.as_deref(), Some("Herbert"));
        assert_eq!(dune.categories.as_deref(), Some("Classic, Sci-Fi"));
        assert_eq!(dune.finished_on, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(dune.started_on, None);
    }

    #[tokio::test]
    async fn test_book_without_categories_has_no_category_field() {
        let db = Db::init_in_memory().await.unwrap();
        let author = db.insert_author("Austen").await.unwrap();
        let id = db.insert_book(&book_row("Emma", author.id)).await.unwrap();

        let emma = db.fetch_book(id).await.unwrap().unwrap();
        assert_eq!(emma.categories, None);
        assert!(db.fetch_book(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_author_twice_returns_same_row() {
        let db = Db::init_in_memory().await.unwrap();
        let first = db.insert_author("Le Guin").await.unwrap();
        let second = db.insert_author("Le Guin").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(db.fetch_authors().await.unwrap().len(), 1);
        assert_eq!(db.find_author_id("Le Guin").await.unwrap(), Some(first.id));
        assert_eq!(db.find_author_id("Tolkien").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_deleting_missing_links_is_not_an_error() {
        let db = Db::init_in_memory().await.unwrap();
        assert_eq!(db.delete_book_categories(42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_unknown_book_affects_nothing() {
        let db = Db::init_in_memory().await.unwrap();
        let author = db.insert_author("Herbert").await.unwrap();
        let affected = db.update_book(7, &book_row("Dune", author.id)).await.unwrap();
        assert_eq!(affected, 0);
        assert_eq!(db.update_status(7, "Leído").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_cover() {
        let db = Db::init_in_memory().await.unwrap();
        let author = db.insert_author("Herbert").await.unwrap();
        let id = db.insert_book(&book_row("Dune", author.id)).await.unwrap();
        db.update_cover(id, "Dune_20240101120000.jpg").await.unwrap();

        let mut row = book_row("Dune Messiah", author.id);
        row.description = Some(String::from("Sequel"));
        assert_eq!(db.update_book(id, &row).await.unwrap(), 1);

        let book = db.fetch_book(id).await.unwrap().unwrap();
        assert_eq!(book.name.as_deref(), Some("Dune Messiah"));
        assert_eq!(book.description.as_deref(), Some("Sequel"));
        assert_eq!(book.cover_path.as_deref(), Some("Dune_20240101120000.jpg"));
    }

    #[tokio::test]
    async fn test_status_normalization_migrations() {
        let db = Db::init_in_memory().await.unwrap();
        let author = db.insert_author("Herbert").await.unwrap();
        let legacy = ["LEÍDO", "Ya LEÍDO", " NO LEÍDO ", "dejado", "POR LEER", "Releyendo"];
        for (index, status) in legacy.iter().enumerate() {
            let id = db
                .insert_book(&book_row(&format!("Book {index}"), author.id))
                .await
                .unwrap();
            db.update_status(id, status).await.unwrap();
        }

        for migration in [
            include_str!("../../migrations/20251102000000_normalize_reading_status.sql"),
            include_str!("../../migrations/20251103000000_normalize_accented_status.sql"),
        ] {
            sqlx::raw_sql(migration).execute(&db.pool).await.unwrap();
        }

        let statuses: Vec<String> = db
            .fetch_catalog()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.status)
            .collect();
        assert_eq!(
            statuses,
            vec!["Leído", "Leído", "No leído", "Abandonado", "Por leer", "Releyendo"]
        );
    }
}
