//! One handler per user action
pub mod authors;
pub mod books;
pub mod catalog;
pub mod stats;

pub async fn health() -> &'static str {
    "ok"
}
