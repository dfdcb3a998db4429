//! Database library
//!
//! The library crate exposes the `Db` struct and its methods to read and write books, authors,
//! categories and the links between books and categories through pre-defined queries.
pub mod queries;
pub mod types;
