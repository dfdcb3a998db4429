//! Catalog
//!
//! Pure functions over the catalog projection: filtering, status normalization and the badges
//! and cards the user interface renders.
pub mod badge;
pub mod filter;
pub mod presentation;
pub mod status;
