//! `nbooks_core`
//!
//! Core library for the platform-independent logic of NBooks, a personal book tracker. The HTTP
//! server only binds requests to the functions in here, so the same logic can back any other
//! front end.

pub mod catalog;

pub mod database;

pub mod library;

pub mod stats;

pub mod storage;
