//! Extractors whose rejections render as [`AppError`] JSON bodies
use crate::errors::AppError;
use axum::extract::{FromRequest, FromRequestParts};

#[derive(FromRequest, Debug)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts, Debug)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
