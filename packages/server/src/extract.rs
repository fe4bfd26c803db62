//! Request extractors that answer with [`HttpError`] on rejection
//!
//! axum's stock `Json` and `Path` reply with plain-text bodies (422 for bad
//! JSON). These wrappers keep every failure in the `{message, code}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::HttpError;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HttpError))]
pub struct ApiPath<T>(pub T);
