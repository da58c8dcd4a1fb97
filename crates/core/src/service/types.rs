//! Error types for catalog operations.

use serde::Serialize;
use thiserror::Error;

use crate::memorized::StoreError;
use crate::source::SourceError;

/// Errors surfaced by `CatalogService`.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Failed to fetch books: {0}")]
    Fetch(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Flat classification of a `CatalogError`, for callers choosing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogErrorKind {
    FetchFailure,
    InvalidInput,
    DuplicateTitle,
    NotFound,
    StoreUnavailable,
}

impl CatalogError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            CatalogError::Fetch(_) => CatalogErrorKind::FetchFailure,
            CatalogError::Store(StoreError::InvalidInput(_)) => CatalogErrorKind::InvalidInput,
            CatalogError::Store(StoreError::DuplicateTitle(_)) => CatalogErrorKind::DuplicateTitle,
            CatalogError::Store(StoreError::NotFound(_)) => CatalogErrorKind::NotFound,
            CatalogError::Store(StoreError::Unavailable(_)) => CatalogErrorKind::StoreUnavailable,
        }
    }
}
