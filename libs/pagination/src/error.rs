//! Error types for cursors and paginated requests.

use thiserror::Error;

use crate::sort::SortSpec;

/// Errors that can occur when decoding a cursor token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// The token is not valid base64url.
    #[error("cursor is not valid base64url: {0}")]
    Encoding(String),

    /// The decoded bytes are not a well-formed cursor.
    #[error("malformed cursor: {0}")]
    Malformed(String),

    /// The cursor value does not have the type of its sort column.
    #[error("cursor value for sort '{sort}' has wrong type: {found}")]
    ValueType { sort: SortSpec, found: &'static str },
}

/// Client errors in a page request. Each maps to a 400 at the HTTP layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The sort parameter names no known field.
    #[error("invalid sort parameter: '{0}'")]
    InvalidSort(String),

    /// The collection cannot be sorted by this field.
    #[error("sort '{0}' is not supported for this collection")]
    UnsupportedSort(SortSpec),

    /// The limit is outside the allowed range.
    #[error("limit must be between 1 and {max}, got {requested}")]
    InvalidLimit { requested: i64, max: u32 },

    /// The cursor token is corrupt.
    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    /// The cursor was minted for a different sort than the one requested.
    #[error("cursor sort mismatch: cursor has '{cursor}' but request has '{requested}'")]
    SortCursorMismatch { cursor: SortSpec, requested: SortSpec },
}

impl RequestError {
    /// Returns true if this error concerns the cursor token.
    pub fn is_cursor_error(&self) -> bool {
        matches!(
            self,
            RequestError::InvalidCursor(_) | RequestError::SortCursorMismatch { .. }
        )
    }

    /// Machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::InvalidSort(_) => "invalid_sort",
            RequestError::UnsupportedSort(_) => "unsupported_sort",
            RequestError::InvalidLimit { .. } => "invalid_limit",
            RequestError::InvalidCursor(_) => "invalid_cursor",
            RequestError::SortCursorMismatch { .. } => "sort_cursor_mismatch",
        }
    }
}

/// Errors returned by the paginator.
///
/// Storage errors pass through untouched.
#[derive(Debug, Error)]
pub enum PaginationError<E> {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Storage(E),
}

impl<E> PaginationError<E> {
    /// Returns true if the caller should reject the request as malformed.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PaginationError::Request(_))
    }

    /// Returns the request error, if this is one.
    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            PaginationError::Request(e) => Some(e),
            PaginationError::Storage(_) => None,
        }
    }

    /// Returns the storage error, if this is one.
    pub fn into_storage(self) -> Option<E> {
        match self {
            PaginationError::Storage(e) => Some(e),
            PaginationError::Request(_) => None,
        }
    }
}

/// Errors loading pagination configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is not a positive integer.
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidValue { var: &'static str, value: String },

    /// The default limit exceeds the maximum.
    #[error("default page limit {default_limit} exceeds maximum {max_limit}")]
    DefaultExceedsMax { default_limit: u32, max_limit: u32 },
}
