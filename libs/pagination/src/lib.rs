//! # nimble-pagination
//!
//! Cursor-based (keyset) pagination for nimble list endpoints.
//!
//! ## Design Principles
//!
//! - One pagination algorithm for every content type; each collection only
//!   supplies an ordered fetch ([`OrderedFetch`])
//! - Ordering is always `(sort column, id ASC)` so ties are total
//! - Pages resume after the last seen key, never at an offset
//! - No server-side state: cursors are opaque, self-contained tokens
//! - A cursor is only valid for the sort it was minted under
//!
//! ## Wire Format
//!
//! List endpoints accept `?sort=-createdAt&limit=50&cursor=...` and return
//! `{"items": [...], "next_cursor": "..."}`, with `next_cursor` null on the
//! last page.
//!
//! ## Consistency
//!
//! Traversal is read-committed with no isolation across pages. Rows
//! inserted behind the cursor are not revisited and rows deleted ahead of it
//! are simply absent; no row is returned twice.

mod config;
mod cursor;
mod engine;
mod error;
mod sort;
pub mod sql;

pub use config::{PaginationConfig, DEFAULT_LIMIT, MAX_LIMIT};
pub use cursor::{decode_cursor, encode_cursor, Cursor, CursorValue};
pub use engine::{
    paginate, KeysetPredicate, KeysetQuery, KeysetRow, OrderedFetch, Page, PageQuery, PageRequest,
    Paginator,
};
pub use error::{ConfigError, CursorError, PaginationError, RequestError};
pub use sort::{SortDirection, SortField, SortSpec};

/// Re-export async_trait for storage implementations.
pub use async_trait::async_trait;
