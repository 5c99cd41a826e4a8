//! # nimble-id
//!
//! Stable resource IDs, identifiers, and slugs for nimble content.
//!
//! ## Design Principles
//!
//! - IDs are stable and system-generated; names are user-controlled labels
//! - Every ID has exactly one 26-character identifier and back
//! - Slugs carry a cosmetic name, but only the identifier suffix is parsed
//! - IDs are typed to prevent mixing different content types
//!
//! ## Formats
//!
//! A resource ID is a 128-bit UUID: `550e8400-e29b-41d4-a716-446655440000`.
//!
//! Its identifier is 26 base-32 symbols from `0123456789abcdefghjkmnpqrstvwxyz`:
//! `2n1t201rmv87aae5j4csam8000`.
//!
//! A slug joins the kebab-cased display name and the identifier:
//! `kobold-warrior-2n1t201rmv87aae5j4csam8000`.
//!
//! Slug resolution also accepts the bare UUID, which is how links were
//! shared before slugs existed.

mod error;
mod identifier;
mod macros;
mod slug;
mod types;

pub use error::IdError;
pub use identifier::{decode_identifier, encode_identifier, Identifier, ALPHABET, IDENTIFIER_LEN};
pub use slug::{build_slug, identifier_suffix, kebab_case, resolve_slug, Slug};
pub use types::*;

/// Re-export uuid for consumers that need raw UUID operations
pub use uuid::Uuid;
