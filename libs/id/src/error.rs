//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier is not exactly 26 characters long.
    #[error("identifier must be exactly 26 characters, got {actual}")]
    InvalidLength { actual: usize },

    /// The identifier contains a character outside the base-32 alphabet.
    #[error("invalid character in identifier: {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// The first character would need more than 128 bits to represent.
    #[error("invalid identifier: first character {first:?} exceeds maximum value")]
    Overflow { first: char },

    /// The string is not a canonical hyphenated UUID.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

impl IdError {
    /// Returns true if this error came from decoding a 26-character identifier.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(
            self,
            IdError::InvalidLength { .. } | IdError::InvalidCharacter { .. } | IdError::Overflow { .. }
        )
    }

    /// Returns true if the identifier decoded to a value wider than 128 bits.
    pub fn is_overflow(&self) -> bool {
        matches!(self, IdError::Overflow { .. })
    }
}
