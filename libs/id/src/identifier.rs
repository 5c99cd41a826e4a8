//! Fixed-length base-32 rendering of a [`ResourceId`].
//!
//! A 128-bit id is written as 26 symbols from a 32-symbol alphabet that
//! leaves out `i`, `l`, `o` and `u`. Twenty-six symbols hold 130 bits, so the
//! leading symbol of a valid identifier is always in `0..=7`.
//!
//! The alphabet and its order are part of every URL ever issued. Changing
//! either breaks previously shared links.

use std::fmt;
use std::str::FromStr;

use crate::{IdError, ResourceId};

/// The identifier alphabet, ordered by symbol value.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Length of every encoded identifier.
pub const IDENTIFIER_LEN: usize = 26;

/// Largest symbol value allowed in the leading position.
const MAX_LEADING_VALUE: u8 = 7;

const BASE: u128 = 32;

fn symbol_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&symbol| symbol == c as u8)
        .map(|value| value as u8)
}

/// Encodes a resource id as a 26-character identifier.
///
/// Total and deterministic: every 128-bit value has exactly one encoding.
#[must_use]
pub fn encode_identifier(id: ResourceId) -> String {
    let mut remaining = id.as_u128();
    let mut symbols = [ALPHABET[0]; IDENTIFIER_LEN];

    for slot in symbols.iter_mut().rev() {
        *slot = ALPHABET[(remaining % BASE) as usize];
        remaining /= BASE;
    }

    symbols.iter().map(|&b| char::from(b)).collect()
}

/// Decodes a 26-character identifier back into a resource id.
///
/// Fails when the length is wrong, when a character is outside the alphabet
/// (including upper-case letters), or when the leading symbol would need
/// more than 128 bits.
pub fn decode_identifier(s: &str) -> Result<ResourceId, IdError> {
    let actual = s.chars().count();
    if actual != IDENTIFIER_LEN {
        return Err(IdError::InvalidLength { actual });
    }

    let mut value: u128 = 0;
    for (position, character) in s.chars().enumerate() {
        let symbol = symbol_value(character)
            .ok_or(IdError::InvalidCharacter { character, position })?;

        if position == 0 && symbol > MAX_LEADING_VALUE {
            return Err(IdError::Overflow { first: character });
        }

        // Cannot overflow: the leading symbol contributes at most 3 bits.
        value = value * BASE + u128::from(symbol);
    }

    Ok(ResourceId::from_u128(value))
}

/// A validated 26-character identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    id: ResourceId,
    text: String,
}

impl Identifier {
    /// Encodes a resource id.
    #[must_use]
    pub fn encode(id: ResourceId) -> Self {
        Self {
            id,
            text: encode_identifier(id),
        }
    }

    /// Parses and validates an identifier string.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let id = decode_identifier(s)?;
        Ok(Self {
            id,
            text: s.to_owned(),
        })
    }

    /// Returns the resource id this identifier encodes.
    #[must_use]
    pub const fn resource_id(&self) -> ResourceId {
        self.id
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<ResourceId> for Identifier {
    fn from(id: ResourceId) -> Self {
        Self::encode(id)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Identifier {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl serde::Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> serde::Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
