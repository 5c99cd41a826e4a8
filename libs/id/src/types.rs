//! Resource ID and the typed ID definitions for all content types.
//!
//! Every stored record is keyed by a 128-bit [`ResourceId`]. Typed wrappers
//! keep a monster id from being passed where an item id is expected.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::{define_id, IdError};

// =============================================================================
// Resource ID
// =============================================================================

/// Returns true if `s` is a hyphenated 8-4-4-4-12 hex UUID (either case).
///
/// This is stricter than [`Uuid::parse_str`], which also accepts the simple,
/// braced and URN forms.
#[must_use]
pub fn is_canonical_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// A 128-bit resource identifier.
///
/// Rendered canonically as a lower-case hyphenated UUID. Ordering matches
/// the unsigned 128-bit value, which is also how Postgres orders `uuid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// The all-zero ID.
    pub const NIL: Self = Self(Uuid::nil());

    /// The all-ones ID.
    pub const MAX: Self = Self(Uuid::from_u128(u128::MAX));

    /// Creates a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    #[must_use]
    pub const fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    /// Parses a canonical hyphenated UUID.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if !is_canonical_uuid(s) {
            return Err(IdError::InvalidUuid(s.to_string()));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| IdError::InvalidUuid(e.to_string()))
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for ResourceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ResourceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ResourceId> for Uuid {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Creatures
// =============================================================================

define_id!(MonsterId, "monster");
define_id!(FamilyId, "family");
define_id!(CompanionId, "companion");
define_id!(ConditionId, "condition");

// =============================================================================
// Characters
// =============================================================================

define_id!(ClassId, "class");
define_id!(SubclassId, "subclass");
define_id!(ClassAbilityListId, "class ability list");
define_id!(AncestryId, "ancestry");
define_id!(BackgroundId, "background");
define_id!(SpellSchoolId, "spell school");

// =============================================================================
// Equipment and Curation
// =============================================================================

define_id!(ItemId, "item");
define_id!(CollectionId, "collection");
define_id!(AwardId, "award");
define_id!(UserId, "user");

// =============================================================================
// Tests
// =============================================================================
