//! Sort specifications for list endpoints.
//!
//! On the wire a sort is the field name, prefixed with `-` for descending:
//! `name`, `-name`, `createdAt`, `-createdAt`, `level`, `-level`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use nimble_id::ResourceId;

use crate::cursor::CursorValue;
use crate::error::RequestError;

/// A column a collection can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Display name (text).
    Name,
    /// Creation time (timestamp).
    CreatedAt,
    /// Monster level (integer).
    Level,
}

impl SortField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::CreatedAt => "createdAt",
            SortField::Level => "level",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortField::Name),
            "createdAt" => Some(SortField::CreatedAt),
            "level" => Some(SortField::Level),
            _ => None,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    /// SQL keyword for this direction.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A sort field plus direction.
///
/// Every ordering built from a `SortSpec` breaks ties on the resource id,
/// ascending, regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Orders two rows by `(sort value, id)` under this spec.
    pub fn compare(
        &self,
        (a_value, a_id): (&CursorValue, ResourceId),
        (b_value, b_id): (&CursorValue, ResourceId),
    ) -> Ordering {
        let primary = match self.direction {
            SortDirection::Ascending => a_value.cmp(b_value),
            SortDirection::Descending => b_value.cmp(a_value),
        };
        primary.then_with(|| a_id.cmp(&b_id))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction.is_descending() {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, name) = match s.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, s),
        };

        let field = SortField::parse(name).ok_or_else(|| RequestError::InvalidSort(s.to_string()))?;
        Ok(Self { field, direction })
    }
}

impl serde::Serialize for SortSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for SortSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
