//! Human-readable slugs that embed an [`Identifier`].
//!
//! A slug is `<kebab-name>-<identifier>`. Only the trailing 26 characters are
//! ever parsed; the name portion is cosmetic and may be renamed, truncated or
//! empty without breaking resolution.

use std::fmt;

use crate::identifier::{decode_identifier, encode_identifier, IDENTIFIER_LEN};
use crate::{is_canonical_uuid, Identifier, ResourceId};

/// Renders a display name as lower-case kebab text.
///
/// Every maximal run of characters outside `[a-z0-9]` (after lower-casing)
/// becomes a single hyphen, and leading/trailing hyphens are dropped. Lossy
/// and many-to-one; the result may be empty.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Builds the slug for a named resource.
#[must_use]
pub fn build_slug(name: &str, id: ResourceId) -> Slug {
    Slug::new(name, id)
}

/// Resolves a slug (or a legacy bare UUID) to a resource id.
///
/// Returns `None` for anything that does not resolve. Callers treat that as
/// "not found"; the shape of the failure is deliberately not exposed.
#[must_use]
pub fn resolve_slug(s: &str) -> Option<ResourceId> {
    // Links issued before slugs existed carry the bare UUID.
    if is_canonical_uuid(s) {
        return ResourceId::parse(s).ok();
    }

    decode_identifier(identifier_suffix(s)).ok()
}

/// Returns the trailing 26 characters of a slug (or all of it, if shorter).
#[must_use]
pub fn identifier_suffix(s: &str) -> &str {
    let start = s
        .char_indices()
        .rev()
        .nth(IDENTIFIER_LEN - 1)
        .map_or(0, |(index, _)| index);
    &s[start..]
}

/// A slug built from a display name and a resource id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug {
    id: ResourceId,
    text: String,
}

impl Slug {
    /// Builds `<kebab-name>-<identifier>`. The hyphen is kept even when the
    /// kebab name is empty.
    #[must_use]
    pub fn new(name: &str, id: ResourceId) -> Self {
        let mut text = kebab_case(name);
        text.push('-');
        text.push_str(&encode_identifier(id));
        Self { id, text }
    }

    /// Returns the resource id embedded in this slug.
    #[must_use]
    pub const fn resource_id(&self) -> ResourceId {
        self.id
    }

    /// Returns the identifier suffix.
    #[must_use]
    pub fn identifier(&self) -> Identifier {
        Identifier::encode(self.id)
    }

    /// Returns the slug text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the slug, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.text
    }
}

impl serde::Serialize for Slug {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}
