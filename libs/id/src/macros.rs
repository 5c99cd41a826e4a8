//! Macros for defining typed ID types.

/// Macro to define a typed ID for one kind of content.
///
/// This generates a newtype wrapper around [`ResourceId`](crate::ResourceId) with:
/// - A `KIND` constant naming the content type
/// - `new()` to generate a fresh ID
/// - `parse()` to parse a canonical UUID
/// - `slug()` / `from_slug()` for URL path segments
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_id!(MonsterId, "monster");
///
/// let id = MonsterId::new();
/// let slug = id.slug("Kobold Warrior");
/// assert_eq!(MonsterId::from_slug(slug.as_str()), Some(id));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[doc = concat!("A typed ID for a ", $kind, ".")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::ResourceId);

        impl $name {
            /// The content type this ID belongs to.
            pub const KIND: &'static str = $kind;

            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::ResourceId::new())
            }

            /// Wraps an untyped resource ID.
            #[must_use]
            pub const fn from_resource_id(id: $crate::ResourceId) -> Self {
                Self(id)
            }

            /// Returns the untyped resource ID.
            #[must_use]
            pub const fn resource_id(&self) -> $crate::ResourceId {
                self.0
            }

            /// Returns the 26-character identifier for this ID.
            #[must_use]
            pub fn identifier(&self) -> $crate::Identifier {
                $crate::Identifier::encode(self.0)
            }

            /// Builds the URL slug for this ID under the given display name.
            #[must_use]
            pub fn slug(&self, name: &str) -> $crate::Slug {
                $crate::Slug::new(name, self.0)
            }

            /// Resolves a slug or legacy UUID path segment.
            #[must_use]
            pub fn from_slug(s: &str) -> Option<Self> {
                $crate::resolve_slug(s).map(Self)
            }

            /// Parses an ID from its canonical hyphenated UUID form.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                $crate::ResourceId::parse(s).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <$crate::ResourceId as serde::Deserialize>::deserialize(deserializer).map(Self)
            }
        }

        impl From<$crate::ResourceId> for $name {
            fn from(id: $crate::ResourceId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::ResourceId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<$crate::ResourceId> for $name {
            fn as_ref(&self) -> &$crate::ResourceId {
                &self.0
            }
        }
    };
}
