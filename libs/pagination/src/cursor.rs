//! Opaque pagination cursors.
//!
//! A cursor records where the previous page ended: the sort it was minted
//! under, the sort value of the last row, and that row's id. It is encoded
//! as JSON, then base64url without padding, so it can sit in a query string
//! unescaped. Clients must treat the token as opaque.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use nimble_id::ResourceId;
use serde::{Deserialize, Serialize};

use crate::error::CursorError;
use crate::sort::{SortField, SortSpec};

/// The sort-column value of the last row on a page.
///
/// Tagged by type on the wire so a timestamp never comes back as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorValue {
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i64),
}

impl CursorValue {
    fn type_name(&self) -> &'static str {
        match self {
            CursorValue::Text(_) => "text",
            CursorValue::Timestamp(_) => "timestamp",
            CursorValue::Integer(_) => "integer",
        }
    }

    /// Returns true if this value has the type stored in `field`.
    pub fn fits(&self, field: SortField) -> bool {
        matches!(
            (field, self),
            (SortField::Name, CursorValue::Text(_))
                | (SortField::CreatedAt, CursorValue::Timestamp(_))
                | (SortField::Level, CursorValue::Integer(_))
        )
    }
}

impl From<String> for CursorValue {
    fn from(s: String) -> Self {
        CursorValue::Text(s)
    }
}

impl From<&str> for CursorValue {
    fn from(s: &str) -> Self {
        CursorValue::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for CursorValue {
    fn from(t: DateTime<Utc>) -> Self {
        CursorValue::Timestamp(t)
    }
}

impl From<i64> for CursorValue {
    fn from(n: i64) -> Self {
        CursorValue::Integer(n)
    }
}

/// Decoded cursor contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cursor {
    /// The sort this cursor is valid for.
    pub sort: SortSpec,
    /// Sort value of the last row returned.
    pub value: CursorValue,
    /// Id of the last row returned (tie-breaker).
    pub id: ResourceId,
}

impl Cursor {
    pub fn new(sort: SortSpec, value: impl Into<CursorValue>, id: ResourceId) -> Self {
        Self {
            sort,
            value: value.into(),
            id,
        }
    }

    /// Encodes this cursor as an opaque URL-safe token.
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("cursor fields always serialize");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes a token produced by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CursorError::Encoding(e.to_string()))?;

        let cursor: Cursor =
            serde_json::from_slice(&bytes).map_err(|e| CursorError::Malformed(e.to_string()))?;

        if !cursor.value.fits(cursor.sort.field) {
            return Err(CursorError::ValueType {
                sort: cursor.sort,
                found: cursor.value.type_name(),
            });
        }

        Ok(cursor)
    }
}

/// Encodes a cursor for the given sort and last row.
pub fn encode_cursor(sort: SortSpec, last_value: impl Into<CursorValue>, last_id: ResourceId) -> String {
    Cursor::new(sort, last_value, last_id).encode()
}

/// Decodes a cursor token.
pub fn decode_cursor(token: &str) -> Result<Cursor, CursorError> {
    Cursor::decode(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn id() -> ResourceId {
        ResourceId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap()
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[rstest]
    #[case("name", CursorValue::Text("Ancient Dragon".into()))]
    #[case("-name", CursorValue::Text("Ancient Dragon".into()))]
    #[case("createdAt", CursorValue::Timestamp(timestamp()))]
    #[case("-createdAt", CursorValue::Timestamp(timestamp()))]
    #[case("level", CursorValue::Integer(10))]
    #[case("-level", CursorValue::Integer(-3))]
    #[case("name", CursorValue::Text(String::new()))]
    #[case("level", CursorValue::Integer(i64::MIN))]
    fn test_roundtrip(#[case] sort: &str, #[case] value: CursorValue) {
        let cursor = Cursor::new(sort.parse().unwrap(), value, id());
        let token = cursor.encode();
        assert!(!token.is_empty());
        let decoded = Cursor::decode(&token).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_timestamp_keeps_sub_second_precision() {
        let precise = timestamp() + chrono::Duration::nanoseconds(123_456_789);
        let token = encode_cursor(SortSpec::ascending(SortField::CreatedAt), precise, id());
        assert_eq!(decode_cursor(&token).unwrap().value, CursorValue::Timestamp(precise));
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_cursor(
            SortSpec::ascending(SortField::Name),
            "Test ??? >>> ~~~ ÿÿÿ",
            id(),
        );
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_decode_rejects_plain_text() {
        assert!(decode_cursor("invalid").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_cursor("!!!invalid!!!"),
            Err(CursorError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_token() {
        let token = encode_cursor(SortSpec::ascending(SortField::Name), "Goblin", id());
        let truncated = &token[..token.len() - 6];
        assert!(decode_cursor(truncated).is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_sort() {
        let json = r#"{"sort":"hp","value":{"integer":3},"id":"550e8400-e29b-41d4-a716-446655440000"}"#;
        let token = URL_SAFE_NO_PAD.encode(json);
        assert!(matches!(decode_cursor(&token), Err(CursorError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_untagged_value() {
        let json = r#"{"sort":"name","value":"Goblin","id":"550e8400-e29b-41d4-a716-446655440000"}"#;
        let token = URL_SAFE_NO_PAD.encode(json);
        assert!(matches!(decode_cursor(&token), Err(CursorError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_value_of_wrong_type() {
        let json = r#"{"sort":"createdAt","value":{"text":"yesterday"},"id":"550e8400-e29b-41d4-a716-446655440000"}"#;
        let token = URL_SAFE_NO_PAD.encode(json);
        let err = decode_cursor(&token).unwrap_err();
        assert!(matches!(err, CursorError::ValueType { found: "text", .. }));
    }

    #[test]
    fn test_decode_rejects_bad_id() {
        let json = r#"{"sort":"name","value":{"text":"Goblin"},"id":"goblin"}"#;
        let token = URL_SAFE_NO_PAD.encode(json);
        assert!(matches!(decode_cursor(&token), Err(CursorError::Malformed(_))));
    }
}
