//! Tagged on-chain value model
//!
//! The ledger index reports script datums and redeemers as a tagged JSON
//! encoding: every node is either a primitive leaf (`{"int": ..}`,
//! `{"bytes": ".."}`, `{"list": [..]}`) or a constructor node
//! `{"constructor": n, "fields": [..]}`. Positional fields carry the
//! meaning; the typed decoders in [`super::datum`] and [`super::redeemer`]
//! map them to named records.

use serde::{Deserialize, Serialize};

/// One node of the tagged on-chain data encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlutusValue {
    /// Constructor node with a numeric tag and positional fields
    Constr {
        constructor: u64,
        fields: Vec<PlutusValue>,
    },
    /// Integer leaf
    Int { int: i64 },
    /// Hex-encoded byte string leaf
    Bytes { bytes: String },
    /// Homogeneous list leaf
    List { list: Vec<PlutusValue> },
}

impl PlutusValue {
    /// Integer leaf value, or `None` when the node is not an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int { int } => Some(*int),
            _ => None,
        }
    }

    /// Byte-string leaf value, or `None` when the node is not bytes
    pub fn as_bytes(&self) -> Option<&str> {
        match self {
            Self::Bytes { bytes } => Some(bytes),
            _ => None,
        }
    }

    /// Constructor tag and fields, or `None` for leaves
    pub fn constr(&self) -> Option<(u64, &[PlutusValue])> {
        match self {
            Self::Constr {
                constructor,
                fields,
            } => Some((*constructor, fields)),
            _ => None,
        }
    }

    /// Logical record fields of a datum node.
    ///
    /// The encoder often wraps the real field list in a singleton
    /// constructor; when the first field is itself a constructor node its
    /// fields are the record, otherwise the outer fields are taken as-is.
    pub fn record_fields(&self) -> Option<&[PlutusValue]> {
        let (_, fields) = self.constr()?;
        match fields.first() {
            Some(Self::Constr { fields: inner, .. }) => Some(inner),
            _ => Some(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> PlutusValue {
        serde_json::from_str(raw).expect("valid tagged value")
    }

    #[test]
    fn test_parse_leaves() {
        assert_eq!(parse(r#"{"int": 42}"#).as_int(), Some(42));
        assert_eq!(parse(r#"{"bytes": "abcd"}"#).as_bytes(), Some("abcd"));
        assert!(parse(r#"{"list": [{"int": 1}]}"#).as_int().is_none());
    }

    #[test]
    fn test_parse_constructor() {
        let value = parse(r#"{"constructor": 7, "fields": [{"int": 1}, {"bytes": "aa"}]}"#);
        let (tag, fields) = value.constr().expect("constructor node");
        assert_eq!(tag, 7);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].as_int(), Some(1));
    }

    #[test]
    fn test_record_fields_unwraps_singleton_wrapping() {
        let wrapped = parse(
            r#"{"constructor": 0, "fields": [{"constructor": 0, "fields": [{"int": 5}, {"int": 6}]}]}"#,
        );
        let fields = wrapped.record_fields().expect("record");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].as_int(), Some(5));
    }

    #[test]
    fn test_record_fields_flat() {
        let flat = parse(r#"{"constructor": 0, "fields": [{"int": 5}, {"bytes": "aa"}]}"#);
        let fields = flat.record_fields().expect("record");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].as_bytes(), Some("aa"));
    }

    #[test]
    fn test_record_fields_none_for_leaf() {
        assert!(parse(r#"{"int": 1}"#).record_fields().is_none());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let raw = r#"{"constructor": 1, "fields": [{"int": 9}, {"bytes": "ff"}]}"#;
        assert_eq!(parse(raw), parse(raw));
    }
}
