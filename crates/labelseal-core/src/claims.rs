//! Flat claims extraction.
//!
//! A claims document is a YAML mapping of string keys to scalar values. The
//! envelope core never looks inside it; this module exists for the label
//! renderer, which needs a handful of named fields.
//!
//! Rules:
//! - the top level must be a mapping
//! - keys must be strings
//! - scalar values (string, number, bool) are rendered as text; null as ""
//! - nested sequences/mappings are rejected
//! - no schema validation beyond the fields a caller asks for

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{SealError, SealResult};

pub const RECIPIENT_PERSON: &str = "r_person";
pub const RECIPIENT_ADDRESS: &str = "r_address";
pub const SENDER_NAME: &str = "s_name";
pub const SENDER_ADDRESS: &str = "s_address";

/// Flat key/value view over a claims document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Claims {
    fields: BTreeMap<String, String>,
}

impl Claims {
    pub fn parse(yaml_text: &str) -> SealResult<Self> {
        if yaml_text.trim().is_empty() {
            return Err(SealError::claims("claims document is empty"));
        }

        let value: serde_yaml::Value = serde_yaml::from_str(yaml_text)
            .map_err(|e| SealError::claims(format!("failed to parse yaml: {e}")))?;

        let map = match value {
            serde_yaml::Value::Mapping(m) => m,
            _ => return Err(SealError::claims("claims document must be a mapping")),
        };

        let mut fields = BTreeMap::new();
        for (k, v) in map {
            let key = match k {
                serde_yaml::Value::String(s) => s,
                other => {
                    return Err(SealError::claims(format!(
                        "claim keys must be strings, got {other:?}"
                    )))
                }
            };
            let text = scalar_text(&key, v)?;
            fields.insert(key, text);
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Look up a field that must be present.
    pub fn require(&self, key: &str) -> SealResult<&str> {
        self.get(key)
            .ok_or_else(|| SealError::claims(format!("missing key: {key}")))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn scalar_text(key: &str, v: serde_yaml::Value) -> SealResult<String> {
    match v {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Tagged(tagged) => {
            let tagged = *tagged;
            scalar_text(key, tagged.value)
        }
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => Err(SealError::claims(
            format!("claim {key} must be a scalar value"),
        )),
    }
}

/// Human-readable fields printed on a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFields {
    pub recipient_person: String,
    pub recipient_address: String,
    pub sender_name: String,
    pub sender_address: String,
}

impl LabelFields {
    pub fn from_claims(claims: &Claims) -> SealResult<Self> {
        Ok(Self {
            recipient_person: claims.require(RECIPIENT_PERSON)?.to_string(),
            recipient_address: claims.require(RECIPIENT_ADDRESS)?.to_string(),
            sender_name: claims.require(SENDER_NAME)?.to_string(),
            sender_address: claims.require(SENDER_ADDRESS)?.to_string(),
        })
    }

    pub fn recipient_lines(&self) -> [&str; 2] {
        [self.recipient_person.as_str(), self.recipient_address.as_str()]
    }

    pub fn sender_lines(&self) -> [&str; 2] {
        [self.sender_name.as_str(), self.sender_address.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const FULL: &str = r#"
r_person: Alice
r_address: 1 Main St
s_name: Parcel Co
s_address: 9 Dock Rd
i_cert: https://example.com/keys/ops.pem
weight_kg: 2.5
fragile: true
"#;

    #[test]
    fn parses_flat_claims() {
        let c = Claims::parse(FULL).unwrap();
        assert_eq!(c.get("r_person"), Some("Alice"));
        assert_eq!(c.get("weight_kg"), Some("2.5"));
        assert_eq!(c.get("fragile"), Some("true"));
        assert_eq!(c.len(), 7);
    }

    #[test]
    fn label_fields_extracted() {
        let f = LabelFields::from_claims(&Claims::parse(FULL).unwrap()).unwrap();
        assert_eq!(f.recipient_lines(), ["Alice", "1 Main St"]);
        assert_eq!(f.sender_lines(), ["Parcel Co", "9 Dock Rd"]);
    }

    #[test]
    fn missing_field_names_the_key() {
        let c = Claims::parse("r_person: Alice\nr_address: 1 Main St\n").unwrap();
        let err = LabelFields::from_claims(&c).unwrap_err();
        assert_matches!(err, SealError::Claims(m) if m == "missing key: s_name");
    }

    #[test]
    fn nested_values_rejected() {
        let err = Claims::parse("r_person:\n  first: Alice\n").unwrap_err();
        assert_matches!(err, SealError::Claims(_));
    }

    #[test]
    fn non_mapping_rejected() {
        assert_matches!(Claims::parse("- a\n- b\n"), Err(SealError::Claims(_)));
        assert_matches!(Claims::parse("   "), Err(SealError::Claims(_)));
    }

    #[test]
    fn signed_payload_parses_as_claims() {
        let c = Claims::parse("r_person: Alice\nx_sig: AAAA\n").unwrap();
        assert_eq!(c.get("x_sig"), Some("AAAA"));
    }
}
