use anyhow::Result;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dsse;

/// Attestation format version emitted by [`convert`].
pub const PEP740_VERSION: u8 = 1;

/// A PEP 740 attestation wrapping a DSSE statement and its signature.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attestation {
    /// Attestation format version, always [`PEP740_VERSION`]
    pub version: u8,
    /// Verification material; `None` for private-key signing
    pub verification_material: Option<Value>,
    /// The signed statement and its signature
    pub envelope: Envelope,
}

/// Statement and signature pair inside a PEP 740 attestation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    /// The DSSE payload, copied as-is
    pub statement: Value,
    /// The first DSSE signature, copied as-is
    pub signature: Value,
}

impl Attestation {
    /// Creates an attestation without verification material.
    pub fn new(statement: Value, signature: Value) -> Attestation {
        Attestation {
            version: PEP740_VERSION,
            verification_material: None,
            envelope: Envelope {
                statement,
                signature,
            },
        }
    }

    /// Converts the attestation into a JSON string representation.
    ///
    /// # Returns
    /// * `Result<String>` - JSON string of the attestation, or error if serialization fails
    pub fn into_json_string(self) -> Result<String> {
        let s = serde_json::to_string(&self)?;

        Ok(s)
    }

    /// Creates an attestation from a JSON string representation.
    ///
    /// # Arguments
    /// * `s` - JSON string to parse
    ///
    /// # Returns
    /// * `Result<Self>` - Parsed attestation, or error if deserialization fails
    pub fn try_from_json_string(s: &str) -> Result<Self> {
        let attestation = serde_json::from_str(s)?;

        Ok(attestation)
    }
}

impl From<&dsse::Envelope> for Attestation {
    fn from(envelope: &dsse::Envelope) -> Self {
        convert(envelope)
    }
}

/// Rewrites a DSSE envelope as a PEP 740 attestation.
///
/// The statement is the DSSE `payload` and the signature is the `sig` of the
/// first DSSE signature. Whatever is missing becomes an empty string.
pub fn convert(envelope: &dsse::Envelope) -> Attestation {
    debug!(
        "Converting DSSE envelope (payload type: {}, {} signature(s)).",
        envelope.payload_type().unwrap_or("unspecified"),
        envelope.signature_count()
    );

    let statement = envelope.payload().cloned().unwrap_or_else(empty);

    let signature = envelope
        .first_signature()
        .and_then(|s| {
            trace!("Using signature with keyid {:?}.", s.keyid());
            s.sig().cloned()
        })
        .unwrap_or_else(empty);

    Attestation::new(statement, signature)
}

fn empty() -> Value {
    Value::String(String::new())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn convert_value(value: Value) -> Value {
        let envelope = dsse::Envelope::try_from(value).unwrap();
        serde_json::to_value(convert(&envelope)).unwrap()
    }

    macro_rules! tests {
        ($($name:ident: $fixture:literal),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    let input = include_str!(concat!("../fixtures/", $fixture, ".dsse.json"));

                    let expected = include_str!(concat!("../fixtures/", $fixture, ".pep740.json"));
                    let expected = Attestation::try_from_json_string(expected).unwrap();

                    let envelope = dsse::Envelope::try_from_json_string(input).unwrap();
                    let computed = convert(&envelope);

                    assert_eq!(computed, expected);
                }
            )*
        };
    }

    tests! {
        intoto_provenance: "intoto-provenance",
        multiple_signatures: "multiple-signatures",
        unsigned: "unsigned",
    }

    #[test]
    fn copies_payload_and_first_sig() {
        let output = convert_value(json!({
            "payload": "abc123",
            "signatures": [{ "sig": "sigvalue" }]
        }));

        assert_eq!(
            output,
            json!({
                "version": 1,
                "verification_material": null,
                "envelope": { "statement": "abc123", "signature": "sigvalue" }
            })
        );
    }

    #[test]
    fn empty_object_gets_defaults() {
        let output = convert_value(json!({}));

        assert_eq!(
            output,
            json!({
                "version": 1,
                "verification_material": null,
                "envelope": { "statement": "", "signature": "" }
            })
        );
    }

    #[test]
    fn missing_payload_is_empty_statement() {
        let output = convert_value(json!({ "signatures": [{ "sig": "sigvalue" }] }));

        assert_eq!(output["envelope"]["statement"], json!(""));
        assert_eq!(output["envelope"]["signature"], json!("sigvalue"));
    }

    #[test]
    fn empty_signatures_is_empty_signature() {
        let output = convert_value(json!({ "payload": "abc123", "signatures": [] }));

        assert_eq!(output["envelope"]["statement"], json!("abc123"));
        assert_eq!(output["envelope"]["signature"], json!(""));
    }

    #[test]
    fn first_signature_without_sig_is_empty_signature() {
        let output = convert_value(json!({
            "payload": "abc123",
            "signatures": [{ "keyid": "k1" }, { "sig": "second" }]
        }));

        assert_eq!(output["envelope"]["signature"], json!(""));
    }

    #[test]
    fn values_are_copied_verbatim() {
        let output = convert_value(json!({
            "payload": null,
            "signatures": [{ "sig": { "nested": [1, 2] } }]
        }));

        assert_eq!(output["envelope"]["statement"], Value::Null);
        assert_eq!(output["envelope"]["signature"], json!({ "nested": [1, 2] }));
    }

    #[test]
    fn constant_fields_ignore_input() {
        let output = convert_value(json!({
            "version": 7,
            "verification_material": { "certificate": "abc" },
            "payload": "abc123"
        }));

        assert_eq!(output["version"], json!(1));
        assert_eq!(output["verification_material"], Value::Null);
        assert_eq!(output.as_object().unwrap().len(), 3);
    }

    #[test]
    fn serializes_keys_in_order() {
        let s = Attestation::new(json!("abc123"), json!("sigvalue"))
            .into_json_string()
            .unwrap();

        assert_eq!(
            s,
            r#"{"version":1,"verification_material":null,"envelope":{"statement":"abc123","signature":"sigvalue"}}"#
        );
    }

    #[test]
    fn from_dsse_envelope() {
        let envelope = dsse::Envelope::try_from_json_string(
            r#"{"payload": "abc123", "signatures": [{"sig": "sigvalue"}]}"#,
        )
        .unwrap();

        let attestation = Attestation::from(&envelope);

        assert_eq!(attestation, Attestation::new(json!("abc123"), json!("sigvalue")));
    }
}
