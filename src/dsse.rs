use std::convert::TryFrom;

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// Dead Simple Signing Envelope (DSSE) as read from an attestation file.
///
/// This is a lenient, read-only view over the parsed JSON object. Nothing is
/// validated: `payload` and `signatures` may be missing or hold any JSON
/// value, and accessors simply return `None` for what is not there.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    fields: Map<String, Value>,
}

impl Envelope {
    /// Creates an envelope from a JSON string representation.
    ///
    /// # Arguments
    /// * `s` - JSON string to parse
    ///
    /// # Returns
    /// * `Result<Self>` - Parsed envelope, or error if the string is not JSON
    ///   or the top-level value is not an object
    pub fn try_from_json_string(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::try_from(value)
    }

    /// The signed payload, exactly as it appears in the envelope.
    pub fn payload(&self) -> Option<&Value> {
        self.fields.get("payload")
    }

    /// The declared payload type, if present and a string.
    pub fn payload_type(&self) -> Option<&str> {
        self.fields.get("payloadType").and_then(Value::as_str)
    }

    /// Number of signature entries, or zero when `signatures` is not an array.
    pub fn signature_count(&self) -> usize {
        self.fields
            .get("signatures")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// The first signature entry, if `signatures` is an array whose first
    /// element is an object.
    pub fn first_signature(&self) -> Option<Signature<'_>> {
        let fields = self
            .fields
            .get("signatures")?
            .as_array()?
            .first()?
            .as_object()?;

        Some(Signature { fields })
    }
}

impl TryFrom<Value> for Envelope {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(anyhow!(
                "DSSE envelope must be a JSON object, found {}.",
                json_kind(&other)
            )),
        }
    }
}

/// A single signature entry within a DSSE envelope.
#[derive(Debug, Clone, Copy)]
pub struct Signature<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Signature<'a> {
    /// The signature value, exactly as it appears in the entry.
    pub fn sig(&self) -> Option<&'a Value> {
        self.fields.get("sig")
    }

    /// Key identifier used to create the signature, if present and a string.
    pub fn keyid(&self) -> Option<&'a str> {
        self.fields.get("keyid").and_then(Value::as_str)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
