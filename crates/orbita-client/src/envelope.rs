//! Response envelope handling
//!
//! Every backend response is wrapped as
//! `{status, data: …, errors, timestamp}`, but the payload sits at a
//! different depth per resource (`data`, `data.data`, …). An
//! [`EnvelopeLayout`] names that path so call sites never hard-code it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FetchError, Result};

/// Envelope status that marks a successful response
pub const SUCCESS_STATUS: i64 = 200;

/// Metadata carried next to the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeMeta {
    /// Application-level status
    pub status: i64,
    /// Backend error description, if any
    pub errors: Option<String>,
    /// Server timestamp, when present and RFC 3339
    pub timestamp: Option<DateTime<Utc>>,
}

impl EnvelopeMeta {
    /// Read the metadata fields of an envelope
    ///
    /// Fails with `InvalidShape` when the envelope is not an object or its
    /// `status` is not numeric.
    pub fn read(envelope: &Value) -> Result<Self> {
        let object = envelope
            .as_object()
            .ok_or_else(|| FetchError::InvalidShape("envelope is not a JSON object".to_string()))?;

        let status = object
            .get("status")
            .and_then(Value::as_i64)
            .ok_or_else(|| FetchError::InvalidShape("missing numeric `status`".to_string()))?;

        let errors = match object.get("errors") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        let timestamp = object
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Self {
            status,
            errors,
            timestamp,
        })
    }

    /// Check if the envelope reports success
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// Location of the payload inside a resource's envelope
///
/// # Examples
/// ```
/// use orbita_client::EnvelopeLayout;
/// use serde_json::json;
///
/// let layout = EnvelopeLayout::nested(2);
/// let envelope = json!({"status": 200, "data": {"data": {"items": []}}});
///
/// let payload = layout.unwrap(&envelope).unwrap();
/// assert!(payload["items"].is_array());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeLayout {
    path: Vec<String>,
    items_field: String,
}

impl EnvelopeLayout {
    /// Create a layout from the keys leading to the payload
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            items_field: "data".to_string(),
        }
    }

    /// Payload nested `depth` levels deep under `data` keys
    pub fn nested(depth: usize) -> Self {
        Self::new(std::iter::repeat("data").take(depth))
    }

    /// Set the name of the array field inside a page payload
    pub fn with_items_field(mut self, field: impl Into<String>) -> Self {
        self.items_field = field.into();
        self
    }

    /// Keys leading from the envelope root to the payload
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Name of the array field inside a page payload
    pub fn items_field(&self) -> &str {
        &self.items_field
    }

    /// Dotted form of the payload path, for diagnostics
    pub fn describe(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.join(".")
        }
    }

    /// Validate the envelope status and return the payload
    pub fn unwrap<'v>(&self, envelope: &'v Value) -> Result<&'v Value> {
        let meta = EnvelopeMeta::read(envelope)?;
        if !meta.is_success() {
            return Err(FetchError::InvalidShape(format!(
                "envelope status {}{}",
                meta.status,
                meta.errors
                    .map(|e| format!(": {}", e))
                    .unwrap_or_default()
            )));
        }

        let mut current = envelope;
        for (depth, key) in self.path.iter().enumerate() {
            current = current.get(key.as_str()).ok_or_else(|| {
                FetchError::InvalidShape(format!(
                    "missing `{}` in envelope",
                    self.path[..=depth].join(".")
                ))
            })?;
        }

        Ok(current)
    }

    /// Unwrap the payload and deserialize it
    pub fn decode<T: DeserializeOwned>(&self, envelope: &Value) -> Result<T> {
        let payload = self.unwrap(envelope)?;
        T::deserialize(payload).map_err(|e| {
            FetchError::InvalidShape(format!("payload at {}: {}", self.describe(), e))
        })
    }
}
