//! JSON packets exchanged over the framed transport.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RpcError;

/// Inbound request or event.
///
/// A packet without an `id` is an event: it is never answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPacket {
    /// Routing key, either a string or a JSON object.
    pub pattern: Value,
    /// Call payload.
    #[serde(default)]
    pub data: Value,
    /// Correlation identifier echoed in the reply. Any JSON value other
    /// than `null` is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl RequestPacket {
    /// Builds a request expecting a reply correlated by `id`.
    #[must_use]
    pub fn request(pattern: &str, data: Value, id: impl Into<Value>) -> Self {
        Self {
            pattern: Value::String(pattern.to_owned()),
            data,
            id: Some(id.into()),
        }
    }

    /// Builds a fire-and-forget event.
    #[must_use]
    pub fn event(pattern: &str, data: Value) -> Self {
        Self {
            pattern: Value::String(pattern.to_owned()),
            data,
            id: None,
        }
    }

    /// Returns the routing key handlers are matched against.
    ///
    /// String patterns route as-is. Any other pattern routes by its compact
    /// JSON form with object keys sorted, so `{"cmd":"x","v":1}` and
    /// `{"v":1,"cmd":"x"}` reach the same handler.
    #[must_use]
    pub fn route(&self) -> String {
        match &self.pattern {
            Value::String(pattern) => pattern.clone(),
            other => other.to_string(),
        }
    }

    /// Returns `true` when no reply is expected.
    #[must_use]
    pub const fn is_event(&self) -> bool {
        self.id.is_none()
    }

    /// Serializes the packet into a frame payload.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when the payload cannot be encoded.
    pub fn to_frame(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Parses a frame payload.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the payload is not a request packet.
    pub fn from_frame(frame: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(frame)
    }

    /// Extracts the correlation id from a frame that is JSON but not a valid
    /// request packet.
    #[must_use]
    pub fn recover_id(frame: &[u8]) -> Option<Value> {
        match serde_json::from_slice::<Value>(frame).ok()? {
            Value::Object(mut fields) => fields.remove("id").filter(|id| !id.is_null()),
            _ => None,
        }
    }
}

/// Reply to a request, carrying exactly one of `response` or `err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePacket {
    /// Identifier of the request being answered.
    pub id: Value,
    /// Successful result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Failure body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    /// Set on the final packet of a reply stream.
    #[serde(default)]
    pub is_disposed: bool,
}

impl ResponsePacket {
    /// Builds a successful reply.
    #[must_use]
    pub const fn success(id: Value, response: Value) -> Self {
        Self {
            id,
            response: Some(response),
            err: None,
            is_disposed: true,
        }
    }

    /// Builds a failed reply.
    #[must_use]
    pub fn failure(id: Value, error: &RpcError) -> Self {
        let err = serde_json::to_value(error)
            .unwrap_or_else(|_| Value::String(error.to_string()));
        Self {
            id,
            response: None,
            err: Some(err),
            is_disposed: true,
        }
    }

    /// Serializes the reply into a frame payload.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when the payload cannot be encoded.
    pub fn to_frame(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Parses a frame payload.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the payload is not a reply packet.
    pub fn from_frame(frame: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(frame)
    }
}
