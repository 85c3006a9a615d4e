//! # Reply Codec
//!
//! Server side: a dispatcher result becomes a transport response. Client
//! side: a transport response becomes a decoded value.
//!
//! ## Reply Kinds
//!
//! | Server [`Reply`] | Wire | Client [`DecodedResponse`] |
//! |------------------|------|----------------------------|
//! | `Raw(response)` | response + `x-direct-response: true` | `Raw(response)` marker stripped |
//! | `Encoded(value)` | 200, JSON body | `Value(value)` |
//! | `Unencoded(text)` | 200, text body | `Text(text)` |
//! | - | body not UTF-8 | `Unreadable(response)` |
//!
//! Client decoding never fails for a reachable response: it degrades from
//! JSON to text to the response itself.

use crate::constants::{
    CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT, DIRECT_RESPONSE_HEADER,
    DIRECT_RESPONSE_VALUE,
};
use actor_types::TransportResponse;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use tracing::trace;

/// Dispatcher outcome before it is put on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Response produced by the callee, passed through untouched
    Raw(TransportResponse),
    /// JSON-encodable result
    Encoded(Value),
    /// Result that could not be JSON-encoded, sent as plain text
    Unencoded(String),
}

impl Reply {
    /// Encode a method result, falling back to its debug text when it has no
    /// JSON representation
    pub fn from_result<T: Serialize + Debug>(result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Reply::Encoded(value),
            Err(e) => {
                trace!(error = %e, "Result is not JSON-encodable, sending as text");
                Reply::Unencoded(format!("{:?}", result))
            }
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Reply::Raw(_))
    }
}

impl From<TransportResponse> for Reply {
    fn from(response: TransportResponse) -> Self {
        Reply::Raw(response)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Encoded(value)
    }
}

/// Put a reply on the wire
pub fn encode_reply(reply: Reply) -> TransportResponse {
    match reply {
        Reply::Raw(response) => {
            response.with_header(DIRECT_RESPONSE_HEADER, DIRECT_RESPONSE_VALUE)
        }
        Reply::Encoded(value) => TransportResponse::ok(value.to_string())
            .with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON),
        Reply::Unencoded(text) => {
            TransportResponse::ok(text).with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_TEXT)
        }
    }
}

/// Structured error body `{"status": n, "error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub status: u16,
    pub error: String,
}

impl ErrorDescriptor {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    /// Error response carrying the descriptor; status mirrored on the response
    pub fn into_response(self) -> TransportResponse {
        let status = self.status;
        let body = serde_json::json!({ "status": self.status, "error": self.error });
        TransportResponse::new(status, body.to_string())
            .with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON)
    }

    /// Recognise an error descriptor in a non-success, non-passthrough response
    pub fn from_response(response: &TransportResponse) -> Option<Self> {
        if response.is_success() || is_direct(response) {
            return None;
        }
        serde_json::from_slice(&response.body).ok()
    }
}

/// Error response for a failed call
pub fn encode_error(status: u16, message: impl Into<String>) -> TransportResponse {
    ErrorDescriptor::new(status, message).into_response()
}

/// Client-side view of a call's response
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedResponse {
    /// Passthrough response, marker removed
    Raw(TransportResponse),
    /// JSON body
    Value(Value),
    /// Body that is text but not JSON
    Text(String),
    /// Body that is not text at all
    Unreadable(TransportResponse),
}

impl DecodedResponse {
    /// JSON value if the body decoded as JSON
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            DecodedResponse::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Collapse to a JSON value: text becomes a JSON string, responses `None`
    pub fn into_value(self) -> Option<Value> {
        match self {
            DecodedResponse::Value(value) => Some(value),
            DecodedResponse::Text(text) => Some(Value::String(text)),
            DecodedResponse::Raw(_) | DecodedResponse::Unreadable(_) => None,
        }
    }

    /// Deserialize the decoded value into `T`
    pub fn into_json<T: DeserializeOwned>(self) -> Option<serde_json::Result<T>> {
        self.into_value().map(serde_json::from_value)
    }

    /// Passthrough or unreadable response, if that is what came back
    pub fn into_response(self) -> Option<TransportResponse> {
        match self {
            DecodedResponse::Raw(response) | DecodedResponse::Unreadable(response) => {
                Some(response)
            }
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, DecodedResponse::Raw(_))
    }
}

fn is_direct(response: &TransportResponse) -> bool {
    response
        .headers
        .get(DIRECT_RESPONSE_HEADER)
        .is_some_and(|value| value.eq_ignore_ascii_case(DIRECT_RESPONSE_VALUE))
}

/// Decode a call response on the client
pub fn decode_response(mut response: TransportResponse) -> DecodedResponse {
    if is_direct(&response) {
        response.headers.remove(DIRECT_RESPONSE_HEADER);
        return DecodedResponse::Raw(response);
    }

    let Some(text) = response.text().map(str::to_owned) else {
        return DecodedResponse::Unreadable(response);
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => DecodedResponse::Value(value),
        Err(_) => DecodedResponse::Text(text),
    }
}
