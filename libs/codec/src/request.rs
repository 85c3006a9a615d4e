//! # Call Request Codec
//!
//! Turns a [`MethodInvocation`] into a transport request addressed to the
//! reserved RPC authority, and recovers the method name and arguments on the
//! dispatcher side.
//!
//! The authority is the only thing separating RPC traffic from every other
//! request an actor receives: a request whose origin differs is never
//! interpreted as a call.

use crate::constants::{CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON, RPC_AUTHORITY};
use crate::error::{CodecError, Result};
use actor_types::{Method, MethodInvocation, TransportRequest, Url};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::borrow::Cow;
use tracing::trace;

/// Encoder/decoder bound to one RPC authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeCodec {
    authority: Url,
}

impl EnvelopeCodec {
    /// Create a codec for the given authority (`scheme://host[:port]`)
    pub fn new(authority: &str) -> Result<Self> {
        let mut url =
            Url::parse(authority).map_err(|e| CodecError::invalid_authority(authority, e))?;

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(CodecError::invalid_authority(
                authority,
                "authority must be an absolute URL with a host",
            ));
        }

        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self { authority: url })
    }

    pub fn authority(&self) -> &Url {
        &self.authority
    }

    /// Build `POST <authority>/<method>` with the JSON argument array as body
    pub fn encode_call(&self, invocation: &MethodInvocation) -> Result<TransportRequest> {
        let mut url = self.authority.clone();
        url.path_segments_mut()
            .map_err(|_| CodecError::invalid_authority(self.authority.as_str(), "not a base URL"))?
            .clear()
            .push(&invocation.method);

        let body = serde_json::to_vec(&invocation.args)
            .map_err(|e| CodecError::serialization(&invocation.method, e))?;

        trace!(
            method = %invocation.method,
            args = invocation.args.len(),
            body_bytes = body.len(),
            "Encoded RPC call"
        );

        Ok(TransportRequest::new(Method::Post, url)
            .with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON)
            .with_body(body))
    }

    /// Whether the request targets the reserved authority
    pub fn is_rpc_request(&self, request: &TransportRequest) -> bool {
        request.url.origin() == self.authority.origin()
    }

    /// Method name carried by an RPC request path, percent-decoded
    pub fn method_name<'a>(&self, request: &'a TransportRequest) -> Result<Cow<'a, str>> {
        let segment = request
            .path_segments()
            .first()
            .copied()
            .ok_or_else(|| CodecError::missing_method(request.url.path()))?;

        percent_decode_str(segment)
            .decode_utf8()
            .map_err(|_| CodecError::missing_method(request.url.path()))
    }

    /// Decode the positional argument array from an RPC request body
    ///
    /// An empty body is an empty argument list.
    pub fn decode_args(&self, method: &str, request: &TransportRequest) -> Result<Vec<Value>> {
        if request.body.is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Value>(&request.body) {
            Ok(Value::Array(args)) => Ok(args),
            Ok(other) => Err(CodecError::invalid_arguments(
                method,
                format!("expected a JSON array, got {}", json_kind(&other)),
            )),
            Err(e) => Err(CodecError::invalid_arguments(method, e)),
        }
    }

    /// Decode a full invocation from an RPC request
    pub fn decode_call(&self, request: &TransportRequest) -> Result<MethodInvocation> {
        let method = self.method_name(request)?;
        let args = self.decode_args(&method, request)?;
        Ok(MethodInvocation::new(method.into_owned(), args))
    }
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new(RPC_AUTHORITY).expect("RPC_AUTHORITY constant should always parse")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_call_targets_method_path() {
        let codec = EnvelopeCodec::default();
        let request = codec
            .encode_call(&MethodInvocation::new("add", vec![json!(3), json!(4)]))
            .unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.as_str(), "https://actor-rpc.internal/add");
        assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(&request.body[..], b"[3,4]");
    }

    #[test]
    fn test_decode_call_recovers_invocation() {
        let codec = EnvelopeCodec::default();
        let original = MethodInvocation::new("greet", vec![json!("bob"), json!({"loud": true})]);
        let request = codec.encode_call(&original).unwrap();

        assert!(codec.is_rpc_request(&request));
        assert_eq!(codec.decode_call(&request).unwrap(), original);
    }

    #[test]
    fn test_method_names_round_trip_through_path_encoding() {
        let codec = EnvelopeCodec::default();

        for name in ["größe", "get value", "a/b", "50%"] {
            let request = codec.encode_call(&MethodInvocation::new(name, vec![])).unwrap();
            assert_eq!(request.path_segments().len(), 1, "{name} must stay one segment");
            assert_eq!(codec.method_name(&request).unwrap(), name);
            assert_eq!(codec.decode_call(&request).unwrap().method, name);
        }
    }

    #[test]
    fn test_non_utf8_method_name_is_rejected() {
        let codec = EnvelopeCodec::default();
        let request = TransportRequest::new(
            Method::Post,
            Url::parse("https://actor-rpc.internal/%FF%FE").unwrap(),
        );
        assert!(matches!(
            codec.method_name(&request),
            Err(CodecError::MissingMethod { .. })
        ));
    }

    #[test]
    fn test_default_codec_uses_reserved_authority() {
        let codec = EnvelopeCodec::default();
        assert_eq!(codec.authority().as_str(), "https://actor-rpc.internal/");
        assert_eq!(codec, EnvelopeCodec::new(RPC_AUTHORITY).unwrap());
    }

    #[test]
    fn test_foreign_origin_is_not_rpc() {
        let codec = EnvelopeCodec::default();
        let request = TransportRequest::new(
            Method::Get,
            Url::parse("https://example.com/add").unwrap(),
        );
        assert!(!codec.is_rpc_request(&request));

        let other_port = TransportRequest::new(
            Method::Post,
            Url::parse("https://actor-rpc.internal:8443/add").unwrap(),
        );
        assert!(!codec.is_rpc_request(&other_port));
    }

    #[test]
    fn test_empty_body_is_empty_argument_list() {
        let codec = EnvelopeCodec::default();
        let request = TransportRequest::new(
            Method::Post,
            Url::parse("https://actor-rpc.internal/increment").unwrap(),
        );
        assert!(codec.decode_args("increment", &request).unwrap().is_empty());
    }

    #[test]
    fn test_non_array_body_is_rejected() {
        let codec = EnvelopeCodec::default();
        let request = TransportRequest::new(
            Method::Post,
            Url::parse("https://actor-rpc.internal/add").unwrap(),
        )
        .with_body(r#"{"a": 1}"#);

        let error = codec.decode_args("add", &request).unwrap_err();
        assert_eq!(error.status(), 400);
        assert!(error.to_string().contains("got object"));
    }

    #[test]
    fn test_missing_method_name() {
        let codec = EnvelopeCodec::default();
        let request = TransportRequest::new(
            Method::Post,
            Url::parse("https://actor-rpc.internal/").unwrap(),
        );
        assert!(matches!(
            codec.method_name(&request),
            Err(CodecError::MissingMethod { .. })
        ));
    }

    #[test]
    fn test_custom_authority_is_normalised() {
        let codec = EnvelopeCodec::new("http://rpc.local:9000/ignored?x=1").unwrap();
        assert_eq!(codec.authority().as_str(), "http://rpc.local:9000/");
        assert!(EnvelopeCodec::new("not a url").is_err());
        assert!(EnvelopeCodec::new("mailto:someone@example.com").is_err());
    }
}
