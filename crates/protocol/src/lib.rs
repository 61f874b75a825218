//! sRDFSe Protocol
//!
//! Message catalog for an RDFS editing session. A client and the server
//! exchange JSON text frames over one WebSocket, discriminated by `method`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// Re-exports
pub mod client;
pub mod server;
pub mod types;

pub use client::ClientMessage;
pub use server::ServerMessage;
pub use types::*;

/// Errors raised while turning frames into catalog messages and back
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("frame has no `method` discriminator")]
    MissingMethod,

    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("invalid `{method}` message: {source}")]
    InvalidPayload {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode `{method}` message: {source}")]
    Encode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A closed set of messages travelling in one direction.
pub trait Catalog: Serialize + DeserializeOwned {
    /// Every `method` value this catalog accepts.
    const METHODS: &'static [&'static str];

    /// The `method` discriminator of this message.
    fn method(&self) -> &'static str;
}

/// Decode one text frame into a catalog message.
///
/// Unknown methods fail with [`ProtocolError::UnknownMethod`] before any
/// field-level decoding is attempted.
pub fn decode<M: Catalog>(text: &str) -> Result<M, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
    let method = value
        .get("method")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingMethod)?
        .to_string();

    if !M::METHODS.contains(&method.as_str()) {
        return Err(ProtocolError::UnknownMethod(method));
    }

    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload { method, source })
}

/// Encode a catalog message as a text frame.
pub fn encode<M: Catalog>(message: &M) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(|source| ProtocolError::Encode {
        method: message.method(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_server_method_is_typed_error() {
        let err = decode::<ServerMessage>(r#"{"method":"explode","resource":{}}"#)
            .expect_err("unknown method must not decode");
        match err {
            ProtocolError::UnknownMethod(method) => assert_eq!(method, "explode"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn client_methods_are_not_server_methods() {
        let err = decode::<ServerMessage>(r#"{"method":"createResource","resource":{"type":"Class"}}"#)
            .expect_err("client method on server catalog");
        assert!(matches!(err, ProtocolError::UnknownMethod(_)));
    }

    #[test]
    fn missing_method_is_rejected() {
        let err = decode::<ServerMessage>(r#"{"state":{"ontologies":[]}}"#)
            .expect_err("frame without method");
        assert!(matches!(err, ProtocolError::MissingMethod));

        let err = decode::<ServerMessage>(r#"{"method":42}"#).expect_err("numeric method");
        assert!(matches!(err, ProtocolError::MissingMethod));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = decode::<ClientMessage>("{not json").expect_err("garbage");
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn known_method_with_bad_fields_reports_method() {
        let err = decode::<ServerMessage>(r#"{"method":"ontology","prefix":7}"#)
            .expect_err("bad payload");
        match err {
            ProtocolError::InvalidPayload { method, .. } => assert_eq!(method, "ontology"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn encode_uses_method_discriminator() {
        let frame = encode(&ClientMessage::Prefix {
            value: "ex".to_string(),
        })
        .expect("encode");
        let value: Value = serde_json::from_str(&frame).expect("json");
        assert_eq!(value["method"], "prefix");
        assert_eq!(value["value"], "ex");
    }
}
