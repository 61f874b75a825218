//! Client-side error types

use srdfse_protocol::{Field, HashCode, ProtocolError};
use thiserror::Error;

/// Why an input was refused. A refused input never changes local state
/// and never reaches the wire.
#[derive(Debug, Error)]
pub enum Violation {
    #[error("connection is not open")]
    Disconnected,

    #[error("initial state has not arrived yet")]
    NotReady,

    #[error("session has been closed")]
    SessionClosed,

    #[error("`{action}` requires a draft resource")]
    NotDraft { action: &'static str },

    #[error("`{action}` requires a persisted resource")]
    NotPersisted { action: &'static str },

    #[error("a create request for this draft is already in flight")]
    CreateInFlight,

    #[error("the local name of a persisted resource cannot change")]
    LocalnameImmutable,

    #[error("`{field}` cannot be sent as a change", field = .0.as_str())]
    UnchangeableField(Field),

    #[error("resources of imported ontologies are read-only")]
    ReadOnly,

    #[error("only properties have resettable facets")]
    NotAProperty,

    #[error("no primary ontology to edit")]
    NoPrimaryOntology,

    #[error("no ontology at index {0}")]
    UnknownOntology(usize),

    #[error("no resource with hashCode {0}")]
    UnknownResource(HashCode),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("unexpected `{method}` message: {reason}")]
    Unexpected {
        method: &'static str,
        reason: &'static str,
    },
}

impl Violation {
    /// Stable machine-readable code, for logs and UI
    pub fn code(&self) -> &'static str {
        match self {
            Violation::Disconnected => "disconnected",
            Violation::NotReady => "not_ready",
            Violation::SessionClosed => "session_closed",
            Violation::NotDraft { .. } => "not_draft",
            Violation::NotPersisted { .. } => "not_persisted",
            Violation::CreateInFlight => "create_in_flight",
            Violation::LocalnameImmutable => "localname_immutable",
            Violation::UnchangeableField(_) => "unchangeable_field",
            Violation::ReadOnly => "read_only",
            Violation::NotAProperty => "not_a_property",
            Violation::NoPrimaryOntology => "no_primary_ontology",
            Violation::UnknownOntology(_) => "unknown_ontology",
            Violation::UnknownResource(_) => "unknown_resource",
            Violation::Protocol(_) => "protocol_error",
            Violation::Unexpected { .. } => "unexpected_message",
        }
    }
}

/// Failures of the session transport
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid session address: {0}")]
    InvalidAddress(String),

    #[error("Session loop has stopped")]
    ChannelClosed,
}

/// Failures of the one-shot HTTP requests
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read upload file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("No session redirect from {0}")]
    MissingRedirect(String),

    #[error(transparent)]
    Address(#[from] ConnectionError),

    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}
