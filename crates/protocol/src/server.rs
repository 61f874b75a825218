//! Server → Client messages

use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::Catalog;

/// Messages pushed from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    // Full state sync
    Init {
        state: OntologySet,
    },

    // Acknowledgements
    Created {
        resource: Resource,
    },
    Removed {
        resource: ResourceRef,
    },

    // Primary ontology settings
    Ontology {
        prefix: String,
        uri: String,
    },

    // Lifecycle
    Closed,
}

impl Catalog for ServerMessage {
    const METHODS: &'static [&'static str] = &["init", "created", "removed", "ontology", "closed"];

    fn method(&self) -> &'static str {
        match self {
            ServerMessage::Init { .. } => "init",
            ServerMessage::Created { .. } => "created",
            ServerMessage::Removed { .. } => "removed",
            ServerMessage::Ontology { .. } => "ontology",
            ServerMessage::Closed => "closed",
        }
    }
}
