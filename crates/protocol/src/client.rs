//! Client → Server messages

use serde::{Deserialize, Serialize};

use crate::types::{Field, HashCode, PropertyFacet, Resource, ResourceRef, TreeType};
use crate::Catalog;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    // Handshake
    Init {
        session_id: String,
    },

    // Primary ontology settings
    Prefix {
        value: String,
    },
    Uri {
        value: String,
    },

    // Resource lifecycle
    CreateResource {
        resource: Resource,
    },
    Changed {
        resource: Resource,
        what: Field,
        lang: String,
    },
    RemoveResource {
        resource: ResourceRef,
    },
    Reset {
        what: PropertyFacet,
        hash_code: HashCode,
    },

    // Vocabulary
    ImportPreset {
        preset: String,
    },

    // Trees
    DragAndDrop {
        src_tree_type: TreeType,
        src_hash_code: HashCode,
        dst_tree_type: TreeType,
        dst_hash_code: HashCode,
    },
}

impl Catalog for ClientMessage {
    const METHODS: &'static [&'static str] = &[
        "init",
        "prefix",
        "uri",
        "createResource",
        "changed",
        "removeResource",
        "reset",
        "importPreset",
        "dragAndDrop",
    ];

    fn method(&self) -> &'static str {
        match self {
            ClientMessage::Init { .. } => "init",
            ClientMessage::Prefix { .. } => "prefix",
            ClientMessage::Uri { .. } => "uri",
            ClientMessage::CreateResource { .. } => "createResource",
            ClientMessage::Changed { .. } => "changed",
            ClientMessage::RemoveResource { .. } => "removeResource",
            ClientMessage::Reset { .. } => "reset",
            ClientMessage::ImportPreset { .. } => "importPreset",
            ClientMessage::DragAndDrop { .. } => "dragAndDrop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientMessage;
    use crate::types::*;
    use crate::{decode, Catalog};

    #[test]
    fn init_carries_session_id() {
        let json = serde_json::to_value(ClientMessage::Init {
            session_id: "AbC123xy".to_string(),
        })
        .expect("serialize");
        assert_eq!(json, serde_json::json!({"method": "init", "sessionId": "AbC123xy"}));
    }

    #[test]
    fn create_resource_sends_draft_without_hash_code() {
        let mut draft = Resource::draft(ResourceType::Class);
        draft.localname = "NetworkDevice".to_string();
        draft.label.insert("en".to_string(), "Network Device".to_string());

        let json = serde_json::to_value(ClientMessage::CreateResource { resource: draft })
            .expect("serialize");
        assert_eq!(json["method"], "createResource");
        assert_eq!(json["resource"]["type"], "Class");
        assert_eq!(json["resource"]["localname"], "NetworkDevice");
        assert_eq!(json["resource"]["label"]["en"], "Network Device");
        assert!(json["resource"].get("hashCode").is_none());
    }

    #[test]
    fn changed_names_field_and_language() {
        let json = r#"{
          "method":"changed",
          "resource":{"hashCode":42,"type":"Class","localname":"NetworkDevice","label":{"en":"Net"},"comment":{}},
          "what":"label",
          "lang":"en"
        }"#;

        let parsed: ClientMessage = decode(json).expect("parse changed");
        match &parsed {
            ClientMessage::Changed { resource, what, lang } => {
                assert_eq!(resource.hash_code, Some(HashCode(42)));
                assert_eq!(*what, Field::Label);
                assert_eq!(lang, "en");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
        assert_eq!(parsed.method(), "changed");
    }

    #[test]
    fn drag_and_drop_uses_camel_case_endpoints() {
        let msg = ClientMessage::DragAndDrop {
            src_tree_type: TreeType::Property,
            src_hash_code: HashCode(5),
            dst_tree_type: TreeType::Class,
            dst_hash_code: HashCode(-17),
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "method": "dragAndDrop",
                "srcTreeType": "property",
                "srcHashCode": 5,
                "dstTreeType": "class",
                "dstHashCode": -17
            })
        );
    }

    #[test]
    fn reset_and_remove_carry_identity_only() {
        let reset = serde_json::to_value(ClientMessage::Reset {
            what: PropertyFacet::Domain,
            hash_code: HashCode(9),
        })
        .expect("serialize");
        assert_eq!(reset, serde_json::json!({"method": "reset", "what": "Domain", "hashCode": 9}));

        let remove = serde_json::to_value(ClientMessage::RemoveResource {
            resource: ResourceRef { hash_code: HashCode(9) },
        })
        .expect("serialize");
        assert_eq!(
            remove,
            serde_json::json!({"method": "removeResource", "resource": {"hashCode": 9}})
        );
    }

    #[test]
    fn every_variant_reports_a_listed_method() {
        let samples = [
            ClientMessage::Prefix { value: "ex".into() },
            ClientMessage::Uri { value: "http://ex.org/".into() },
            ClientMessage::ImportPreset { preset: Preset::Foaf.path().into() },
        ];
        for msg in samples {
            assert!(ClientMessage::METHODS.contains(&msg.method()));
            let json = serde_json::to_value(&msg).expect("serialize");
            assert_eq!(json["method"], msg.method());
        }
    }
}
