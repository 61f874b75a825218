//! Lifecycle of the focused resource.
//!
//! Exactly one resource is bound to the editing form. Its phase is derived
//! from data rather than stored: a `hashCode` means `Persisted`, no
//! `hashCode` with a create request outstanding means `PendingCreate`,
//! anything else is a `Draft`. `Removed` is never observable because a
//! removal immediately substitutes a fresh draft of the same type.

use srdfse_protocol::{
    ClientMessage, Field, HashCode, PropertyFacet, Resource, ResourceType,
};

use crate::error::Violation;
use crate::naming::{decode_local_name, encode_local_name, to_label, to_local_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Draft,
    PendingCreate,
    Persisted,
}

/// The resource bound to the editing form
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    resource: Resource,
    create_in_flight: bool,
}

impl Focus {
    /// Empty draft of `resource_type`
    pub fn draft(resource_type: ResourceType) -> Self {
        Self {
            resource: Resource::draft(resource_type),
            create_in_flight: false,
        }
    }

    /// Bind an existing resource (from a tree or a `created` push)
    pub fn of(resource: Resource) -> Self {
        Self {
            resource,
            create_in_flight: false,
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource.resource_type
    }

    pub fn hash_code(&self) -> Option<HashCode> {
        self.resource.hash_code
    }

    pub fn phase(&self) -> Phase {
        match (self.resource.hash_code, self.create_in_flight) {
            (Some(_), _) => Phase::Persisted,
            (None, true) => Phase::PendingCreate,
            (None, false) => Phase::Draft,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.resource.is_draft()
    }

    /// Resources of imported ontologies are shown but never edited.
    pub fn is_read_only(&self) -> bool {
        self.resource.imported
    }

    fn ensure_writable(&self) -> Result<(), Violation> {
        if self.is_read_only() {
            Err(Violation::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Store typed text for `field` and, while still a draft, derive the
    /// sibling field: label → local name, local name → label.
    pub fn edit(&mut self, field: Field, lang: &str, value: &str) -> Result<(), Violation> {
        self.ensure_writable()?;
        match field {
            Field::Localname if !self.is_draft() => return Err(Violation::LocalnameImmutable),
            Field::Localname => self.resource.localname = value.to_string(),
            Field::Label => {
                self.resource.label.insert(lang.to_string(), value.to_string());
            }
            Field::Comment => {
                self.resource.comment.insert(lang.to_string(), value.to_string());
            }
        }

        if self.is_draft() {
            self.derive(field, lang);
        }
        Ok(())
    }

    fn derive(&mut self, from: Field, lang: &str) {
        match from {
            Field::Label => {
                let label = self.resource.label.get(lang).map(String::as_str).unwrap_or("");
                let local = to_local_name(label, self.resource_type().capitalizes_local_name());
                self.resource.localname = encode_local_name(&local);
            }
            Field::Localname => {
                let decoded = decode_local_name(&self.resource.localname);
                self.resource.label.insert(lang.to_string(), to_label(&decoded));
            }
            Field::Comment => {}
        }
    }

    /// `createResource` for the current draft; marks the create in flight.
    pub fn create_request(&mut self) -> Result<ClientMessage, Violation> {
        match self.phase() {
            Phase::Persisted => Err(Violation::NotDraft {
                action: "createResource",
            }),
            Phase::PendingCreate => Err(Violation::CreateInFlight),
            Phase::Draft => {
                self.create_in_flight = true;
                Ok(ClientMessage::CreateResource {
                    resource: self.resource.clone(),
                })
            }
        }
    }

    /// `changed` for one field of the persisted resource
    pub fn change_request(&self, field: Field, lang: &str) -> Result<ClientMessage, Violation> {
        if self.is_draft() {
            return Err(Violation::NotPersisted { action: "changed" });
        }
        self.ensure_writable()?;
        if field == Field::Localname {
            return Err(Violation::UnchangeableField(field));
        }
        Ok(ClientMessage::Changed {
            resource: self.resource.clone(),
            what: field,
            lang: lang.to_string(),
        })
    }

    /// `reset` of a property facet
    pub fn reset_request(&self, facet: PropertyFacet) -> Result<ClientMessage, Violation> {
        let hash_code = self
            .hash_code()
            .ok_or(Violation::NotPersisted { action: "reset" })?;
        self.ensure_writable()?;
        if self.resource_type() != ResourceType::Property {
            return Err(Violation::NotAProperty);
        }
        Ok(ClientMessage::Reset {
            what: facet,
            hash_code,
        })
    }

    /// Apply a `removed` push. Returns true when the focused resource was
    /// the one removed and focus fell back to a fresh draft.
    pub fn on_removed(&mut self, removed: HashCode) -> bool {
        if self.hash_code() != Some(removed) {
            return false;
        }
        *self = Focus::draft(self.resource_type());
        true
    }
}
