//! Pure state transition function
//!
//! Every state change of an editing session goes through
//! `transition(state, input) -> (state, effects)`: transport events,
//! server pushes and user intents alike. No IO, no async; the connection
//! loop executes the returned effects.

use srdfse_protocol::{
    ClientMessage, Field, OntologySet, PropertyFacet, Resource, ResourceRef, ResourceType,
    ServerMessage,
};

use crate::error::Violation;
use crate::lifecycle::Focus;
use crate::reparent::{complete_drop, DragToken, DropTarget};

// ---------------------------------------------------------------------------
// ClientState: explicit application state of one session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Socket not yet open
    Connecting,
    /// Socket open and `init` sent, snapshot not yet received
    Open,
    /// Snapshot received; requests may be sent
    Ready,
    /// Transport closed or failed. Terminal for this connection.
    Disconnected,
    /// Server destroyed the session. Terminal.
    Closed,
}

#[derive(Debug, Clone)]
pub struct ClientState {
    pub session_id: String,
    /// Language code that label/comment edits and `changed` requests use
    pub lang: String,
    pub phase: ConnectionPhase,
    pub ontologies: Option<OntologySet>,
    pub focus: Focus,
}

impl ClientState {
    pub fn new(session_id: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            lang: lang.into(),
            phase: ConnectionPhase::Connecting,
            ontologies: None,
            focus: Focus::draft(ResourceType::Class),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.phase, ConnectionPhase::Open | ConnectionPhase::Ready)
    }

    fn ensure_ready(&self) -> Result<(), Violation> {
        match self.phase {
            ConnectionPhase::Ready => Ok(()),
            ConnectionPhase::Open => Err(Violation::NotReady),
            ConnectionPhase::Connecting | ConnectionPhase::Disconnected => {
                Err(Violation::Disconnected)
            }
            ConnectionPhase::Closed => Err(Violation::SessionClosed),
        }
    }
}

// ---------------------------------------------------------------------------
// Input: everything the reducer consumes
// ---------------------------------------------------------------------------

/// What a remove request points at
#[derive(Debug, Clone)]
pub enum RemoveTarget {
    Focused,
    Resource(Resource),
    /// Ontology root by position in the snapshot
    Ontology(usize),
}

#[derive(Debug, Clone)]
pub enum Input {
    // Transport
    Opened,
    Disconnected {
        reason: Option<String>,
    },
    Received(ServerMessage),

    // Local-only intents
    NewResource(ResourceType),
    Focus(Resource),
    Edit {
        field: Field,
        value: String,
    },
    SetLang(String),

    // Intents that produce requests
    CreateResource,
    Changed(Field),
    Reset(PropertyFacet),
    Remove(RemoveTarget),
    SetPrefix(String),
    SetUri(String),
    ImportPreset(String),
    Drop {
        token: DragToken,
        target: DropTarget,
    },
}

// ---------------------------------------------------------------------------
// Effects: describe IO to be executed by the caller
// ---------------------------------------------------------------------------

/// Form input that should receive keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Label,
    Comment,
}

/// Where the client goes once the editing view is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    SessionClosed,
}

impl Landing {
    pub fn path(self) -> &'static str {
        match self {
            Landing::SessionClosed => "/?session_closed",
        }
    }
}

#[derive(Debug)]
pub enum Effect {
    Send(Box<ClientMessage>),
    FocusInput(FormField),
    Navigate(Landing),
    Rejected(Violation),
}

fn send(message: ClientMessage) -> Vec<Effect> {
    vec![Effect::Send(Box::new(message))]
}

// ---------------------------------------------------------------------------
// transition(): the pure core
// ---------------------------------------------------------------------------

/// Pure, synchronous state transition.
///
/// A refused input yields a single `Effect::Rejected` and leaves the state
/// exactly as it was.
pub fn transition(mut state: ClientState, input: Input) -> (ClientState, Vec<Effect>) {
    let outcome = match input {
        // -- Transport --------------------------------------------------------
        Input::Opened => {
            state.phase = ConnectionPhase::Open;
            Ok(send(ClientMessage::Init {
                session_id: state.session_id.clone(),
            }))
        }

        Input::Disconnected { .. } => {
            if state.phase != ConnectionPhase::Closed {
                state.phase = ConnectionPhase::Disconnected;
            }
            Ok(Vec::new())
        }

        Input::Received(message) => receive(&mut state, message),

        // -- Local intents ----------------------------------------------------
        Input::NewResource(resource_type) => {
            state.focus = Focus::draft(resource_type);
            Ok(vec![Effect::FocusInput(FormField::Label)])
        }

        Input::Focus(resource) => {
            state.focus = Focus::of(resource);
            Ok(Vec::new())
        }

        Input::Edit { field, value } => state
            .focus
            .edit(field, &state.lang, &value)
            .map(|_| Vec::new()),

        Input::SetLang(lang) => {
            state.lang = lang;
            Ok(Vec::new())
        }

        // -- Requests ---------------------------------------------------------
        Input::CreateResource => state
            .ensure_ready()
            .and_then(|_| state.focus.create_request())
            .map(send),

        Input::Changed(field) => state
            .ensure_ready()
            .and_then(|_| state.focus.change_request(field, &state.lang))
            .map(send),

        Input::Reset(facet) => state
            .ensure_ready()
            .and_then(|_| state.focus.reset_request(facet))
            .map(send),

        Input::Remove(target) => state
            .ensure_ready()
            .and_then(|_| removal(&state, &target))
            .map(|resource| send(ClientMessage::RemoveResource { resource })),

        Input::SetPrefix(value) => set_primary(&mut state, value, |onto, v| {
            onto.prefix = v.clone();
            ClientMessage::Prefix { value: v }
        }),

        Input::SetUri(value) => set_primary(&mut state, value, |onto, v| {
            onto.uri = v.clone();
            ClientMessage::Uri { value: v }
        }),

        Input::ImportPreset(preset) => state
            .ensure_ready()
            .map(|_| send(ClientMessage::ImportPreset { preset })),

        Input::Drop { token, target } => state
            .ensure_ready()
            .map(|_| send(complete_drop(token, target))),
    };

    let effects = match outcome {
        Ok(effects) => effects,
        Err(violation) => vec![Effect::Rejected(violation)],
    };
    (state, effects)
}

fn receive(state: &mut ClientState, message: ServerMessage) -> Result<Vec<Effect>, Violation> {
    if state.phase == ConnectionPhase::Closed {
        return Err(Violation::Unexpected {
            method: srdfse_protocol::Catalog::method(&message),
            reason: "session already closed",
        });
    }

    match message {
        ServerMessage::Init { state: snapshot } => {
            state.ontologies = Some(snapshot);
            state.phase = ConnectionPhase::Ready;
            Ok(Vec::new())
        }

        // No correlation with an outstanding createResource: whatever the
        // server reports as created becomes the focus.
        ServerMessage::Created { resource } => {
            if resource.hash_code.is_none() {
                return Err(Violation::Unexpected {
                    method: "created",
                    reason: "resource has no hashCode",
                });
            }
            state.focus = Focus::of(resource);
            Ok(vec![Effect::FocusInput(FormField::Comment)])
        }

        ServerMessage::Ontology { prefix, uri } => {
            let primary = state
                .ontologies
                .as_mut()
                .and_then(OntologySet::primary_mut)
                .ok_or(Violation::Unexpected {
                    method: "ontology",
                    reason: "no ontology snapshot to patch",
                })?;
            primary.prefix = prefix;
            primary.uri = uri;
            Ok(Vec::new())
        }

        ServerMessage::Removed { resource } => {
            if state.focus.on_removed(resource.hash_code) {
                Ok(vec![Effect::FocusInput(FormField::Label)])
            } else {
                Ok(Vec::new())
            }
        }

        ServerMessage::Closed => {
            state.phase = ConnectionPhase::Closed;
            Ok(vec![Effect::Navigate(Landing::SessionClosed)])
        }
    }
}

fn removal(state: &ClientState, target: &RemoveTarget) -> Result<ResourceRef, Violation> {
    let not_persisted = Violation::NotPersisted {
        action: "removeResource",
    };
    match target {
        RemoveTarget::Focused => state.focus.resource().reference().ok_or(not_persisted),
        RemoveTarget::Resource(resource) => resource.reference().ok_or(not_persisted),
        RemoveTarget::Ontology(index) => {
            let onto = state
                .ontologies
                .as_ref()
                .and_then(|set| set.ontologies.get(*index))
                .ok_or(Violation::UnknownOntology(*index))?;
            onto.hash_code
                .map(|hash_code| ResourceRef { hash_code })
                .ok_or(not_persisted)
        }
    }
}

fn set_primary(
    state: &mut ClientState,
    value: String,
    apply: impl FnOnce(&mut srdfse_protocol::Ontology, String) -> ClientMessage,
) -> Result<Vec<Effect>, Violation> {
    state.ensure_ready()?;
    let primary = state
        .ontologies
        .as_mut()
        .and_then(OntologySet::primary_mut)
        .ok_or(Violation::NoPrimaryOntology)?;
    Ok(send(apply(primary, value)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
