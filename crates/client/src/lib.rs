//! sRDFSe session client
//!
//! Client side of a collaborative RDFS editing session: the naming codec,
//! the focused-resource lifecycle, tree reparenting, and the connection
//! manager that keeps local state in sync with the server over WebSocket.
//! Everything that changes state flows through [`transition::transition`].

pub mod address;
pub mod connection;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod naming;
pub mod reparent;
pub mod transition;

pub use address::SessionAddress;
pub use connection::{connect, Session, SessionEvent, SessionHandle};
pub use error::{ConnectionError, HttpError, Violation};
pub use http::{CloseOutcome, Confirm, SessionApi};
pub use lifecycle::{Focus, Phase};
pub use reparent::{begin_drag, complete_drop, DragToken, DropTarget, TreeNode};
pub use transition::{
    transition, ClientState, ConnectionPhase, Effect, FormField, Input, Landing, RemoveTarget,
};
