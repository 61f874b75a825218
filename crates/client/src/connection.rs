//! Session Connection Manager
//!
//! Owns the single WebSocket of a session. One task runs the event loop:
//! inbound frames and UI intents are both fed through [`transition`], and
//! the resulting effects are executed here. The UI talks to the loop via a
//! cloneable [`SessionHandle`] and listens on a [`SessionEvent`] channel.
//! There is no reconnection: once the transport fails the loop ends.

use std::sync::Arc;

use arc_swap::ArcSwap;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use srdfse_protocol::{decode, encode, ClientMessage, ServerMessage};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, info, warn};

use crate::address::SessionAddress;
use crate::error::{ConnectionError, Violation};
use crate::transition::{transition, ClientState, ConnectionPhase, Effect, FormField, Input, Landing};

const INTENT_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// What the loop reports back to the UI
#[derive(Debug)]
pub enum SessionEvent {
    /// Socket open, `init` sent
    Connected,
    /// A full snapshot was applied
    Synced,
    FocusInput(FormField),
    Navigate(Landing),
    Rejected(Violation),
    Disconnected { reason: Option<String> },
}

/// Handle to a running session loop (cheap to Clone).
#[derive(Clone)]
pub struct SessionHandle {
    pub session_id: String,
    intent_tx: mpsc::Sender<Input>,
    snapshot: Arc<ArcSwap<ClientState>>,
}

impl SessionHandle {
    /// Queue an intent for the loop.
    pub async fn send(&self, input: Input) -> Result<(), ConnectionError> {
        self.intent_tx
            .send(input)
            .await
            .map_err(|_| ConnectionError::ChannelClosed)
    }

    /// Lock-free read of the latest state.
    pub fn snapshot(&self) -> Arc<ClientState> {
        self.snapshot.load_full()
    }

    pub fn is_running(&self) -> bool {
        !self.intent_tx.is_closed()
    }
}

/// A connected session: handle, event stream and the loop task
pub struct Session {
    pub handle: SessionHandle,
    pub events: mpsc::Receiver<SessionEvent>,
    pub task: JoinHandle<()>,
}

/// Open the session's WebSocket and start its loop.
pub async fn connect(address: &SessionAddress, lang: &str) -> Result<Session, ConnectionError> {
    let (socket, _response) = tokio_tungstenite::connect_async(address.websocket.as_str()).await?;
    info!(
        component = "connection",
        event = "ws.connection.opened",
        session_id = %address.session_id,
        url = %address.websocket,
        "WebSocket connection opened"
    );
    Ok(start(socket, ClientState::new(&address.session_id, lang)))
}

/// Start the loop over an already-open socket.
pub fn start<S>(socket: WebSocketStream<S>, state: ClientState) -> Session
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let snapshot = Arc::new(ArcSwap::from_pointee(state.clone()));
    let (intent_tx, intent_rx) = mpsc::channel(INTENT_BUFFER);
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let session_id = state.session_id.clone();

    let (sink, stream) = socket.split();
    let driver = Driver {
        sink,
        events: event_tx,
        snapshot: snapshot.clone(),
    };
    let task = tokio::spawn(run(driver, stream, intent_rx, state));

    Session {
        handle: SessionHandle {
            session_id,
            intent_tx,
            snapshot,
        },
        events: event_rx,
        task,
    }
}

struct Driver<S> {
    sink: SplitSink<WebSocketStream<S>, Message>,
    events: mpsc::Sender<SessionEvent>,
    snapshot: Arc<ArcSwap<ClientState>>,
}

impl<S> Driver<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event).await;
    }

    /// Run one input through the transition function and execute its effects.
    async fn step(&mut self, state: ClientState, input: Input) -> ClientState {
        let is_snapshot = matches!(input, Input::Received(ServerMessage::Init { .. }));
        let (mut state, effects) = transition(state, input);

        for effect in effects {
            match effect {
                Effect::Send(message) => {
                    if let Err(reason) = self.send_frame(&message).await {
                        let (next, _) = transition(
                            state,
                            Input::Disconnected {
                                reason: Some(reason.clone()),
                            },
                        );
                        state = next;
                        self.emit(SessionEvent::Disconnected {
                            reason: Some(reason),
                        })
                        .await;
                        break;
                    }
                }
                Effect::FocusInput(field) => self.emit(SessionEvent::FocusInput(field)).await,
                Effect::Navigate(landing) => {
                    info!(
                        component = "connection",
                        event = "session.closed",
                        session_id = %state.session_id,
                        landing = landing.path(),
                        "Session closed by server"
                    );
                    self.emit(SessionEvent::Navigate(landing)).await;
                }
                Effect::Rejected(violation) => {
                    warn!(
                        component = "connection",
                        event = "session.input.rejected",
                        session_id = %state.session_id,
                        code = violation.code(),
                        error = %violation,
                        "Input rejected"
                    );
                    self.emit(SessionEvent::Rejected(violation)).await;
                }
            }
        }

        if is_snapshot && state.phase == ConnectionPhase::Ready {
            self.emit(SessionEvent::Synced).await;
        }
        self.snapshot.store(Arc::new(state.clone()));
        state
    }

    /// Encode and write one request. `Err` carries a transport failure;
    /// encoding failures are reported as rejections instead.
    async fn send_frame(&mut self, message: &ClientMessage) -> Result<(), String> {
        let frame = match encode(message) {
            Ok(frame) => frame,
            Err(e) => {
                error!(
                    component = "connection",
                    event = "ws.send.serialize_failed",
                    error = %e,
                    "Failed to serialize client message"
                );
                self.emit(SessionEvent::Rejected(Violation::Protocol(e))).await;
                return Ok(());
            }
        };

        debug!(
            component = "connection",
            event = "ws.send",
            method = srdfse_protocol::Catalog::method(message),
            payload_bytes = frame.len(),
            "C: {frame}"
        );

        self.sink.send(Message::Text(frame.into())).await.map_err(|e| {
            warn!(
                component = "connection",
                event = "ws.send.failed",
                error = %e,
                "WebSocket send failed"
            );
            e.to_string()
        })
    }

    async fn disconnect(&mut self, state: ClientState, reason: Option<String>) -> ClientState {
        let state = self
            .step(
                state,
                Input::Disconnected {
                    reason: reason.clone(),
                },
            )
            .await;
        self.emit(SessionEvent::Disconnected { reason }).await;
        state
    }
}

async fn run<S>(
    mut driver: Driver<S>,
    mut stream: futures::stream::SplitStream<WebSocketStream<S>>,
    mut intents: mpsc::Receiver<Input>,
    state: ClientState,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    driver.emit(SessionEvent::Connected).await;
    let mut state = driver.step(state, Input::Opened).await;

    while state.is_connected() {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    debug!(
                        component = "connection",
                        event = "ws.receive",
                        payload_bytes = text.len(),
                        "S: {}",
                        text.as_str()
                    );
                    match decode::<ServerMessage>(text.as_str()) {
                        Ok(message) => state = driver.step(state, Input::Received(message)).await,
                        Err(e) => {
                            warn!(
                                component = "connection",
                                event = "ws.message.parse_failed",
                                session_id = %state.session_id,
                                error = %e,
                                "Failed to parse server message"
                            );
                            driver.emit(SessionEvent::Rejected(Violation::Protocol(e))).await;
                        }
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|r| !r.is_empty());
                    info!(
                        component = "connection",
                        event = "ws.connection.close_frame",
                        session_id = %state.session_id,
                        reason = ?reason,
                        "Server sent close frame"
                    );
                    state = driver.disconnect(state, reason).await;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(
                        component = "connection",
                        event = "ws.connection.error",
                        session_id = %state.session_id,
                        error = %e,
                        "WebSocket error"
                    );
                    state = driver.disconnect(state, Some(e.to_string())).await;
                }
                None => {
                    state = driver.disconnect(state, None).await;
                }
            },
            intent = intents.recv() => match intent {
                Some(input) => state = driver.step(state, input).await,
                None => {
                    debug!(
                        component = "connection",
                        event = "session.handles_dropped",
                        session_id = %state.session_id,
                        "All session handles dropped"
                    );
                    break;
                }
            },
        }
    }

    let _ = driver.sink.close().await;
    info!(
        component = "connection",
        event = "ws.connection.closed",
        session_id = %state.session_id,
        phase = ?state.phase,
        "WebSocket connection closed"
    );
}
