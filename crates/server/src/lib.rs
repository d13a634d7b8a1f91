//! Dropline Session Server
//!
//! The session server pairs anonymous connections into four-in-a-row matches
//! and holds the authoritative state of every match. It owns:
//! - The FIFO matchmaking queue
//! - The session registry (session id → state, connection → session id)
//! - The per-session move state machine
//! - Notification dispatch
//!
//! # Architecture
//!
//! The server performs no I/O. A transport feeds it one [`InboundEvent`] at a
//! time and delivers the returned [`Outbound`] messages. Every event runs to
//! completion through `&mut Server`, so events are serialized and no two
//! moves on the same session can interleave. A multi-threaded transport
//! drives the server from a single task or wraps it in one lock.
//!
//! Nothing that happens while handling an event is fatal: bad input becomes
//! an `InvalidMove`, internal failures become a `ServerError`, and unknown
//! connections are ignored.

#![deny(unsafe_code)]

pub mod dispatch;
pub mod matchmaking;
pub mod registry;
pub mod session;

use dropline_wire::{ClientMessage, MakeMove, client_message};
use prost::Message;
use tracing::{debug, error, info, warn};

pub use dispatch::Outbound;
use matchmaking::MatchQueue;
use registry::SessionRegistry;
pub use session::{ConnectionId, SessionId};
use session::{MoveResult, Rejection, Session};

// ============================================================================
// Parameters
// ============================================================================

/// Remove finished sessions only when a participant disconnects.
pub const REAP_FINISHED_SESSIONS: bool = false;

// ============================================================================
// Inbound Events
// ============================================================================

/// Everything the transport can report about a connection.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Connect(ConnectionId),
    SubmitMove(ConnectionId, MakeMove),
    Disconnect(ConnectionId),
}

// ============================================================================
// Server State
// ============================================================================

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Drop a session from the registry as soon as a move ends it, instead
    /// of waiting for a participant to disconnect.
    pub reap_finished_sessions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            reap_finished_sessions: REAP_FINISHED_SESSIONS,
        }
    }
}

/// Matchmaking and session state for one process.
#[derive(Debug, Default)]
pub struct Server {
    config: ServerConfig,
    queue: MatchQueue,
    registry: SessionRegistry,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            queue: MatchQueue::new(),
            registry: SessionRegistry::new(),
        }
    }

    /// Number of live sessions, finished ones included.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of connections waiting for an opponent.
    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    /// Session `conn` currently plays in.
    pub fn session_for(&self, conn: ConnectionId) -> Option<&Session> {
        self.registry.get(conn)
    }

    /// Handle one inbound event.
    pub fn handle(&mut self, event: InboundEvent) -> Vec<Outbound> {
        match event {
            InboundEvent::Connect(conn) => self.connect(conn),
            InboundEvent::SubmitMove(conn, request) => self.submit_move(conn, request),
            InboundEvent::Disconnect(conn) => self.disconnect(conn),
        }
    }

    /// A connection arrived: pair it with the longest-waiting connection or
    /// queue it.
    pub fn connect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let Some(pairing) = self.queue.on_arrival(conn) else {
            debug!(connection = conn, waiting = self.queue.len(), "queued for matchmaking");
            return Vec::new();
        };

        let session = self.registry.create(pairing.player_one, pairing.player_two);
        info!(
            session_id = session.id,
            player_one = pairing.player_one,
            player_two = pairing.player_two,
            "game started"
        );
        dispatch::game_start(session)
    }

    /// Decode a client frame and handle the request it carries.
    ///
    /// Undecodable frames are answered with a `ServerError` and change
    /// nothing.
    pub fn submit_move_bytes(&mut self, conn: ConnectionId, frame: &[u8]) -> Vec<Outbound> {
        match ClientMessage::decode(frame) {
            Ok(ClientMessage {
                payload: Some(client_message::Payload::MakeMove(request)),
            }) => self.submit_move(conn, request),
            Ok(ClientMessage { payload: None }) => {
                warn!(connection = conn, "client message without payload");
                vec![dispatch::server_error(conn, dispatch::MALFORMED_MESSAGE)]
            }
            Err(err) => {
                warn!(connection = conn, error = %err, "failed to decode client message");
                vec![dispatch::server_error(conn, dispatch::MALFORMED_MESSAGE)]
            }
        }
    }

    /// Validate and apply a move request.
    pub fn submit_move(&mut self, conn: ConnectionId, request: MakeMove) -> Vec<Outbound> {
        let Some(session) = self.registry.get_mut(conn) else {
            debug!(connection = conn, "move from connection without a session");
            return vec![dispatch::invalid_move(conn, Rejection::NotInGame)];
        };

        // Negative columns cannot index the board
        let column = usize::try_from(request.column).ok();

        let outcome = match session.submit_move(conn, request.player, column) {
            Ok(MoveResult::Applied(outcome)) => outcome,
            Ok(MoveResult::Rejected(rejection)) => {
                debug!(
                    session_id = session.id,
                    connection = conn,
                    player = request.player,
                    column = request.column,
                    %rejection,
                    "move rejected"
                );
                return vec![dispatch::invalid_move(conn, rejection)];
            }
            Err(err) => {
                error!(
                    session_id = session.id,
                    connection = conn,
                    column = request.column,
                    error = %err,
                    "failed to apply validated move"
                );
                return vec![dispatch::server_error(conn, dispatch::MOVE_FAILED_MESSAGE)];
            }
        };

        debug!(
            session_id = session.id,
            player = request.player,
            column = request.column,
            move_number = session.moves_applied(),
            ?outcome,
            "move applied"
        );

        let out = dispatch::move_applied(session, outcome);
        let status = session.status();
        let session_id = session.id;

        if status.is_terminal() {
            info!(session_id, ?status, "game over");
            if self.config.reap_finished_sessions {
                self.registry.remove(session_id);
                debug!(session_id, "finished session reaped");
            }
        }

        out
    }

    /// A connection went away: leave the queue, end its session, and tell the
    /// opponent.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        if self.queue.on_departure(conn) {
            debug!(connection = conn, "left matchmaking queue");
        }

        let Some(session_id) = self.registry.session_id_of(conn) else {
            debug!(connection = conn, "disconnect without a session");
            return Vec::new();
        };

        let Some(session) = self.registry.remove(session_id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        if let Some(opponent) = session.opponent_of(conn) {
            out.push(dispatch::opponent_disconnected(opponent));
        }
        info!(
            session_id,
            connection = conn,
            status = ?session.status(),
            "session ended by disconnect"
        );

        out
    }
}

// ============================================================================
// Tests
// ============================================================================
