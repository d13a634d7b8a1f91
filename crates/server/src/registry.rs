//! Session registry.
//!
//! Owns every live session and the connection → session binding used to
//! route moves and disconnects.

use std::collections::HashMap;

use crate::session::{ConnectionId, Session, SessionId};

/// Live sessions keyed by id, plus the binding of each participant.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    /// ConnectionId → SessionId mapping
    bindings: HashMap<ConnectionId, SessionId>,
    next_session_id: SessionId,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            bindings: HashMap::new(),
            next_session_id: 1,
        }
    }

    /// Create a session for two unpaired connections and bind both to it.
    pub fn create(&mut self, player_one: ConnectionId, player_two: ConnectionId) -> &Session {
        let session_id = self.next_session_id;
        self.next_session_id += 1;

        self.bindings.insert(player_one, session_id);
        self.bindings.insert(player_two, session_id);

        self.sessions
            .entry(session_id)
            .or_insert_with(|| Session::new(session_id, player_one, player_two))
    }

    /// Session id bound to `conn`, if any.
    pub fn session_id_of(&self, conn: ConnectionId) -> Option<SessionId> {
        self.bindings.get(&conn).copied()
    }

    /// Session `conn` currently plays in.
    pub fn get(&self, conn: ConnectionId) -> Option<&Session> {
        self.session_id_of(conn)
            .and_then(|id| self.sessions.get(&id))
    }

    pub fn get_mut(&mut self, conn: ConnectionId) -> Option<&mut Session> {
        let id = self.session_id_of(conn)?;
        self.sessions.get_mut(&id)
    }

    /// Delete a session and both of its bindings. Idempotent.
    pub fn remove(&mut self, session_id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&session_id)?;
        for (_, conn) in session.connections() {
            self.bindings.remove(&conn);
        }
        Some(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
