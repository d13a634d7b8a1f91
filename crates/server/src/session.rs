//! Per-match state machine.
//!
//! A session moves through `AwaitingMove` (repeated) into one of the terminal
//! states `Won` or `Drawn`. Terminal sessions stay allocated until one of
//! their players disconnects, and keep rejecting moves until then.

use dropline_board::{Board, Placement, PlacementError, PlayerNumber};

/// Session identifier (server-internal).
pub type SessionId = u64;

/// Connection identity supplied by the transport.
pub type ConnectionId = u64;

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    AwaitingMove,
    Won(PlayerNumber),
    Drawn,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::AwaitingMove)
    }
}

/// Why a submitted move was refused.
///
/// Display text is the reason sent back to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("You are not in an active game.")]
    NotInGame,

    #[error("It is not your turn.")]
    WrongTurn,

    #[error("You are not the correct player for this turn.")]
    WrongPlayer,

    #[error("Column is full or invalid.")]
    InvalidColumn,

    #[error("The game is already over.")]
    GameOver,
}

/// Failure while applying a move that had already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("placement failed after validation: {0}")]
    Placement(#[from] PlacementError),
}

/// Result of a move that was applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Continued { next_turn: PlayerNumber },
    Won(PlayerNumber),
    Drawn,
}

/// Result of submitting a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Applied(MoveOutcome),
    Rejected(Rejection),
}

/// State of one match between two connections.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    board: Board,
    player_one: ConnectionId,
    player_two: ConnectionId,
    turn: PlayerNumber,
    last_placement: Option<Placement>,
    status: SessionStatus,
    moves_applied: u32,
}

impl Session {
    /// Create a new session. Player one moves first.
    pub fn new(id: SessionId, player_one: ConnectionId, player_two: ConnectionId) -> Self {
        debug_assert_ne!(player_one, player_two, "a connection cannot play itself");
        Self {
            id,
            board: Board::new(),
            player_one,
            player_two,
            turn: PlayerNumber::One,
            last_placement: None,
            status: SessionStatus::AwaitingMove,
            moves_applied: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> PlayerNumber {
        self.turn
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn last_placement(&self) -> Option<Placement> {
        self.last_placement
    }

    pub fn moves_applied(&self) -> u32 {
        self.moves_applied
    }

    /// Connection bound to `player`.
    pub fn connection(&self, player: PlayerNumber) -> ConnectionId {
        match player {
            PlayerNumber::One => self.player_one,
            PlayerNumber::Two => self.player_two,
        }
    }

    /// Both participants, player one first.
    pub fn connections(&self) -> [(PlayerNumber, ConnectionId); 2] {
        [
            (PlayerNumber::One, self.player_one),
            (PlayerNumber::Two, self.player_two),
        ]
    }

    /// Seat held by `connection`, if it plays in this session.
    pub fn player_of(&self, connection: ConnectionId) -> Option<PlayerNumber> {
        if connection == self.player_one {
            Some(PlayerNumber::One)
        } else if connection == self.player_two {
            Some(PlayerNumber::Two)
        } else {
            None
        }
    }

    /// The other participant.
    pub fn opponent_of(&self, connection: ConnectionId) -> Option<ConnectionId> {
        self.player_of(connection)
            .map(|player| self.connection(player.other()))
    }

    /// Validate and apply a move.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. claimed player must hold the turn (`WrongTurn`)
    /// 2. submitter must be bound to the claimed player (`WrongPlayer`)
    /// 3. column must accept a piece (`InvalidColumn`)
    /// 4. session must not have ended (`GameOver`)
    ///
    /// `NotInGame` is decided by the caller, which owns the connection to
    /// session binding. A rejection never mutates the session, and neither
    /// does an `Err`.
    ///
    /// `claimed_player` is the raw wire value; anything other than 1 or 2
    /// can never hold the turn. `column` is `None` when the wire value does
    /// not fit the board's index type.
    pub fn submit_move(
        &mut self,
        submitter: ConnectionId,
        claimed_player: u32,
        column: Option<usize>,
    ) -> Result<MoveResult, SessionError> {
        let Some(player) = PlayerNumber::from_u32(claimed_player).filter(|&p| p == self.turn)
        else {
            return Ok(MoveResult::Rejected(Rejection::WrongTurn));
        };

        if self.connection(player) != submitter {
            return Ok(MoveResult::Rejected(Rejection::WrongPlayer));
        }

        let Some(column) = column.filter(|&col| self.board.is_valid_move(col)) else {
            return Ok(MoveResult::Rejected(Rejection::InvalidColumn));
        };

        if self.status.is_terminal() {
            return Ok(MoveResult::Rejected(Rejection::GameOver));
        }

        let placement = self.board.make_move(column, player)?;
        self.last_placement = Some(placement);
        self.moves_applied += 1;

        let outcome = if self.board.check_win(player, placement) {
            self.status = SessionStatus::Won(player);
            MoveOutcome::Won(player)
        } else if self.board.is_full() {
            self.status = SessionStatus::Drawn;
            MoveOutcome::Drawn
        } else {
            self.turn = player.other();
            MoveOutcome::Continued {
                next_turn: self.turn,
            }
        };

        Ok(MoveResult::Applied(outcome))
    }
}
