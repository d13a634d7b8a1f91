//! Dropline Wire Protocol Types
//!
//! This crate defines the shared Protobuf message types exchanged between a
//! game client and the session server. Any transport that carries Dropline
//! traffic frames exactly one `ClientMessage` or `ServerMessage` per frame.
//!
//! # Message Categories
//!
//! - **Client → Server**: `ClientMessage` envelope carrying a `MakeMove`.
//! - **Server → Client**: `ServerMessage` envelope carrying one of the game
//!   lifecycle notifications (`GameStart`, `MoveMade`, `GameOver`,
//!   `InvalidMove`, `OpponentDisconnected`, `ServerError`).
//!
//! Connect and disconnect are transport events, not messages.

#![deny(unsafe_code)]

use dropline_board::{Board, COLS, ROWS};
use prost::Message;

// ============================================================================
// Shared Types
// ============================================================================

/// Full board state, row-major with row 0 (the top row) first.
///
/// Cell values: 0 = empty, 1 = player one, 2 = player two.
#[derive(Clone, PartialEq, Message)]
pub struct BoardProto {
    #[prost(uint32, tag = "1")]
    pub rows: u32,

    #[prost(uint32, tag = "2")]
    pub cols: u32,

    #[prost(uint32, repeated, tag = "3")]
    pub cells: Vec<u32>,
}

impl BoardProto {
    /// Cell value at `(row, col)`, or `None` if outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows as usize || col >= self.cols as usize {
            return None;
        }
        self.cells.get(row * self.cols as usize + col).copied()
    }
}

// ============================================================================
// Client → Server
// ============================================================================

/// Request to drop a piece.
///
/// `player` is the number the client claims to be (1 or 2); the server checks
/// it against both the turn and the connection bound to that number.
/// `column` is signed so that negative values reach validation instead of
/// failing to decode.
#[derive(Clone, PartialEq, Message)]
pub struct MakeMove {
    #[prost(uint32, tag = "1")]
    pub player: u32,

    #[prost(int32, tag = "2")]
    pub column: i32,
}

/// Envelope for everything a client sends.
#[derive(Clone, PartialEq, Message)]
pub struct ClientMessage {
    #[prost(oneof = "client_message::Payload", tags = "1")]
    pub payload: Option<client_message::Payload>,
}

pub mod client_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        MakeMove(super::MakeMove),
    }
}

impl From<MakeMove> for ClientMessage {
    fn from(msg: MakeMove) -> Self {
        Self {
            payload: Some(client_message::Payload::MakeMove(msg)),
        }
    }
}

// ============================================================================
// Server → Client
// ============================================================================

/// Sent to each participant once paired.
#[derive(Clone, PartialEq, Message)]
pub struct GameStart {
    /// Seat assigned to the recipient.
    #[prost(uint32, tag = "1")]
    pub player_number: u32,

    /// Seat that moves first (always 1).
    #[prost(uint32, tag = "2")]
    pub starting_player: u32,

    #[prost(message, optional, tag = "3")]
    pub board: Option<BoardProto>,
}

/// Broadcast after a move that did not end the game.
#[derive(Clone, PartialEq, Message)]
pub struct MoveMade {
    #[prost(message, optional, tag = "1")]
    pub board: Option<BoardProto>,

    #[prost(uint32, tag = "2")]
    pub next_player: u32,
}

/// Broadcast after the move that ended the game.
#[derive(Clone, PartialEq, Message)]
pub struct GameOver {
    #[prost(message, optional, tag = "1")]
    pub board: Option<BoardProto>,

    /// Winning seat; absent on a draw.
    #[prost(uint32, optional, tag = "2")]
    pub winner: Option<u32>,
}

/// Sent only to the submitter of a rejected move.
#[derive(Clone, PartialEq, Message)]
pub struct InvalidMove {
    #[prost(string, tag = "1")]
    pub reason: String,
}

/// Sent to the remaining participant when the other one leaves.
#[derive(Clone, PartialEq, Message)]
pub struct OpponentDisconnected {}

/// Sent to the submitter when the server failed to process a request.
#[derive(Clone, PartialEq, Message)]
pub struct ServerError {
    #[prost(string, tag = "1")]
    pub message: String,
}

/// Envelope for everything the server sends.
#[derive(Clone, PartialEq, Message)]
pub struct ServerMessage {
    #[prost(oneof = "server_message::Payload", tags = "1, 2, 3, 4, 5, 6")]
    pub payload: Option<server_message::Payload>,
}

pub mod server_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "1")]
        GameStart(super::GameStart),

        #[prost(message, tag = "2")]
        MoveMade(super::MoveMade),

        #[prost(message, tag = "3")]
        GameOver(super::GameOver),

        #[prost(message, tag = "4")]
        InvalidMove(super::InvalidMove),

        #[prost(message, tag = "5")]
        OpponentDisconnected(super::OpponentDisconnected),

        #[prost(message, tag = "6")]
        ServerError(super::ServerError),
    }
}

impl From<server_message::Payload> for ServerMessage {
    fn from(payload: server_message::Payload) -> Self {
        Self {
            payload: Some(payload),
        }
    }
}

// ============================================================================
// Conversion Traits
// ============================================================================

impl From<&Board> for BoardProto {
    fn from(board: &Board) -> Self {
        Self {
            rows: ROWS as u32,
            cols: COLS as u32,
            cells: board.rows().flatten().map(|cell| cell.as_u32()).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dropline_board::PlayerNumber;

    #[test]
    fn test_board_proto_layout() {
        let mut board = Board::new();
        board.make_move(0, PlayerNumber::One).unwrap();
        board.make_move(6, PlayerNumber::Two).unwrap();

        let proto = BoardProto::from(&board);
        assert_eq!(proto.rows, 6);
        assert_eq!(proto.cols, 7);
        assert_eq!(proto.cells.len(), ROWS * COLS);

        // Bottom row is the last row in row-major order
        assert_eq!(proto.cell(ROWS - 1, 0), Some(1));
        assert_eq!(proto.cell(ROWS - 1, 6), Some(2));
        assert_eq!(proto.cell(0, 0), Some(0));
        assert_eq!(proto.cell(ROWS, 0), None);
        assert_eq!(proto.cells.iter().filter(|&&c| c != 0).count(), 2);
    }

    #[test]
    fn test_client_message_negative_column_decodes() {
        let msg = ClientMessage::from(MakeMove {
            player: 1,
            column: -1,
        });
        let decoded = ClientMessage::decode(msg.encode_to_vec().as_slice()).unwrap();
        assert_eq!(
            decoded.payload,
            Some(client_message::Payload::MakeMove(MakeMove {
                player: 1,
                column: -1,
            }))
        );
    }

    #[test]
    fn test_game_over_draw_has_no_winner() {
        let msg = ServerMessage::from(server_message::Payload::GameOver(GameOver {
            board: Some(BoardProto::from(&Board::new())),
            winner: None,
        }));
        let decoded = ServerMessage::decode(msg.encode_to_vec().as_slice()).unwrap();
        match decoded.payload {
            Some(server_message::Payload::GameOver(over)) => assert_eq!(over.winner, None),
            other => panic!("expected GameOver, got {other:?}"),
        }
    }

    #[test]
    fn test_game_over_winner_survives_encoding() {
        let msg = ServerMessage::from(server_message::Payload::GameOver(GameOver {
            board: None,
            winner: Some(2),
        }));
        let decoded = ServerMessage::decode(msg.encode_to_vec().as_slice()).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_opponent_disconnected_is_distinguishable() {
        let msg = ServerMessage::from(server_message::Payload::OpponentDisconnected(
            OpponentDisconnected {},
        ));
        let bytes = msg.encode_to_vec();
        assert!(!bytes.is_empty());
        let decoded = ServerMessage::decode(bytes.as_slice()).unwrap();
        assert!(matches!(
            decoded.payload,
            Some(server_message::Payload::OpponentDisconnected(_))
        ));
    }

    #[test]
    fn test_garbage_does_not_decode() {
        assert!(ClientMessage::decode(&[0xff, 0xff, 0xff][..]).is_err());
    }
}
