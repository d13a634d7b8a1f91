//! Notification dispatch.
//!
//! Turns state-machine outcomes into addressed `ServerMessage`s. Nothing here
//! touches a transport: the caller hands the returned list to whatever owns
//! the connections.

use dropline_board::PlayerNumber;
use dropline_wire::server_message::Payload;
use dropline_wire::{
    BoardProto, GameOver, GameStart, InvalidMove, MoveMade, OpponentDisconnected, ServerError,
    ServerMessage,
};
use prost::Message;

use crate::session::{ConnectionId, MoveOutcome, Rejection, Session};

/// Reason text sent with a `ServerError` for a move that failed internally.
pub const MOVE_FAILED_MESSAGE: &str = "An error occurred on the server while making the move.";

/// Reason text sent with a `ServerError` for an undecodable client frame.
pub const MALFORMED_MESSAGE: &str = "Malformed message.";

/// A message addressed to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipient: ConnectionId,
    pub message: ServerMessage,
}

impl Outbound {
    fn new(recipient: ConnectionId, payload: Payload) -> Self {
        Self {
            recipient,
            message: payload.into(),
        }
    }

    /// Serialized frame for the transport.
    pub fn encode(&self) -> Vec<u8> {
        self.message.encode_to_vec()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.message.payload.as_ref()
    }
}

/// `GameStart` to each participant, each with its own seat.
pub fn game_start(session: &Session) -> Vec<Outbound> {
    let board = BoardProto::from(session.board());
    session
        .connections()
        .into_iter()
        .map(|(player, conn)| {
            Outbound::new(
                conn,
                Payload::GameStart(GameStart {
                    player_number: player.as_u32(),
                    starting_player: PlayerNumber::One.as_u32(),
                    board: Some(board.clone()),
                }),
            )
        })
        .collect()
}

/// Broadcast the result of an applied move to both participants.
pub fn move_applied(session: &Session, outcome: MoveOutcome) -> Vec<Outbound> {
    let board = Some(BoardProto::from(session.board()));
    let payload = match outcome {
        MoveOutcome::Continued { next_turn } => Payload::MoveMade(MoveMade {
            board,
            next_player: next_turn.as_u32(),
        }),
        MoveOutcome::Won(winner) => Payload::GameOver(GameOver {
            board,
            winner: Some(winner.as_u32()),
        }),
        MoveOutcome::Drawn => Payload::GameOver(GameOver {
            board,
            winner: None,
        }),
    };

    session
        .connections()
        .into_iter()
        .map(|(_, conn)| Outbound::new(conn, payload.clone()))
        .collect()
}

/// `InvalidMove` to the submitter only.
pub fn invalid_move(submitter: ConnectionId, rejection: Rejection) -> Outbound {
    Outbound::new(
        submitter,
        Payload::InvalidMove(InvalidMove {
            reason: rejection.to_string(),
        }),
    )
}

/// `ServerError` to the submitter only.
pub fn server_error(submitter: ConnectionId, message: &str) -> Outbound {
    Outbound::new(
        submitter,
        Payload::ServerError(ServerError {
            message: message.to_string(),
        }),
    )
}

/// `OpponentDisconnected` to the participant left behind.
pub fn opponent_disconnected(remaining: ConnectionId) -> Outbound {
    Outbound::new(
        remaining,
        Payload::OpponentDisconnected(OpponentDisconnected {}),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_start_per_seat() {
        let session = Session::new(1, 10, 20);
        let out = game_start(&session);

        assert_eq!(out.len(), 2);
        for (outbound, (recipient, seat)) in out.iter().zip([(10, 1), (20, 2)]) {
            assert_eq!(outbound.recipient, recipient);
            match outbound.payload() {
                Some(Payload::GameStart(start)) => {
                    assert_eq!(start.player_number, seat);
                    assert_eq!(start.starting_player, 1);
                    let board = start.board.as_ref().unwrap();
                    assert!(board.cells.iter().all(|&c| c == 0));
                }
                other => panic!("expected GameStart, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_move_made_to_both() {
        let session = Session::new(1, 10, 20);
        let out = move_applied(
            &session,
            MoveOutcome::Continued {
                next_turn: PlayerNumber::Two,
            },
        );

        let recipients: Vec<_> = out.iter().map(|o| o.recipient).collect();
        assert_eq!(recipients, vec![10, 20]);
        assert_eq!(out[0].message, out[1].message);
        assert!(matches!(
            out[0].payload(),
            Some(Payload::MoveMade(MoveMade { next_player: 2, .. }))
        ));
    }

    #[test]
    fn test_game_over_payloads() {
        let session = Session::new(1, 10, 20);

        let won = move_applied(&session, MoveOutcome::Won(PlayerNumber::Two));
        assert!(matches!(
            won[0].payload(),
            Some(Payload::GameOver(GameOver {
                winner: Some(2),
                ..
            }))
        ));

        let drawn = move_applied(&session, MoveOutcome::Drawn);
        assert_eq!(drawn.len(), 2);
        assert!(matches!(
            drawn[1].payload(),
            Some(Payload::GameOver(GameOver { winner: None, .. }))
        ));
    }

    #[test]
    fn test_invalid_move_reason_text() {
        let out = invalid_move(10, Rejection::WrongTurn);
        assert_eq!(out.recipient, 10);
        assert_eq!(
            out.payload(),
            Some(&Payload::InvalidMove(InvalidMove {
                reason: "It is not your turn.".to_string()
            }))
        );
    }

    #[test]
    fn test_encode_decodes_as_server_message() {
        let out = opponent_disconnected(20);
        let decoded = ServerMessage::decode(out.encode().as_slice()).unwrap();
        assert_eq!(decoded, out.message);
    }
}
