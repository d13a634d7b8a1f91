//! FIFO matchmaking queue.
//!
//! Pairing is strict first-in, first-out: the longest-waiting connection is
//! always paired next, and it takes seat 1 (the first turn).

use std::collections::VecDeque;

use crate::session::ConnectionId;

/// Two connections matched by the queue, in seat order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub player_one: ConnectionId,
    pub player_two: ConnectionId,
}

/// Connections waiting for an opponent, oldest first.
#[derive(Debug, Default)]
pub struct MatchQueue {
    waiting: VecDeque<ConnectionId>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a newly arrived connection.
    ///
    /// Returns a pairing with the head of the queue if anyone is waiting,
    /// otherwise queues `arriving` and returns `None`.
    pub fn on_arrival(&mut self, arriving: ConnectionId) -> Option<Pairing> {
        match self.waiting.pop_front() {
            Some(head) => Some(Pairing {
                player_one: head,
                player_two: arriving,
            }),
            None => {
                self.waiting.push_back(arriving);
                None
            }
        }
    }

    /// Remove a departing connection. Returns whether it was waiting.
    pub fn on_departure(&mut self, departing: ConnectionId) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|&conn| conn != departing);
        self.waiting.len() != before
    }

    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.waiting.contains(&conn)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_arrival_waits() {
        let mut queue = MatchQueue::new();
        assert_eq!(queue.on_arrival(1), None);
        assert!(queue.contains(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_fifo_pairing() {
        let mut queue = MatchQueue::new();

        assert_eq!(queue.on_arrival(10), None);
        assert_eq!(
            queue.on_arrival(20),
            Some(Pairing {
                player_one: 10,
                player_two: 20
            })
        );
        assert_eq!(queue.on_arrival(30), None);
        assert_eq!(
            queue.on_arrival(40),
            Some(Pairing {
                player_one: 30,
                player_two: 40
            })
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_departure_while_waiting() {
        let mut queue = MatchQueue::new();
        queue.on_arrival(1);

        assert!(queue.on_departure(1));
        assert!(queue.is_empty());

        // Next arrival waits instead of pairing with the departed connection
        assert_eq!(queue.on_arrival(2), None);
        assert!(queue.contains(2));
    }

    #[test]
    fn test_departure_of_unknown_is_noop() {
        let mut queue = MatchQueue::new();
        queue.on_arrival(1);

        assert!(!queue.on_departure(99));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(1));
    }
}
