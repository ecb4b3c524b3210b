//! Feedback routing: a one-entry peer table.
//!
//! Feedback goes to whichever peer most recently delivered a valid data
//! packet. The single-slot table makes the single-session assumption
//! explicit and replaceable, instead of hiding it in a mutable
//! "last seen address" field.

use std::net::SocketAddr;

/// Tracks the one active peer.
#[derive(Debug, Default)]
pub struct PeerTable {
    current: Option<SocketAddr>,
}

impl PeerTable {
    /// Empty table; no feedback can be routed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a valid packet arrived from `addr`.
    ///
    /// Returns `true` when this replaces a different peer (or fills an
    /// empty slot), so the caller can log the switch. Last sender wins.
    pub fn observe(&mut self, addr: SocketAddr) -> bool {
        let changed = self.current != Some(addr);
        self.current = Some(addr);
        changed
    }

    /// Destination for the next feedback message, if any peer is known.
    pub fn feedback_target(&self) -> Option<SocketAddr> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    #[test]
    fn starts_empty() {
        assert_eq!(PeerTable::new().feedback_target(), None);
    }

    #[test]
    fn first_observation_fills_slot() {
        let mut t = PeerTable::new();
        assert!(t.observe(addr(1000)));
        assert_eq!(t.feedback_target(), Some(addr(1000)));
    }

    #[test]
    fn same_peer_is_not_a_change() {
        let mut t = PeerTable::new();
        t.observe(addr(1000));
        assert!(!t.observe(addr(1000)));
    }

    #[test]
    fn last_sender_wins() {
        let mut t = PeerTable::new();
        t.observe(addr(1000));
        assert!(t.observe(addr(2000)));
        assert_eq!(t.feedback_target(), Some(addr(2000)));
    }
}
