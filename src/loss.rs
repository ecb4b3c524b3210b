//! Count-windowed loss estimation from sequence-number gaps.
//!
//! [`LossMonitor`] consumes the sequence number of every arriving packet
//! and, once per window of [`WINDOW_SIZE`](crate::constants::WINDOW_SIZE)
//! processed packets, produces the loss rate observed over that window.
//!
//! The estimate assumes the channel does not reorder: a packet arriving
//! ahead of the expected sequence number means everything in between was
//! lost. A packet arriving *behind* the expected number (duplicate or late)
//! is counted like ordinary traffic — the expectation is not rewound and no
//! loss is un-counted.

use crate::constants::WINDOW_SIZE;

/// Result of one completed estimation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowReport {
    /// Sequence numbers presumed lost within the window.
    pub lost: u32,
    /// Total packets accounted in the window (arrivals + presumed lost).
    pub total: u32,
    /// `lost / total`.
    pub loss_rate: f64,
}

/// Receiver-side loss accounting state.
#[derive(Debug)]
pub struct LossMonitor {
    /// Next sequence number expected in order. `None` until the first
    /// packet arrives; never reset afterwards.
    expected: Option<u32>,
    lost: u32,
    window_total: u32,
    window_size: u32,
    received_total: u64,
}

impl LossMonitor {
    /// Create a monitor that reports every `window_size` processed packets.
    pub fn new(window_size: u32) -> Self {
        assert!(window_size > 0, "window_size must be positive");
        Self {
            expected: None,
            lost: 0,
            window_total: 0,
            window_size,
            received_total: 0,
        }
    }

    /// Account one arriving packet; returns the report when this packet
    /// (or the gap in front of it) completes a window.
    ///
    /// A gap large enough to fill the window on its own completes the
    /// window before the arriving packet itself is counted; the packet then
    /// opens the next window. At most one report per call.
    pub fn on_packet(&mut self, sequence: u32) -> Option<WindowReport> {
        let mut report = None;

        match self.expected {
            // First arrival ever: there is no prior expectation, so no loss
            // evidence yet.
            None => self.expected = Some(sequence.wrapping_add(1)),
            Some(expected) if sequence >= expected => {
                let gap = sequence - expected;
                self.lost += gap;
                self.window_total += gap;
                self.expected = Some(sequence.wrapping_add(1));
                report = self.try_complete();
            }
            // Duplicate or late arrival: counted as ordinary traffic below,
            // expectation unchanged.
            Some(_) => {}
        }

        self.window_total += 1;
        self.received_total += 1;
        report.or_else(|| self.try_complete())
    }

    fn try_complete(&mut self) -> Option<WindowReport> {
        if self.window_total < self.window_size {
            return None;
        }
        let report = WindowReport {
            lost: self.lost,
            total: self.window_total,
            loss_rate: f64::from(self.lost) / f64::from(self.window_total),
        };
        self.lost = 0;
        self.window_total = 0;
        Some(report)
    }

    /// Packets received over the lifetime of this monitor (windows do not
    /// reset this).
    pub fn received_total(&self) -> u64 {
        self.received_total
    }

    /// Sequence numbers presumed lost in the current, incomplete window.
    pub fn pending_lost(&self) -> u32 {
        self.lost
    }

    /// Packets accounted in the current, incomplete window.
    pub fn pending_total(&self) -> u32 {
        self.window_total
    }
}

impl Default for LossMonitor {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}
