//! Sender role: packetize, pace, poll feedback, adjust.
//!
//! One cooperative loop, strictly sequential: produce a packet, transmit it
//! (best-effort), sleep for the pacing interval, poll the feedback channel
//! without blocking, apply at most one AIMD step. Suspension happens only
//! at the pacing sleep.
//!
//! The loop can simulate a lossy outbound link by discarding packets with a
//! configurable probability before they reach the wire; sequence numbers
//! are consumed either way, so the receiver sees the holes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::Rng;

use crate::constants::{INITIAL_RATE, MSS};
use crate::error::Result;
use crate::packetizer::Packetizer;
use crate::rate::{Adjustment, RateController};
use crate::ratelog::RateLog;
use crate::socket::AdxSocket;

/// Everything the sender role needs to start.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Receiver address.
    pub target: SocketAddr,
    /// Where the CSV adjustment log is written.
    pub log_path: PathBuf,
    /// Probability in `[0.0, 1.0]` of discarding an outgoing packet before
    /// the wire. 0.0 disables the simulation.
    pub drop_rate: f64,
    /// Initial transmission rate, packets/second.
    pub initial_rate: u32,
}

impl SenderConfig {
    /// Defaults matching the stock deployment: log to `aimd_log.csv`, no
    /// simulated loss, start at [`INITIAL_RATE`].
    pub fn new(target: SocketAddr) -> Self {
        Self {
            target,
            log_path: PathBuf::from("aimd_log.csv"),
            drop_rate: 0.0,
            initial_rate: INITIAL_RATE,
        }
    }
}

/// Counters reported in the post-run summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SenderStats {
    /// Packets handed to the socket.
    pub sent: u64,
    /// Packets discarded by the loss simulation.
    pub dropped: u64,
    /// Payload bytes handed to the socket.
    pub payload_bytes: u64,
    /// Feedback messages that produced a rate adjustment.
    pub adjustments: u64,
}

/// Sender state over an arbitrary payload source.
#[derive(Debug)]
pub struct Sender<R> {
    socket: AdxSocket,
    packetizer: Packetizer<R>,
    rate: RateController,
    log: RateLog<BufWriter<File>>,
    drop_rate: f64,
    stats: SenderStats,
    started: Instant,
}

impl Sender<BufReader<File>> {
    /// Open `payload` for streaming. Fails fast if the file or the log
    /// cannot be opened, or the socket cannot reach `config.target`.
    pub async fn open(config: &SenderConfig, payload: &Path) -> Result<Self> {
        let source = BufReader::new(File::open(payload)?);
        Self::from_source(config, source).await
    }
}

impl<R: Read> Sender<R> {
    /// Stream from an arbitrary byte source. Binds an ephemeral local port
    /// and connects it to the receiver.
    pub async fn from_source(config: &SenderConfig, source: R) -> Result<Self> {
        let socket = AdxSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0))).await?;
        socket.connect(config.target).await?;
        Ok(Self {
            socket,
            packetizer: Packetizer::new(source, MSS),
            rate: RateController::new(config.initial_rate),
            log: RateLog::create(&config.log_path)?,
            drop_rate: config.drop_rate,
            stats: SenderStats::default(),
            started: Instant::now(),
        })
    }

    /// One loop iteration. Returns `Ok(false)` once the source is
    /// exhausted.
    pub async fn step(&mut self) -> Result<bool> {
        let Some(packet) = self.packetizer.next_packet()? else {
            return Ok(false);
        };

        if self.drop_rate > 0.0 && rand::rng().random::<f64>() < self.drop_rate {
            self.stats.dropped += 1;
        } else {
            match self.socket.send_packet(&packet).await {
                Ok(()) => {
                    self.stats.sent += 1;
                    self.stats.payload_bytes += packet.payload.len() as u64;
                }
                // Best-effort channel: never retried, never fatal.
                Err(e) => log::debug!("send failed for seq {}: {e}", packet.sequence),
            }
        }

        tokio::time::sleep(self.rate.pacing_interval()).await;

        if let Some(loss) = self.socket.try_recv_feedback() {
            let adjustment = self.rate.on_feedback(loss);
            self.stats.adjustments += 1;
            self.log.record(self.rate.rate(), loss)?;
            match adjustment {
                Adjustment::Decrease => log::info!(
                    "loss {:.2}% | rate {} pps (backing off)",
                    loss * 100.0,
                    self.rate.rate()
                ),
                Adjustment::Increase => log::debug!(
                    "loss {:.2}% | rate {} pps (ramping up)",
                    loss * 100.0,
                    self.rate.rate()
                ),
            }
        }

        Ok(true)
    }

    /// Drive [`step`](Self::step) until the source is exhausted, then log a
    /// summary.
    pub async fn run(mut self) -> Result<SenderStats> {
        while self.step().await? {}
        log::info!(
            "stream complete: {} packets sent, {} dropped, {} payload bytes in {:?}, final rate {} pps",
            self.stats.sent,
            self.stats.dropped,
            self.stats.payload_bytes,
            self.started.elapsed(),
            self.rate.rate()
        );
        Ok(self.stats)
    }

    /// Current target rate, packets/second.
    pub fn rate(&self) -> u32 {
        self.rate.rate()
    }

    /// Counters so far.
    pub fn stats(&self) -> SenderStats {
        self.stats
    }
}
