//! Receiver role: blocking receive loop, loss accounting, sink forwarding.
//!
//! Strictly one datagram at a time: await an arrival, account it, possibly
//! emit one feedback message, forward the payload, block again. Payload
//! bytes go to the sink in arrival order with no resequencing and no gap
//! filling; a downstream consumer must tolerate discontinuities. All
//! diagnostics go through the logger so the sink carries payload bytes
//! only.

use std::io::Write;
use std::net::SocketAddr;

use crate::constants::WINDOW_SIZE;
use crate::error::{AdxError, Result};
use crate::loss::LossMonitor;
use crate::session::PeerTable;
use crate::socket::AdxSocket;

/// Everything the receiver role needs to start.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Local address to bind.
    pub bind: SocketAddr,
    /// Packets per loss-estimation window.
    pub window_size: u32,
}

impl ReceiverConfig {
    /// Standard window size on the given address.
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            window_size: WINDOW_SIZE,
        }
    }
}

/// Receiver state over an arbitrary output sink.
#[derive(Debug)]
pub struct Receiver<W> {
    socket: AdxSocket,
    monitor: LossMonitor,
    peers: PeerTable,
    sink: W,
}

impl<W: Write> Receiver<W> {
    /// Bind the channel endpoint. Fails fast if the address is taken.
    pub async fn bind(config: &ReceiverConfig, sink: W) -> Result<Self> {
        let socket = AdxSocket::bind(config.bind).await?;
        Ok(Self {
            socket,
            monitor: LossMonitor::new(config.window_size),
            peers: PeerTable::new(),
            sink,
        })
    }

    /// Address the receiver is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Process exactly one datagram.
    ///
    /// Undersized datagrams are skipped. A completed loss window sends one
    /// feedback message to the current session peer; like the forward
    /// channel, the feedback channel is best-effort, so a failed send is
    /// logged and forgotten.
    pub async fn step(&mut self) -> Result<()> {
        let (packet, from) = match self.socket.recv_packet().await {
            Ok(arrival) => arrival,
            Err(AdxError::TruncatedHeader(len)) => {
                log::trace!("skipping undersized datagram ({len} bytes)");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if self.peers.observe(from) {
            log::info!("streaming from {from}");
        }

        if let Some(report) = self.monitor.on_packet(packet.sequence) {
            log::debug!(
                "window complete: loss {:.4} ({}/{}), {} packets lifetime",
                report.loss_rate,
                report.lost,
                report.total,
                self.monitor.received_total()
            );
            if let Some(peer) = self.peers.feedback_target() {
                if let Err(e) = self.socket.send_feedback(report.loss_rate, peer).await {
                    log::debug!("feedback send to {peer} failed: {e}");
                }
            }
        }

        if !packet.payload.is_empty() {
            self.sink.write_all(&packet.payload)?;
            self.sink.flush()?;
        }
        Ok(())
    }

    /// Serve forever. Returns only on a fatal socket or sink error; there
    /// is no graceful shutdown, termination is abrupt by design.
    pub async fn run(mut self) -> Result<()> {
        log::info!("listening on {}", self.local_addr()?);
        loop {
            self.step().await?;
        }
    }

    /// Packets received over the lifetime of this receiver.
    pub fn received_total(&self) -> u64 {
        self.monitor.received_total()
    }

    /// Consume the receiver and hand back the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    use crate::packet::Packet;

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    async fn receiver(window_size: u32) -> Receiver<Vec<u8>> {
        let mut config = ReceiverConfig::new(loopback());
        config.window_size = window_size;
        Receiver::bind(&config, Vec::new()).await.unwrap()
    }

    async fn sender_for(rx: &Receiver<Vec<u8>>) -> AdxSocket {
        let tx = AdxSocket::bind(loopback()).await.unwrap();
        tx.connect(rx.local_addr().unwrap()).await.unwrap();
        tx
    }

    fn packet(sequence: u32, payload: &'static [u8]) -> Packet {
        Packet {
            sequence,
            timestamp: 0,
            payload: Bytes::from_static(payload),
        }
    }

    #[tokio::test]
    async fn payload_is_forwarded_in_arrival_order() {
        let mut rx = receiver(100).await;
        let tx = sender_for(&rx).await;

        // Arrival order is what counts, not sequence order.
        tx.send_packet(&packet(0, b"first")).await.unwrap();
        tx.send_packet(&packet(2, b"third")).await.unwrap();
        tx.send_packet(&packet(1, b"late")).await.unwrap();
        for _ in 0..3 {
            rx.step().await.unwrap();
        }

        assert_eq!(rx.sink, b"firstthirdlate");
        assert_eq!(rx.received_total(), 3);
    }

    #[tokio::test]
    async fn completed_window_sends_feedback() {
        let mut rx = receiver(10).await;
        let tx = sender_for(&rx).await;

        // 8 in-order arrivals, then a jump from 7 to 97 (89 skipped).
        for seq in (0..=7).chain([97]) {
            tx.send_packet(&packet(seq, b"x")).await.unwrap();
        }
        for _ in 0..9 {
            rx.step().await.unwrap();
        }

        // The gap completed the 10-packet window on its own: 89 lost out of
        // 97 accounted.
        let mut polled = None;
        for _ in 0..50 {
            polled = tx.try_recv_feedback();
            if polled.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let loss = polled.expect("feedback should have been emitted");
        assert!(loss > 0.9, "gap-dominated window, got {loss}");
    }

    #[tokio::test]
    async fn zero_window_loss_feedback_is_zero() {
        let mut rx = receiver(5).await;
        let tx = sender_for(&rx).await;

        for seq in 0..5 {
            tx.send_packet(&packet(seq, b"x")).await.unwrap();
        }
        for _ in 0..5 {
            rx.step().await.unwrap();
        }

        let mut polled = None;
        for _ in 0..50 {
            polled = tx.try_recv_feedback();
            if polled.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        assert_eq!(polled, Some(0.0));
    }

    #[tokio::test]
    async fn undersized_datagram_is_skipped() {
        let mut rx = receiver(100).await;
        let raw = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        raw.send_to(b"tiny", rx.local_addr().unwrap()).await.unwrap();

        rx.step().await.unwrap();
        assert_eq!(rx.received_total(), 0);
        assert!(rx.sink.is_empty());
    }

    #[tokio::test]
    async fn empty_payload_writes_nothing_but_counts() {
        let mut rx = receiver(100).await;
        let tx = sender_for(&rx).await;

        tx.send_packet(&packet(0, b"")).await.unwrap();
        rx.step().await.unwrap();

        assert!(rx.sink.is_empty());
        assert_eq!(rx.received_total(), 1);
    }
}
