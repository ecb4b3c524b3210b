//! Packet-speaking UDP socket.
//!
//! [`AdxSocket`] is a thin wrapper around `tokio::net::UdpSocket` that
//! speaks [`Packet`] and feedback messages instead of raw bytes. All
//! protocol decisions (what to skip, what to retry, where to route) belong
//! to the sender and receiver loops; this module owns only datagram I/O.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::constants::{FEEDBACK_MAX, MAX_DATAGRAM};
use crate::error::Result;
use crate::feedback;
use crate::packet::Packet;

/// One unreliable, unordered, connectionless channel endpoint.
#[derive(Debug)]
pub struct AdxSocket {
    inner: UdpSocket,
}

impl AdxSocket {
    /// Bind to `addr`. Pass port 0 to let the OS pick an ephemeral port.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let inner = UdpSocket::bind(addr).await?;
        Ok(Self { inner })
    }

    /// Address this socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }

    /// Fix the remote peer for [`send_packet`](Self::send_packet) and
    /// [`try_recv_feedback`](Self::try_recv_feedback).
    pub async fn connect(&self, peer: SocketAddr) -> Result<()> {
        self.inner.connect(peer).await?;
        Ok(())
    }

    /// Encode and transmit one packet to the connected peer.
    pub async fn send_packet(&self, packet: &Packet) -> Result<()> {
        self.inner.send(&packet.encode()).await?;
        Ok(())
    }

    /// Non-blocking poll for one feedback message from the connected peer.
    ///
    /// Returns `None` when no datagram is waiting or the waiting datagram
    /// is not a well-formed feedback message; the pacing loop must never
    /// block here.
    pub fn try_recv_feedback(&self) -> Option<f64> {
        let mut buf = [0u8; FEEDBACK_MAX];
        match self.inner.try_recv(&mut buf) {
            Ok(n) => feedback::decode(&buf[..n]),
            Err(_) => None,
        }
    }

    /// Await one datagram and parse it as a data packet.
    ///
    /// Returns `(packet, sender_address)`. Datagrams that fail to decode
    /// (zero-length or undersized) come back as
    /// [`AdxError::TruncatedHeader`](crate::error::AdxError::TruncatedHeader);
    /// the caller decides whether to skip them.
    pub async fn recv_packet(&self) -> Result<(Packet, SocketAddr)> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let (n, addr) = self.inner.recv_from(&mut buf).await?;
        Ok((Packet::decode(&buf[..n])?, addr))
    }

    /// Encode and transmit one feedback message to `peer`.
    pub async fn send_feedback(&self, loss_rate: f64, peer: SocketAddr) -> Result<()> {
        let msg = feedback::encode(loss_rate);
        self.inner.send_to(msg.as_bytes(), peer).await?;
        Ok(())
    }
}
