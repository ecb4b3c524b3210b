//! Chunking of a byte source into sequenced packets.
//!
//! [`Packetizer`] owns the source and the outgoing sequence counter. It
//! introduces no gaps itself: sequence numbers start at 0 and advance by
//! exactly 1 per produced packet, so any gap seen by the receiver was put
//! there by the channel.

use std::io::{ErrorKind, Read};
use std::time::Instant;

use bytes::Bytes;

use crate::error::Result;
use crate::packet::Packet;

/// Lazily turns a [`Read`] source into a finite sequence of packets.
#[derive(Debug)]
pub struct Packetizer<R> {
    source: R,
    mss: usize,
    next_seq: u32,
    started: Instant,
}

impl<R: Read> Packetizer<R> {
    /// Wrap `source`, emitting payloads of at most `mss` bytes.
    pub fn new(source: R, mss: usize) -> Self {
        assert!(mss > 0, "mss must be positive");
        Self {
            source,
            mss,
            next_seq: 0,
            started: Instant::now(),
        }
    }

    /// Produce the next packet, or `Ok(None)` once the source is exhausted.
    ///
    /// Short reads are accumulated until the chunk is full, so only the
    /// final packet of a stream can carry fewer than `mss` bytes. The
    /// timestamp is milliseconds since this packetizer was created,
    /// truncated to `u32`.
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        let mut chunk = vec![0u8; self.mss];
        let mut filled = 0;
        while filled < self.mss {
            match self.source.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        chunk.truncate(filled);

        let sequence = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        Ok(Some(Packet {
            sequence,
            timestamp: self.started.elapsed().as_millis() as u32,
            payload: Bytes::from(chunk),
        }))
    }

    /// Sequence number the next packet will carry.
    pub fn next_sequence(&self) -> u32 {
        self.next_seq
    }
}
