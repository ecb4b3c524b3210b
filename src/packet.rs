//! Wire framing for data packets.
//!
//! Every data datagram is an 8-byte fixed header followed immediately by the
//! payload, no padding:
//!
//! ```text
//! bytes 0..4   sequence number   (u32, big-endian)
//! bytes 4..8   timestamp, ms     (u32, big-endian)
//! bytes 8..    payload           (0..=MSS bytes)
//! ```
//!
//! No I/O happens here; [`crate::socket::AdxSocket`] owns the datagrams.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::constants::HEADER_SIZE;
use crate::error::{AdxError, Result};

/// One unit of transmission: sequenced, timestamped payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Monotonically increasing, assigned once per chunk, never reused.
    pub sequence: u32,
    /// Sender-local capture time in milliseconds. Informational only; the
    /// loss and rate logic never reads it.
    pub timestamp: u32,
    /// Payload bytes, at most one MSS.
    pub payload: Bytes,
}

impl Packet {
    /// Serialise into a single datagram buffer, header first.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.payload.len());
        buf.put_u32(self.sequence);
        buf.put_u32(self.timestamp);
        buf.put_slice(&self.payload);
        buf.freeze()
    }

    /// Parse a received datagram.
    ///
    /// Payload length is whatever follows the header; zero-length datagrams
    /// and anything shorter than [`HEADER_SIZE`] fail with
    /// [`AdxError::TruncatedHeader`].
    pub fn decode(datagram: &[u8]) -> Result<Self> {
        if datagram.len() < HEADER_SIZE {
            return Err(AdxError::TruncatedHeader(datagram.len()));
        }
        let mut header = &datagram[..HEADER_SIZE];
        let sequence = header.get_u32();
        let timestamp = header.get_u32();
        Ok(Self {
            sequence,
            timestamp,
            payload: Bytes::copy_from_slice(&datagram[HEADER_SIZE..]),
        })
    }

    /// Total on-wire size of this packet.
    pub fn wire_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(sequence: u32, timestamp: u32, payload: &[u8]) -> Packet {
        Packet {
            sequence,
            timestamp,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    #[test]
    fn roundtrip() {
        let pkt = make(42, 1_000, b"hello");
        let decoded = Packet::decode(&pkt.encode()).unwrap();
        assert_eq!(decoded, pkt);
    }

    #[test]
    fn roundtrip_full_u32_range() {
        for val in [0, 1, 0x7fff_ffff, 0x8000_0000, u32::MAX] {
            let pkt = make(val, u32::MAX - val, b"x");
            let decoded = Packet::decode(&pkt.encode()).unwrap();
            assert_eq!(decoded.sequence, val);
            assert_eq!(decoded.timestamp, u32::MAX - val);
        }
    }

    #[test]
    fn header_is_big_endian_on_wire() {
        let bytes = make(0x0102_0304, 0x0506_0708, b"").encode();
        assert_eq!(&bytes[..4], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[4..8], &[0x05, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let pkt = make(7, 0, b"");
        let bytes = pkt.encode();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let decoded = Packet::decode(&bytes).unwrap();
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn decode_empty_datagram_fails() {
        assert!(matches!(
            Packet::decode(&[]),
            Err(AdxError::TruncatedHeader(0))
        ));
    }

    #[test]
    fn decode_short_header_fails() {
        assert!(matches!(
            Packet::decode(&[0u8; HEADER_SIZE - 1]),
            Err(AdxError::TruncatedHeader(7))
        ));
    }

    #[test]
    fn payload_length_is_datagram_minus_header() {
        let pkt = make(0, 0, &[0xAB; 100]);
        let bytes = pkt.encode();
        assert_eq!(bytes.len(), HEADER_SIZE + 100);
        assert_eq!(bytes.len(), pkt.wire_len());
        let decoded = Packet::decode(&bytes).unwrap();
        assert_eq!(decoded.payload.len(), 100);
    }
}
