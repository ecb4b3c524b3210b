//! ADX: loss-adaptive, best-effort datagram streaming over UDP
//!
//! One sender streams a byte payload to one receiver over an unreliable,
//! unordered datagram channel, pacing itself against the loss the receiver
//! observes:
//! - Sequenced 8-byte-header framing so gaps are detectable
//! - Count-windowed loss estimation on the receiver
//! - Plain-text loss feedback on the reverse channel
//! - AIMD rate control driving the sender's pacing loop
//!
//! Delivery is deliberately best-effort: nothing is retransmitted,
//! reordered, or reassembled. The receiver forwards payload bytes in
//! arrival order and the only backpressure is the sender slowing down.
#![warn(
    missing_debug_implementations,
    missing_docs,
    redundant_lifetimes,
    non_local_definitions,
    unsafe_code
)]

pub mod constants;
pub mod error;
pub mod feedback;
pub mod loss;
pub mod packet;
pub mod packetizer;
pub mod rate;
pub mod ratelog;
pub mod receiver;
pub mod sender;
pub mod session;
pub mod socket;

pub use error::AdxError;
pub use packet::Packet;
pub use receiver::{Receiver, ReceiverConfig};
pub use sender::{Sender, SenderConfig};
pub use socket::AdxSocket;
