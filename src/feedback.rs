//! Text codec for the receiver-to-sender feedback channel.
//!
//! A feedback datagram is the ASCII message `LOSS <rate>`, e.g.
//! `LOSS 0.040000`. It carries no sequence number, checksum, or session id;
//! correctness rests on the single-sender/single-receiver deployment.
//!
//! Decoding is deliberately unforgiving: anything that is not the `LOSS`
//! prefix followed by one finite float in `[0.0, 1.0]` is rejected, and a
//! rejected message must never reach the rate controller.

/// Literal prefix of every feedback message.
const PREFIX: &str = "LOSS";

/// Render a loss rate as a feedback datagram payload.
///
/// Six decimal places, matching the width the receiver always produces for
/// a `[0, 1]` rate; the result fits comfortably in
/// [`FEEDBACK_MAX`](crate::constants::FEEDBACK_MAX) bytes.
pub fn encode(loss_rate: f64) -> String {
    format!("{PREFIX} {loss_rate:.6}")
}

/// Parse a received datagram as a feedback message.
///
/// Returns `None` for anything malformed: non-UTF-8 bytes, a missing
/// prefix, an unparsable or non-finite rate, a rate outside `[0.0, 1.0]`,
/// or trailing content after the rate field.
pub fn decode(datagram: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(datagram).ok()?;
    let rest = text.strip_prefix(PREFIX)?;
    let rate: f64 = rest.trim().parse().ok()?;
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return None;
    }
    Some(rate)
}
