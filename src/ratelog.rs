//! CSV record of feedback-driven rate adjustments.
//!
//! One row per applied feedback message: milliseconds since the stream
//! started, the rate after the adjustment, and the reported loss rate.
//! The column layout (`TimeMS,Rate,Loss`) is what downstream plotting
//! tooling expects.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::error::Result;

/// Append-only writer for the adjustment log.
#[derive(Debug)]
pub struct RateLog<W> {
    out: W,
    started: Instant,
}

impl RateLog<BufWriter<File>> {
    /// Create (or truncate) the log file at `path` and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> RateLog<W> {
    /// Wrap an arbitrary writer; the header row is written immediately and
    /// elapsed time is measured from this call.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "TimeMS,Rate,Loss")?;
        Ok(Self {
            out,
            started: Instant::now(),
        })
    }

    /// Append one adjustment row and flush it, so an abrupt termination
    /// loses at most the row being written.
    pub fn record(&mut self, rate: u32, loss_rate: f64) -> Result<()> {
        let elapsed_ms = self.started.elapsed().as_millis();
        writeln!(self.out, "{elapsed_ms},{rate},{loss_rate:.4}")?;
        self.out.flush()?;
        Ok(())
    }
}
