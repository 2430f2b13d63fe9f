//! Raw per-operation sample recording
//!
//! Keeps every recorded timing verbatim, in insertion order, for offline
//! analysis of distributions the histogram's fixed buckets would blur.
//! Appends are amortized O(1); memory grows without bound with the number
//! of operations, which is acceptable for benchmark-sized runs.

use std::fmt::Write as _;
use std::io;
use std::io::Write as _;

/// Samples reserved up front so typical runs never reallocate
const DEFAULT_CAPACITY: usize = 1_000_000;

/// Unbounded recorder of raw f64 timing samples
#[derive(Debug)]
pub struct RawRecorder {
    samples: Vec<f64>,
}

impl RawRecorder {
    /// Create an empty recorder with the default capacity
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Drop all samples and return to the default capacity
    pub fn clear(&mut self) {
        self.samples = Vec::with_capacity(DEFAULT_CAPACITY);
    }

    /// Append a sample
    pub fn add(&mut self, value: f64) {
        self.samples.push(value);
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// One decimal-formatted sample per line, in insertion order
    pub fn render(&self) -> String {
        let mut out = String::new();
        for value in &self.samples {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{value:.4}");
        }
        out
    }

    /// Write a `num,time` CSV of the samples to `sink`
    pub fn render_csv<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        writeln!(sink, "num,time")?;
        for (index, value) in self.samples.iter().enumerate() {
            writeln!(sink, "{index},{value:.4}")?;
        }
        Ok(())
    }
}

impl Default for RawRecorder {
    fn default() -> Self {
        Self::new()
    }
}
