//! JSON summary export
//!
//! Writes the per-workload summaries collected by the orchestrator as a
//! JSON array, for downstream tooling that compares runs.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;

use crate::bench::RunSummary;
use crate::Result;

/// Write the collected workload summaries to `path` as a JSON array
pub fn write_summaries(path: &Path, summaries: &[RunSummary]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summaries)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
