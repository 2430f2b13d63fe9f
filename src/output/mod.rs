//! Report output
//!
//! Console banner printed before the first workload and optional JSON
//! export of the per-workload summaries. The per-workload summary lines
//! themselves are printed by the orchestrator as each run finishes.

pub mod json;
pub mod text;
