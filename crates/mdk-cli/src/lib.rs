//! Library components behind the `mdk` binary: run configuration,
//! logging setup, the submission pipeline, and the run report.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
