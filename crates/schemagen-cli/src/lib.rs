//! Pipeline orchestration for schemagen.
//!
//! Ties the driver registry, the namespace correction and the source
//! generator together into one run: resolve the driver, connect, extract,
//! validate, correct, generate, and release the connection exactly once
//! whatever happened in between.

pub mod config;
pub mod pipeline;

pub use config::{CodegenConfig, ConfigRef, DatabaseConfig};
pub use pipeline::{
    ExplicitParams, PipelineError, PipelineReport, PipelineRequest, RunOverrides, run,
    run_explicit, run_from_config,
};
