//! Build orchestration for crossplat.
//!
//! Given a resolved platform set, plans one [`ResolvedTarget`] per pair,
//! runs the compiler for each, and packages every successful binary into
//! its own archive. A compile failure is recorded and the batch continues;
//! a packaging failure stops the run.

pub mod compiler;
pub mod config;
pub mod error;
pub mod orchestrate;
pub mod report;
pub mod target;

pub use compiler::{CompileError, CompileRequest, Compiler, GoCompiler};
pub use config::{BuildConfig, DEFAULT_OUTPUT_DIR};
pub use error::{BuildError, Result};
pub use orchestrate::Orchestrator;
pub use report::{BuildReport, TargetOutcome, TargetReport};
pub use target::{plan, ResolvedTarget, STAGING_DIR};
