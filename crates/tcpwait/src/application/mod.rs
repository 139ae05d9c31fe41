//! Application layer for tcpwait.
//!
//! Orchestrates a run: it knows *what* happens (validate, wait, decide,
//! execute) and delegates *how* to `tcpwait-core` and the infrastructure
//! layer.
//!
//! # Responsibilities
//!
//! - Turning raw [`crate::domain::Settings`] into a resolved
//!   [`crate::domain::WaitConfig`]
//! - Running the coordinator and reporting its outcome
//! - Applying the run policy to the post-check command
//! - Mapping every outcome to a process exit code

pub mod configure;
pub mod run;

pub use configure::build_config;
pub use run::{run, RunError, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_INVALID_USAGE, EXIT_SUCCESS};
