//! Infrastructure layer for tcpwait.
//!
//! Handles everything that touches the outside world apart from the TCP
//! probes themselves (those live in `tcpwait-core`).
//!
//! # Responsibilities
//!
//! - Reading the optional TOML config file
//! - Spawning the post-check command with inherited stdio
//! - Installing the global `tracing` subscriber

pub mod command;
pub mod config_file;
pub mod logging;
