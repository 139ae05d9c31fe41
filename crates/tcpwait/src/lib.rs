//! tcpwait library crate.
//!
//! Everything the `tcpwait` binary does apart from argument parsing lives
//! here, so it can be exercised from tests without spawning the binary.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! main.rs  (clap CLI, exit codes)
//!         ↓
//! [tcpwait]
//!   ├── domain/           WaitConfig, Settings, RunPolicy, ConfigError
//!   ├── application/      configure (validate + resolve), run (wait + policy)
//!   └── infrastructure/
//!         ├── config_file/ TOML config file loading
//!         ├── command/     post-check subprocess
//!         └── logging/     tracing subscriber setup
//!         ↓
//! [tcpwait-core]  Coordinator + TcpProber
//! ```
//!
//! # Layer rules
//!
//! - `domain` performs no I/O.
//! - `application` depends on `domain`, `tcpwait-core` and the
//!   `infrastructure` entry points it orchestrates.
//! - `infrastructure` owns files, processes and the global subscriber.

/// Domain layer: configuration values and the run policy.
pub mod domain;

/// Application layer: building a configuration and running a wait.
pub mod application;

/// Infrastructure layer: config file, subprocess, logging.
pub mod infrastructure;
