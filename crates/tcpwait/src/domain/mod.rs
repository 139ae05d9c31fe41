//! Domain layer for tcpwait.
//!
//! Plain configuration values and the rules that decide whether they are
//! usable.  Nothing here touches the network, the file system or the
//! process table.

pub mod config;
pub mod policy;

pub use config::{ConfigError, Settings, WaitConfig};
pub use policy::RunPolicy;
