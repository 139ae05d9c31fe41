//! `tracing` subscriber setup.
//!
//! All output goes to stderr so that stdout stays free for the post-check
//! command.  The level comes from the `-q` / `-v` flags; `RUST_LOG` overrides
//! it unless `-q` is given, which always silences everything.

use tracing_subscriber::EnvFilter;

/// The filter directive implied by the flags alone.
pub fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "off"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Builds the filter for the given flags, honouring `RUST_LOG` when not quiet.
pub fn build_filter(quiet: bool, verbose: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("off");
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(quiet, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
