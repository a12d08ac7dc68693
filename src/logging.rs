// src/logging.rs
// =============================================================================
// Sets up tracing output.
//
// Log lines go to stderr so that `--json` output on stdout stays parseable.
// RUST_LOG wins if it is set; otherwise --verbose picks debug over info.
// =============================================================================

use tracing_subscriber::EnvFilter;

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,site_mirror=debug"
    } else {
        "info,site_mirror=info"
    }
}

pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
