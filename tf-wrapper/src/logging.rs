//! Diagnostic tracing for the wrapper.
//!
//! Diagnostics go to stderr next to fatal error messages, so they stay at
//! `warn` unless `RUST_LOG` asks for more. Terraform's own output is routed by
//! `io::process` and never passes through here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the stderr subscriber.
///
/// ```bash
/// RUST_LOG=tf_wrapper=debug tf-wrapper -console
/// ```
pub fn init() {
    let directives = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(filter_for(directives.as_deref()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Filter built from `RUST_LOG` directives. Unset, blank, or unparsable
/// directives fall back to `warn`.
fn filter_for(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
