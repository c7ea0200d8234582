//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
///
/// Logs go to stderr so they never interfere with the MCP protocol on stdout.
/// `DOCSEARCH_LOG_FORMAT=json` switches to JSON lines.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::from_default_env().add_directive(
            if is_test {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }
            .into(),
        );
        let json = std::env::var("DOCSEARCH_LOG_FORMAT").is_ok_and(|format| format == "json");

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE);

        if is_test {
            // Another test harness may already own the global subscriber
            let _ = builder.compact().with_test_writer().try_init();
        } else if json {
            if let Err(e) = builder.json().with_writer(std::io::stderr).try_init() {
                eprintln!("Failed to initialize tracing: {}", e)
            }
        } else if let Err(e) = builder.compact().with_writer(std::io::stderr).try_init() {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
