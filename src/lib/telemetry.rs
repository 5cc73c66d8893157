//! Telemetry initialization and report span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize `tracing` and format developer logs on stderr.
///
/// Stdout is left to command output; `RUST_LOG` raises the level (default `warn`).
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording start and finish of one report export.
pub struct ReportSpan {
    span: Span,
    started_at: Instant,
    kind: &'static str,
}

impl ReportSpan {
    /// Start a report span.
    pub fn start(kind: &'static str, key: &str) -> Self {
        let span = info_span!(
            target: "flex_support_cli::report",
            "report_export",
            kind,
            key
        );
        Self {
            span,
            started_at: Instant::now(),
            kind,
        }
    }

    /// Close the span while recording status and row count.
    pub fn finish(self, status: &'static str, rows: usize) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "flex_support_cli::report",
            kind = self.kind,
            status = status,
            rows = rows,
            elapsed_ms = elapsed_ms,
            "Completed report export"
        );
    }
}
