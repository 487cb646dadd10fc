//! Observability utilities.

mod stage_span;

pub use stage_span::StageSpan;

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` formatter filtered by `filter`
/// (e.g. `"stagestream=debug"`).
///
/// `RUST_LOG` takes precedence when set. Returns false if a global
/// subscriber was already installed.
pub fn init_tracing(filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_repeatable() {
        // A second install must not panic, whichever call won.
        let _ = init_tracing("stagestream=trace");
        assert!(!init_tracing("stagestream=debug"));
    }
}
