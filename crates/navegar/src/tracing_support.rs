//! Tracing subscriber setup.

use crate::settings::Settings;

/// Install a global tracing subscriber honoring the configured log level.
/// `RUST_LOG` takes precedence when set. Safe to call more than once; a
/// second call leaves the existing subscriber in place.
pub fn init(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.log_level.clone()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let settings = Settings::default();
        init(&settings);
        init(&settings);
    }
}
