use std::env;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if verbose {
        debug!("verbose logging enabled");
    }
}

/// Operator-facing progress line tagged with the pipeline stage.
pub fn stage(stage: &str, message: impl AsRef<str>) {
    info!(stage, "{}", message.as_ref());
}

pub fn env_flag() -> bool {
    env::var("VOXTAX_VERBOSE")
        .map(|value| parse_bool(&value))
        .unwrap_or(false)
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_truthy_values() {
        for raw in ["1", "true", " YES ", "On"] {
            assert!(parse_bool(raw), "{raw}");
        }
        for raw in ["0", "false", "", "maybe"] {
            assert!(!parse_bool(raw), "{raw}");
        }
    }
}
