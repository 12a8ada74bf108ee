//! Logging helpers

use serde::Serialize;
use std::fmt::Debug;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Renders a value as YAML in log lines, with a leading newline.
///
/// ```ignore
/// debug!("board after drop: {}", Pretty(&outcome));
/// ```
///
/// Falls back to `{:#?}` when the value cannot be serialized.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> Pretty<T> {
    fn render(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.render(f)
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.render(f)
    }
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Returns false when a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
