//! Board configuration
//!
//! Layers, lowest precedence first: built-in defaults, `stageboard.toml`,
//! `stageboard.yaml`, then `STAGEBOARD_*` environment variables.

use crate::error::Result;
use crate::types::{CardPreview, Task};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Config file names looked up in the board directory
pub const CONFIG_FILE_NAMES: [&str; 2] = ["stageboard.toml", "stageboard.yaml"];

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STAGEBOARD_";

/// Which stages get a sequence write after a stage reorder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageWriteScope {
    /// Only stages whose sequence changed
    #[default]
    Changed,
    /// Every stage on the board
    All,
}

/// What happens to the optimistic local change when a remote write fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteFailurePolicy {
    /// Leave local state as-is until the next load
    #[default]
    Keep,
    /// Restore the arrangement from before the drop
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub stage_writes: StageWriteScope,
    pub on_write_failure: WriteFailurePolicy,
    /// Pointer travel before a press becomes a drag
    pub activation_distance_px: u32,
    pub description_preview_words: usize,
    pub card_tag_limit: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            stage_writes: StageWriteScope::Changed,
            on_write_failure: WriteFailurePolicy::Keep,
            activation_distance_px: 8,
            description_preview_words: 12,
            card_tag_limit: 3,
        }
    }
}

impl BoardConfig {
    /// Load from the current directory and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(".")
    }

    /// Load from config files in `dir` and the environment
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self> {
        let figment = Self::figment(dir.as_ref());
        let config: Self = figment.extract()?;
        debug!(?config, "loaded board config");
        Ok(config)
    }

    fn figment(dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            debug!(path = %path.display(), "config file found");
            figment = if name.ends_with(".toml") {
                figment.merge(Toml::file(path))
            } else {
                figment.merge(Yaml::file(path))
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Whether pointer travel from the press point is enough to start a drag
    pub fn activates_drag(&self, dx: f64, dy: f64) -> bool {
        dx.hypot(dy) >= f64::from(self.activation_distance_px)
    }

    /// Card view of a task under this configuration
    pub fn preview(&self, task: &Task) -> CardPreview {
        task.preview(self.description_preview_words, self.card_tag_limit)
    }
}
