//! Drag-gesture input boundary
//!
//! The pointer library identifies draggables with prefixed strings such as
//! `"task-12"` and `"stage-3"`, plus a `type` discriminator in the payload.
//! Those are decoded into [`ItemRef`] here, once, so the engine never parses
//! strings.

use crate::error::{BoardError, Result};
use crate::types::{StageId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of item is being dragged or hovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Stage,
    Task,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Task => "task",
        }
    }
}

impl FromStr for ItemKind {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stage" => Ok(Self::Stage),
            "task" => Ok(Self::Task),
            other => Err(BoardError::invalid_item_ref(other, "unknown item kind")),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a draggable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    Stage(StageId),
    Task(TaskId),
}

impl ItemRef {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Stage(_) => ItemKind::Stage,
            Self::Task(_) => ItemKind::Task,
        }
    }

    pub fn as_stage(&self) -> Option<StageId> {
        match self {
            Self::Stage(id) => Some(*id),
            Self::Task(_) => None,
        }
    }

    pub fn as_task(&self) -> Option<TaskId> {
        match self {
            Self::Task(id) => Some(*id),
            Self::Stage(_) => None,
        }
    }

    /// Decode a prefixed identifier, cross-checking the payload's `type` if given.
    pub fn decode(raw: &str, kind_hint: Option<&str>) -> Result<Self> {
        let item: ItemRef = raw.parse()?;
        if let Some(hint) = kind_hint {
            let hinted: ItemKind = hint.parse()?;
            if hinted != item.kind() {
                return Err(BoardError::invalid_item_ref(
                    raw,
                    format!("payload type '{}' disagrees with the id prefix", hint),
                ));
            }
        }
        Ok(item)
    }
}

impl FromStr for ItemRef {
    type Err = BoardError;

    fn from_str(raw: &str) -> Result<Self> {
        let (prefix, id) = raw
            .split_once('-')
            .ok_or_else(|| BoardError::invalid_item_ref(raw, "expected '<kind>-<id>'"))?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BoardError::invalid_item_ref(raw, "id is not a number"));
        }
        let id: u64 = id
            .parse()
            .map_err(|_| BoardError::invalid_item_ref(raw, "id out of range"))?;

        match prefix.parse::<ItemKind>() {
            Ok(ItemKind::Stage) => Ok(Self::Stage(StageId::new(id))),
            Ok(ItemKind::Task) => Ok(Self::Task(TaskId::new(id))),
            Err(_) => Err(BoardError::invalid_item_ref(raw, "unknown prefix")),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(id) => write!(f, "stage-{}", id),
            Self::Task(id) => write!(f, "task-{}", id),
        }
    }
}

/// Vertical pointer displacement at drop time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Displacement(pub f64);

impl Displacement {
    /// Positive displacement means the pointer ended below the target
    pub fn is_below(self) -> bool {
        self.0 > 0.0
    }
}

impl From<f64> for Displacement {
    fn from(delta_y: f64) -> Self {
        Self(delta_y)
    }
}

/// One step of a drag gesture, already decoded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum DragSignal {
    Start {
        item: ItemRef,
    },
    Over {
        target: ItemRef,
        delta_y: Displacement,
    },
    End {
        over: Option<ItemRef>,
        delta_y: Displacement,
    },
}
