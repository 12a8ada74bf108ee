//! Drag session: the ephemeral record of the item being dragged

use crate::input::{ItemKind, ItemRef};
use crate::types::StageId;
use serde::Serialize;

/// The item currently held by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DragSession {
    pub item: ItemRef,
    /// Stage a dragged task belonged to when the gesture began. Hover can
    /// change the task's stage before the drop; this remembers where it started.
    pub origin_stage: Option<StageId>,
}

impl DragSession {
    pub fn new(item: ItemRef, origin_stage: Option<StageId>) -> Self {
        Self { item, origin_stage }
    }

    pub fn kind(&self) -> ItemKind {
        self.item.kind()
    }
}
