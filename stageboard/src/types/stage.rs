//! Stage: a named, ordered column of a project's board

use super::ids::{ProjectId, StageId};
use serde::{Deserialize, Serialize};

/// A column on the board. `sequence` ranks columns ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub sequence: i64,
    pub project_id: ProjectId,
    /// Tasks of a deleted stage fall back here
    #[serde(default)]
    pub is_default: bool,
}

impl Stage {
    pub fn new(id: StageId, project_id: ProjectId, name: impl Into<String>, sequence: i64) -> Self {
        Self {
            id,
            name: name.into(),
            sequence,
            project_id,
            is_default: false,
        }
    }

    /// Mark this stage as the project's default stage
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Partial update for a stage. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

impl StagePatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            sequence: None,
        }
    }

    pub fn resequence(sequence: i64) -> Self {
        Self {
            name: None,
            sequence: Some(sequence),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sequence.is_none()
    }

    /// Apply the patch in place
    pub fn apply_to(&self, stage: &mut Stage) {
        if let Some(name) = &self.name {
            stage.name = name.clone();
        }
        if let Some(sequence) = self.sequence {
            stage.sequence = sequence;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let json = serde_json::to_value(StagePatch::resequence(3)).unwrap();
        assert_eq!(json, serde_json::json!({"sequence": 3}));
    }

    #[test]
    fn test_patch_apply() {
        let mut stage = Stage::new(StageId::new(1), ProjectId::new(1), "Todo", 1);
        StagePatch::rename("Backlog").apply_to(&mut stage);
        assert_eq!(stage.name, "Backlog");
        assert_eq!(stage.sequence, 1);
        assert!(StagePatch::default().is_empty());
    }
}
