//! UpdateStage command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{StageId, StagePatch};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Rename a stage and/or rewrite its sequence. Stage reorders issue one of
/// these per stage.
#[operation(
    verb = "update",
    noun = "stage",
    description = "Rename a stage or change its sequence"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateStage {
    pub id: StageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

impl UpdateStage {
    pub fn new(id: StageId) -> Self {
        Self {
            id,
            name: None,
            sequence: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    fn patch(&self) -> StagePatch {
        StagePatch {
            name: self.name.clone(),
            sequence: self.sequence,
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateStage {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            let patch = self.patch();
            if patch.is_empty() {
                return Err(BoardError::missing_field("name or sequence"));
            }
            if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                return Err(BoardError::invalid_value("name", "stage name cannot be empty"));
            }

            let stage = ctx
                .store()
                .update_stage(ctx.project(), self.id, patch)
                .await?;
            ctx.invalidate_stages();
            Ok(serde_json::to_value(&stage)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}
