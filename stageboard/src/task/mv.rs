//! MoveTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{StageId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Persist a task's stage membership. Position within the stage is not stored.
#[operation(verb = "move", noun = "task", description = "Move a task to another stage")]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    pub id: TaskId,
    pub stage: StageId,
}

impl MoveTask {
    pub fn new(id: TaskId, stage: StageId) -> Self {
        Self { id, stage }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            ctx.store().update_task_stage(self.id, self.stage).await?;
            ctx.invalidate_tasks();
            Ok(serde_json::json!({
                "id": self.id,
                "stage_id": self.stage
            }))
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}
