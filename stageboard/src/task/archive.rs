//! Bulk archive commands

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{StageId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Archive several tasks at once
#[operation(verb = "archive", noun = "tasks", description = "Archive a set of tasks")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ArchiveTasks {
    pub ids: Vec<TaskId>,
}

impl ArchiveTasks {
    pub fn new(ids: Vec<TaskId>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ArchiveTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            if self.ids.is_empty() {
                return Err(BoardError::missing_field("ids"));
            }
            let report = ctx.store().archive_tasks(&self.ids).await?;
            ctx.invalidate_tasks();
            Ok(serde_json::to_value(&report)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}

/// Archive every task of one stage
#[operation(
    verb = "archive",
    noun = "stage tasks",
    description = "Archive all tasks in a stage"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct ArchiveStageTasks {
    pub stage: StageId,
}

impl ArchiveStageTasks {
    pub fn new(stage: StageId) -> Self {
        Self { stage }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ArchiveStageTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            let ids: Vec<TaskId> = ctx
                .store()
                .list_tasks_with_details(ctx.project())
                .await?
                .into_iter()
                .filter(|t| t.stage_id == self.stage)
                .map(|t| t.id)
                .collect();

            let report = if ids.is_empty() {
                Default::default()
            } else {
                ctx.store().archive_tasks(&ids).await?
            };
            ctx.invalidate_tasks();

            let mut value = serde_json::to_value(&report)?;
            value["stage_id"] = serde_json::json!(self.stage);
            Ok(value)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}
