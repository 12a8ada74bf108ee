//! ListTasks command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::StageId;
use serde::Deserialize;
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List active tasks with tags, assignees and message counts
#[operation(
    verb = "list",
    noun = "tasks",
    description = "List active tasks with their details"
)]
#[derive(Debug, Default, Deserialize)]
pub struct ListTasks {
    /// Only tasks of this stage
    #[serde(default)]
    pub stage: Option<StageId>,
}

impl ListTasks {
    pub fn in_stage(stage: StageId) -> Self {
        Self { stage: Some(stage) }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let mut tasks = ctx.load_tasks().await?;
            if let Some(stage) = self.stage {
                tasks.retain(|t| t.stage_id == stage);
            }
            Ok(serde_json::json!({
                "tasks": tasks,
                "count": tasks.len()
            }))
        }
        .await;

        ExecutionResult::read(result)
    }
}
