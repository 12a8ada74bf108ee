//! AddTask command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{NewTask, Priority, StageId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Create a task. Without a stage it lands in the default stage.
#[operation(verb = "add", noun = "task", description = "Create a new task on the board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<UserId>,
}

impl AddTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            priority: None,
            stage: None,
            assignees: Vec::new(),
        }
    }

    pub fn in_stage(mut self, stage: StageId) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<UserId>) -> Self {
        self.assignees = assignees;
        self
    }

    fn to_new_task(&self) -> NewTask {
        NewTask {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            priority: self.priority,
            stage_id: self.stage,
            assignee_ids: self.assignees.clone(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            let new_task = self.to_new_task();
            if new_task.name.is_empty() {
                return Err(BoardError::invalid_value("name", "task name cannot be empty"));
            }

            let task = ctx.store().create_task(ctx.project(), new_task).await?;
            ctx.invalidate_tasks();
            Ok(serde_json::to_value(&task)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}
