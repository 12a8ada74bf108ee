//! AddStage command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Append a stage to the board. The store assigns the next sequence.
#[operation(
    verb = "add",
    noun = "stage",
    description = "Append a stage at the end of the board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddStage {
    /// Display name of the new column
    pub name: String,
}

impl AddStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddStage {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            let name = self.name.trim();
            if name.is_empty() {
                return Err(BoardError::invalid_value("name", "stage name cannot be empty"));
            }

            let stage = ctx.store().create_stage(ctx.project(), name).await?;
            ctx.invalidate_stages();
            Ok(serde_json::to_value(&stage)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}
