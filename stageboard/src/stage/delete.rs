//! DeleteStage command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::StageId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Delete a stage. Its tasks move to the default stage, so a project
/// without one refuses the delete.
#[operation(
    verb = "delete",
    noun = "stage",
    description = "Delete a stage, moving its tasks to the default stage"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteStage {
    pub id: StageId,
}

impl DeleteStage {
    pub fn new(id: StageId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteStage {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result: Result<Value> = async {
            ctx.store().delete_stage(ctx.project(), self.id).await?;
            ctx.invalidate_all();
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.id
            }))
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::mutation(self.op_string(), input, result, duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBoardStore;
    use crate::types::{ProjectId, Stage, Task, TaskId};
    use std::sync::Arc;

    const PROJECT: ProjectId = ProjectId::new(1);

    async fn setup() -> (Arc<MemoryBoardStore>, BoardContext) {
        let store = Arc::new(MemoryBoardStore::new());
        store
            .seed_stage(Stage::new(StageId::new(1), PROJECT, "Inbox", 1).as_default())
            .await;
        store
            .seed_stage(Stage::new(StageId::new(2), PROJECT, "Doing", 2))
            .await;
        store
            .seed_task(Task::new(TaskId::new(5), PROJECT, StageId::new(2), "Ship"))
            .await;
        let ctx = BoardContext::new(PROJECT, store.clone());
        (store, ctx)
    }

    #[tokio::test]
    async fn test_delete_stage_moves_tasks_to_default() {
        let (store, ctx) = setup().await;
        let result = DeleteStage::new(StageId::new(2))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["deleted"], true);
        assert_eq!(result["id"], 2);

        let task = store.task(TaskId::new(5)).await.unwrap();
        assert_eq!(task.stage_id, StageId::new(1));
        assert_eq!(ctx.load_stages().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_default_stage_fails() {
        let (_store, ctx) = setup().await;
        let result = DeleteStage::new(StageId::new(1))
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::DefaultStage { .. })));
    }

    #[tokio::test]
    async fn test_delete_without_default_stage_keeps_tasks() {
        let store = Arc::new(MemoryBoardStore::new());
        store
            .seed_stage(Stage::new(StageId::new(2), PROJECT, "Doing", 1))
            .await;
        store
            .seed_task(Task::new(TaskId::new(5), PROJECT, StageId::new(2), "Ship"))
            .await;
        let ctx = BoardContext::new(PROJECT, store.clone());

        let (result, log_entry) = DeleteStage::new(StageId::new(2))
            .execute(&ctx)
            .await
            .split();
        assert!(log_entry.is_some());
        assert!(matches!(result, Err(BoardError::NoDefaultStage { .. })));
        assert!(store.task(TaskId::new(5)).await.is_some());
        assert_eq!(ctx.load_stages().await.unwrap().len(), 1);
    }
}
