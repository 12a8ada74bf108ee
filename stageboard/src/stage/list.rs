//! ListStages command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use serde::Deserialize;
use serde_json::Value;
use stageboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List the board's stages
#[operation(
    verb = "list",
    noun = "stages",
    description = "List stages ordered by sequence"
)]
#[derive(Debug, Default, Deserialize)]
pub struct ListStages;

#[async_trait]
impl Execute<BoardContext, BoardError> for ListStages {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let stages = ctx.load_stages().await?;
            Ok(serde_json::json!({
                "stages": stages,
                "count": stages.len()
            }))
        }
        .await;

        ExecutionResult::read(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBoardStore;
    use crate::types::{ProjectId, Stage, StageId};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_stages_ordered() {
        let project = ProjectId::new(1);
        let store = Arc::new(MemoryBoardStore::new());
        store
            .seed_stage(Stage::new(StageId::new(1), project, "Done", 2))
            .await;
        store
            .seed_stage(Stage::new(StageId::new(2), project, "Todo", 1))
            .await;
        let ctx = BoardContext::new(project, store);

        let result = ListStages.execute(&ctx).await;
        assert!(!result.should_log());

        let value = result.into_result().unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["stages"][0]["name"], "Todo");
        assert_eq!(value["stages"][1]["name"], "Done");
    }
}
