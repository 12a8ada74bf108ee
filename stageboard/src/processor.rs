//! Board operation processor
//!
//! Runs commands against a [`BoardContext`] and keeps what they log in an
//! in-memory activity feed, newest first.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use serde_json::Value;
use stageboard_operations::{async_trait, Execute, LogEntry, Operation, OperationProcessor};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const DEFAULT_ACTIVITY_LIMIT: usize = 500;

/// Processor that records logged operations
#[derive(Debug)]
pub struct BoardOperationProcessor {
    actor: Option<String>,
    capacity: usize,
    activity: RwLock<VecDeque<LogEntry>>,
}

impl Default for BoardOperationProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardOperationProcessor {
    pub fn new() -> Self {
        Self {
            actor: None,
            capacity: DEFAULT_ACTIVITY_LIMIT,
            activity: RwLock::new(VecDeque::new()),
        }
    }

    /// Stamp every recorded entry with `actor`
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Keep at most `capacity` entries; older ones are dropped
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Most recent entries first
    pub async fn activity(&self, limit: usize) -> Vec<LogEntry> {
        self.activity
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn clear_activity(&self) {
        self.activity.write().await.clear();
    }

    async fn record(&self, mut entry: LogEntry) {
        if let Some(actor) = &self.actor {
            entry.stamp(actor);
        }
        let mut activity = self.activity.write().await;
        activity.push_front(entry);
        activity.truncate(self.capacity);
    }
}

#[async_trait]
impl OperationProcessor<BoardContext, BoardError> for BoardOperationProcessor {
    async fn process<O>(&self, op: &O, ctx: &BoardContext) -> Result<Value>
    where
        O: Execute<BoardContext, BoardError> + Operation + Send + Sync,
    {
        let (result, log_entry) = op.execute(ctx).await.split();

        let op_string = op.op_string();
        match &result {
            Ok(_) => debug!(op = %op_string, project = %ctx.project(), "operation succeeded"),
            Err(error) => warn!(
                op = %op_string,
                project = %ctx.project(),
                %error,
                "operation failed"
            ),
        }

        if let Some(entry) = log_entry {
            self.record(entry).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{AddStage, ListStages, UpdateStage};
    use crate::store::MemoryBoardStore;
    use crate::types::{ProjectId, StageId};
    use std::sync::Arc;

    fn setup() -> BoardContext {
        BoardContext::new(ProjectId::new(1), Arc::new(MemoryBoardStore::new()))
    }

    #[tokio::test]
    async fn test_mutations_are_recorded_newest_first() {
        let ctx = setup();
        let processor = BoardOperationProcessor::new().with_actor("alice");

        processor.process(&AddStage::new("Todo"), &ctx).await.unwrap();
        processor.process(&AddStage::new("Done"), &ctx).await.unwrap();

        let activity = processor.activity(10).await;
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].op, "add stage");
        assert_eq!(activity[0].input["name"], "Done");
        assert_eq!(activity[0].actor.as_deref(), Some("alice"));
        assert_eq!(processor.activity(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_reads_are_not_recorded() {
        let ctx = setup();
        let processor = BoardOperationProcessor::new();
        processor.process(&ListStages, &ctx).await.unwrap();
        assert!(processor.activity(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_recorded() {
        let ctx = setup();
        let processor = BoardOperationProcessor::new();
        let result = processor
            .process(&UpdateStage::new(StageId::new(4)).with_name("x"), &ctx)
            .await;
        assert!(result.is_err());

        let activity = processor.activity(10).await;
        assert_eq!(activity.len(), 1);
        assert!(activity[0].is_rejected());
        assert!(activity[0].error().unwrap().contains("stage not found"));
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        let ctx = setup();
        let processor = BoardOperationProcessor::new().with_capacity(2);
        for name in ["a", "b", "c"] {
            processor.process(&AddStage::new(name), &ctx).await.unwrap();
        }
        let names: Vec<String> = processor
            .activity(10)
            .await
            .iter()
            .map(|e| e.input["name"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["c", "b"]);
    }
}
