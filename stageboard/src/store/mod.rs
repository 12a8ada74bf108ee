//! Remote ordered-collection store
//!
//! The store is the system of record. The engine only ever talks to it through
//! [`BoardStore`]; an HTTP client, a database or [`MemoryBoardStore`] can sit
//! behind the trait.

mod memory;

pub use memory::MemoryBoardStore;

use crate::error::Result;
use crate::types::{NewTask, ProjectId, Stage, StageId, StagePatch, Task, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a bulk archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub archived: Vec<TaskId>,
    pub not_found: Vec<TaskId>,
}

/// Remote operations the board relies on
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Stages of a project, ordered by sequence
    async fn list_stages(&self, project: ProjectId) -> Result<Vec<Stage>>;

    /// Append a stage; the store assigns the next sequence (max + 1, or 1)
    async fn create_stage(&self, project: ProjectId, name: &str) -> Result<Stage>;

    /// Rename and/or resequence a stage
    async fn update_stage(
        &self,
        project: ProjectId,
        stage: StageId,
        patch: StagePatch,
    ) -> Result<Stage>;

    /// Delete a stage, reassigning its tasks to the default stage.
    ///
    /// Fails when the stage is the default one or the project has none.
    async fn delete_stage(&self, project: ProjectId, stage: StageId) -> Result<()>;

    /// Active tasks of a project with tags, assignees and message counts filled in
    async fn list_tasks_with_details(&self, project: ProjectId) -> Result<Vec<Task>>;

    /// Persist a task's stage membership
    async fn update_task_stage(&self, task: TaskId, stage: StageId) -> Result<()>;

    /// Create a task
    async fn create_task(&self, project: ProjectId, task: NewTask) -> Result<Task>;

    /// Archive several tasks at once
    async fn archive_tasks(&self, ids: &[TaskId]) -> Result<ArchiveReport>;
}
