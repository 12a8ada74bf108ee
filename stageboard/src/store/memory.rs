//! In-process store used by tests and demos

use super::{ArchiveReport, BoardStore};
use crate::engine::reorder;
use crate::error::{BoardError, Result};
use crate::types::{
    NewTask, Priority, ProjectId, Stage, StageId, StagePatch, Task, TaskId, UserRef,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::trace;

#[derive(Debug, Default)]
struct MemoryState {
    stages: IndexMap<StageId, Stage>,
    /// Creation order is listing order
    tasks: IndexMap<TaskId, Task>,
    message_counts: HashMap<TaskId, u32>,
}

/// A [`BoardStore`] held entirely in memory.
///
/// Failures can be injected: `fail_next_writes(n)` makes the next `n` write
/// calls return [`BoardError::Remote`], `fail_loads(true)` does the same for
/// both list calls until switched off.
#[derive(Debug)]
pub struct MemoryBoardStore {
    state: RwLock<MemoryState>,
    next_id: AtomicU64,
    failing_writes: AtomicUsize,
    failing_loads: AtomicBool,
    writes: AtomicUsize,
    loads: AtomicUsize,
}

impl Default for MemoryBoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            next_id: AtomicU64::new(1),
            failing_writes: AtomicUsize::new(0),
            failing_loads: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    /// Insert a stage as-is
    pub async fn seed_stage(&self, stage: Stage) {
        self.bump_past(stage.id.get());
        self.state.write().await.stages.insert(stage.id, stage);
    }

    /// Insert a task as-is
    pub async fn seed_task(&self, task: Task) {
        self.bump_past(task.id.get());
        self.state.write().await.tasks.insert(task.id, task);
    }

    pub async fn set_message_count(&self, task: TaskId, count: u32) {
        self.state.write().await.message_counts.insert(task, count);
    }

    /// Make the next `count` write calls fail
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Make list calls fail until switched off
    pub fn fail_loads(&self, failing: bool) {
        self.failing_loads.store(failing, Ordering::SeqCst);
    }

    /// Number of write calls received, failed ones included
    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of list calls received, failed ones included
    pub fn load_calls(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Stored task, archived ones included
    pub async fn task(&self, id: TaskId) -> Option<Task> {
        self.state.read().await.tasks.get(&id).cloned()
    }

    /// Stored stage
    pub async fn stage(&self, id: StageId) -> Option<Stage> {
        self.state.read().await.stages.get(&id).cloned()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn bump_past(&self, id: u64) {
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    fn begin_write(&self, operation: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            trace!(operation, "injected write failure");
            return Err(BoardError::remote(operation, "injected failure"));
        }
        Ok(())
    }

    fn begin_load(&self, operation: &str) -> Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing_loads.load(Ordering::SeqCst) {
            return Err(BoardError::remote(operation, "injected failure"));
        }
        Ok(())
    }
}

impl MemoryState {
    fn project_stages(&self, project: ProjectId) -> Vec<Stage> {
        let mut stages: Vec<Stage> = self
            .stages
            .values()
            .filter(|s| s.project_id == project)
            .cloned()
            .collect();
        reorder::sort_stages(&mut stages);
        stages
    }

    fn stage_in_project(&self, project: ProjectId, id: StageId) -> Result<&Stage> {
        self.stages
            .get(&id)
            .filter(|s| s.project_id == project)
            .ok_or_else(|| BoardError::StageNotFound { id: id.to_string() })
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn list_stages(&self, project: ProjectId) -> Result<Vec<Stage>> {
        self.begin_load("list stages")?;
        Ok(self.state.read().await.project_stages(project))
    }

    async fn create_stage(&self, project: ProjectId, name: &str) -> Result<Stage> {
        self.begin_write("create stage")?;
        let mut state = self.state.write().await;
        let sequence = reorder::next_sequence(&state.project_stages(project));
        let stage = Stage::new(StageId::new(self.allocate_id()), project, name, sequence);
        state.stages.insert(stage.id, stage.clone());
        Ok(stage)
    }

    async fn update_stage(
        &self,
        project: ProjectId,
        stage: StageId,
        patch: StagePatch,
    ) -> Result<Stage> {
        self.begin_write("update stage")?;
        let mut state = self.state.write().await;
        state.stage_in_project(project, stage)?;
        let stored = state
            .stages
            .get_mut(&stage)
            .ok_or_else(|| BoardError::StageNotFound {
                id: stage.to_string(),
            })?;
        patch.apply_to(stored);
        Ok(stored.clone())
    }

    async fn delete_stage(&self, project: ProjectId, stage: StageId) -> Result<()> {
        self.begin_write("delete stage")?;
        let mut state = self.state.write().await;
        if state.stage_in_project(project, stage)?.is_default {
            return Err(BoardError::DefaultStage {
                id: stage.to_string(),
            });
        }

        let fallback = state
            .stages
            .values()
            .find(|s| s.project_id == project && s.is_default)
            .map(|s| s.id)
            .ok_or_else(|| BoardError::NoDefaultStage {
                project: project.to_string(),
                id: stage.to_string(),
            })?;
        state
            .tasks
            .values_mut()
            .filter(|t| t.stage_id == stage)
            .for_each(|t| t.stage_id = fallback);

        state.stages.shift_remove(&stage);
        Ok(())
    }

    async fn list_tasks_with_details(&self, project: ProjectId) -> Result<Vec<Task>> {
        self.begin_load("list tasks")?;
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project && t.active)
            .map(|t| {
                let mut task = t.clone();
                task.message_count = state.message_counts.get(&t.id).copied().unwrap_or(0);
                task
            })
            .collect())
    }

    async fn update_task_stage(&self, task: TaskId, stage: StageId) -> Result<()> {
        self.begin_write("update task stage")?;
        let mut state = self.state.write().await;
        let project = state
            .tasks
            .get(&task)
            .map(|t| t.project_id)
            .ok_or_else(|| BoardError::TaskNotFound {
                id: task.to_string(),
            })?;
        state.stage_in_project(project, stage)?;
        if let Some(stored) = state.tasks.get_mut(&task) {
            stored.stage_id = stage;
        }
        Ok(())
    }

    async fn create_task(&self, project: ProjectId, new_task: NewTask) -> Result<Task> {
        self.begin_write("create task")?;
        let mut state = self.state.write().await;

        let stage = match new_task.stage_id {
            Some(stage) => state.stage_in_project(project, stage)?.id,
            None => {
                let stages = state.project_stages(project);
                stages
                    .iter()
                    .find(|s| s.is_default)
                    .or_else(|| stages.first())
                    .map(|s| s.id)
                    .ok_or_else(|| BoardError::missing_field("stage_id"))?
            }
        };

        let mut task = Task::new(TaskId::new(self.allocate_id()), project, stage, new_task.name)
            .with_priority(new_task.priority.unwrap_or_else(Priority::default))
            .with_assignees(new_task.assignee_ids.into_iter().map(UserRef::new).collect());
        if let Some(description) = new_task.description {
            task.description = description;
        }

        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn archive_tasks(&self, ids: &[TaskId]) -> Result<ArchiveReport> {
        self.begin_write("archive tasks")?;
        let mut state = self.state.write().await;
        let mut report = ArchiveReport::default();
        for id in ids {
            match state.tasks.get_mut(id) {
                Some(task) => {
                    task.active = false;
                    report.archived.push(*id);
                }
                None => report.not_found.push(*id),
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: ProjectId = ProjectId::new(1);

    fn stage(id: u64, name: &str, sequence: i64) -> Stage {
        Stage::new(StageId::new(id), PROJECT, name, sequence)
    }

    fn task(id: u64, stage: u64, name: &str) -> Task {
        Task::new(TaskId::new(id), PROJECT, StageId::new(stage), name)
    }

    async fn store() -> MemoryBoardStore {
        let store = MemoryBoardStore::new();
        store
            .seed_stage(stage(1, "Backlog", 1).as_default())
            .await;
        store.seed_stage(stage(2, "Doing", 2)).await;
        store.seed_task(task(10, 2, "Write docs")).await;
        store
    }

    #[tokio::test]
    async fn test_create_stage_assigns_next_sequence() {
        let store = store().await;
        let stage = store.create_stage(PROJECT, "Done").await.unwrap();
        assert_eq!(stage.sequence, 3);
        assert!(stage.id.get() > 10);

        let empty = store.create_stage(ProjectId::new(2), "First").await.unwrap();
        assert_eq!(empty.sequence, 1);
    }

    #[tokio::test]
    async fn test_list_stages_sorted() {
        let store = store().await;
        store
            .update_stage(PROJECT, StageId::new(1), StagePatch::resequence(5))
            .await
            .unwrap();
        let names: Vec<String> = store
            .list_stages(PROJECT)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Doing", "Backlog"]);
    }

    #[tokio::test]
    async fn test_update_stage_in_other_project_is_not_found() {
        let store = store().await;
        let result = store
            .update_stage(ProjectId::new(2), StageId::new(1), StagePatch::rename("x"))
            .await;
        assert!(matches!(result, Err(BoardError::StageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_default_stage_refused() {
        let store = store().await;
        let result = store.delete_stage(PROJECT, StageId::new(1)).await;
        assert!(matches!(result, Err(BoardError::DefaultStage { .. })));
    }

    #[tokio::test]
    async fn test_delete_stage_reassigns_tasks() {
        let store = store().await;
        store.delete_stage(PROJECT, StageId::new(2)).await.unwrap();
        let task = store.task(TaskId::new(10)).await.unwrap();
        assert_eq!(task.stage_id, StageId::new(1));
        assert!(store.stage(StageId::new(2)).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_stage_without_default_is_refused() {
        let store = MemoryBoardStore::new();
        store.seed_stage(stage(1, "A", 1)).await;
        store.seed_stage(stage(2, "B", 2)).await;
        store.seed_task(task(3, 2, "t")).await;

        let result = store.delete_stage(PROJECT, StageId::new(2)).await;
        assert!(matches!(result, Err(BoardError::NoDefaultStage { .. })));
        assert!(store.stage(StageId::new(2)).await.is_some());
        let task = store.task(TaskId::new(3)).await.unwrap();
        assert_eq!(task.stage_id, StageId::new(2));
    }

    #[tokio::test]
    async fn test_tasks_with_details() {
        let store = store().await;
        store.set_message_count(TaskId::new(10), 4).await;
        let tasks = store.list_tasks_with_details(PROJECT).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].message_count, 4);
    }

    #[tokio::test]
    async fn test_create_task_defaults_to_default_stage() {
        let store = store().await;
        let task = store
            .create_task(PROJECT, NewTask::new("Triage"))
            .await
            .unwrap();
        assert_eq!(task.stage_id, StageId::new(1));

        let missing = store
            .create_task(PROJECT, NewTask::new("x").in_stage(StageId::new(99)))
            .await;
        assert!(matches!(missing, Err(BoardError::StageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_task_stage_validates() {
        let store = store().await;
        store
            .update_task_stage(TaskId::new(10), StageId::new(1))
            .await
            .unwrap();
        assert_eq!(
            store.task(TaskId::new(10)).await.unwrap().stage_id,
            StageId::new(1)
        );

        let missing = store.update_task_stage(TaskId::new(99), StageId::new(1)).await;
        assert!(matches!(missing, Err(BoardError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_archive_hides_tasks() {
        let store = store().await;
        let report = store
            .archive_tasks(&[TaskId::new(10), TaskId::new(77)])
            .await
            .unwrap();
        assert_eq!(report.archived, vec![TaskId::new(10)]);
        assert_eq!(report.not_found, vec![TaskId::new(77)]);
        assert!(store.list_tasks_with_details(PROJECT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = store().await;
        store.fail_next_writes(1);
        assert!(store
            .update_task_stage(TaskId::new(10), StageId::new(1))
            .await
            .is_err());
        assert!(store
            .update_task_stage(TaskId::new(10), StageId::new(1))
            .await
            .is_ok());
        assert_eq!(store.write_calls(), 2);

        store.fail_loads(true);
        assert!(store.list_stages(PROJECT).await.is_err());
        store.fail_loads(false);
        assert!(store.list_stages(PROJECT).await.is_ok());
    }
}
