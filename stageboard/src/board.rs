//! Board: the engine wired to the remote store
//!
//! [`Board`] is what the input layer talks to. Drag signals go to the
//! [`BoardEngine`], which rearranges local state at once; the writes named by
//! the resulting [`DropOutcome`] are then sent through the processor, and the
//! cache is invalidated so the next [`Board::load`] brings back ground truth.

use crate::config::{BoardConfig, StageWriteScope, WriteFailurePolicy};
use crate::context::BoardContext;
use crate::engine::{BoardEngine, BoardSnapshot, DropOutcome, StageWrite, TaskStageWrite};
use crate::error::{BoardError, Result};
use crate::input::{Displacement, DragSignal, ItemRef};
use crate::logging::Pretty;
use crate::processor::BoardOperationProcessor;
use crate::stage::{AddStage, DeleteStage, UpdateStage};
use crate::store::ArchiveReport;
use crate::task::{AddTask, ArchiveStageTasks, ArchiveTasks, MoveTask};
use crate::types::{CardPreview, Stage, StageId, Task, TaskId};
use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;
use stageboard_operations::{LogEntry, OperationProcessor};
use tracing::{debug, info, warn};

/// Where the initial fetch stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The fetch failed; the board shows nothing until a later load succeeds
    Failed(String),
}

/// One remote write issued after a drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub target: ItemRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteReport {
    fn from_result<T>(target: ItemRef, result: Result<T>) -> Self {
        Self {
            target,
            error: result.err().map(|e| e.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// What a drop did, locally and remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub outcome: DropOutcome,
    pub writes: Vec<WriteReport>,
    /// Local state was restored after a failed write
    pub rolled_back: bool,
}

impl SyncReport {
    fn noop() -> Self {
        Self {
            outcome: DropOutcome::NoOp,
            writes: Vec::new(),
            rolled_back: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.outcome.is_noop()
    }

    /// Every write went through
    pub fn is_synced(&self) -> bool {
        self.writes.iter().all(WriteReport::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &WriteReport> {
        self.writes.iter().filter(|w| !w.is_ok())
    }
}

/// One project's board, kept in sync with its store
#[derive(Debug)]
pub struct Board {
    ctx: BoardContext,
    engine: BoardEngine,
    processor: BoardOperationProcessor,
    config: BoardConfig,
    state: LoadState,
    /// Arrangement at drag start, kept only under the rollback policy
    drag_snapshot: Option<BoardSnapshot>,
}

impl Board {
    pub fn new(ctx: BoardContext, config: BoardConfig) -> Self {
        Self {
            ctx,
            engine: BoardEngine::new(),
            processor: BoardOperationProcessor::new(),
            config,
            state: LoadState::Loading,
            drag_snapshot: None,
        }
    }

    pub fn with_processor(mut self, processor: BoardOperationProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn context(&self) -> &BoardContext {
        &self.ctx
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn stages(&self) -> &[Stage] {
        self.engine.stages()
    }

    pub fn tasks_by_stage(&self) -> IndexMap<StageId, Vec<&Task>> {
        self.engine.tasks_by_stage()
    }

    /// Card views of one column
    pub fn cards(&self, stage: StageId) -> Vec<CardPreview> {
        self.engine
            .tasks_in_stage(stage)
            .into_iter()
            .map(|t| self.config.preview(t))
            .collect()
    }

    /// Recorded mutations, newest first
    pub async fn activity(&self, limit: usize) -> Vec<LogEntry> {
        self.processor.activity(limit).await
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch stages and tasks, serving fresh cache entries as they are.
    /// Failure empties the board and is not retried.
    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        let loaded = futures::try_join!(self.ctx.load_stages(), self.ctx.load_tasks());

        match loaded {
            Ok((stages, tasks)) => {
                info!(
                    project = %self.ctx.project(),
                    stages = stages.len(),
                    tasks = tasks.len(),
                    "board loaded"
                );
                self.engine.replace(stages, tasks);
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(error) => {
                warn!(project = %self.ctx.project(), %error, "board load failed");
                self.engine.clear();
                self.drag_snapshot = None;
                self.state = LoadState::Failed(error.to_string());
                Err(error)
            }
        }
    }

    /// Drop cached data and load again
    pub async fn reload(&mut self) -> Result<()> {
        self.ctx.invalidate_all();
        self.load().await
    }

    // =========================================================================
    // Drag lifecycle
    // =========================================================================

    pub fn begin_drag(&mut self, item: ItemRef) -> bool {
        let snapshot = (self.config.on_write_failure == WriteFailurePolicy::Rollback)
            .then(|| self.engine.snapshot());
        let started = self.engine.begin_drag(item);
        if started {
            self.drag_snapshot = snapshot;
        }
        started
    }

    pub fn hover_over(&mut self, target: ItemRef, delta: Displacement) -> bool {
        self.engine.hover_over(target, delta)
    }

    /// Resolve the gesture and push its writes to the store
    pub async fn end_drag(&mut self, over: Option<ItemRef>, delta: Displacement) -> SyncReport {
        let snapshot = self.drag_snapshot.take();
        let outcome = self.engine.end_drag(over, delta);
        debug!("drop outcome: {}", Pretty(&outcome));

        let writes = match &outcome {
            DropOutcome::NoOp => return SyncReport::noop(),
            DropOutcome::StagesReordered { writes } => {
                let writes = self.stage_writes(writes);
                let reports = write_stage_sequences(&self.processor, &self.ctx, writes).await;
                self.ctx.invalidate_stages();
                reports
            }
            DropOutcome::TaskMoved { write } => {
                let report = write_task_stage(&self.processor, &self.ctx, *write).await;
                self.ctx.invalidate_tasks();
                vec![report]
            }
        };

        let mut report = SyncReport {
            outcome,
            writes,
            rolled_back: false,
        };

        if report.is_synced() {
            info!(writes = report.writes.len(), "drop synced");
            return report;
        }

        for failure in report.failures() {
            warn!(
                item = %failure.target,
                error = failure.error.as_deref().unwrap_or_default(),
                "remote write failed"
            );
        }
        if let Some(snapshot) = snapshot {
            info!("restoring board after failed write");
            self.engine.restore(snapshot);
            report.rolled_back = true;
        }
        report
    }

    /// Feed one decoded gesture step. Only `End` produces a report.
    pub async fn apply(&mut self, signal: DragSignal) -> Option<SyncReport> {
        match signal {
            DragSignal::Start { item } => {
                self.begin_drag(item);
                None
            }
            DragSignal::Over { target, delta_y } => {
                self.hover_over(target, delta_y);
                None
            }
            DragSignal::End { over, delta_y } => Some(self.end_drag(over, delta_y).await),
        }
    }

    fn stage_writes(&self, writes: &[StageWrite]) -> Vec<StageWrite> {
        match self.config.stage_writes {
            StageWriteScope::All => writes.to_vec(),
            StageWriteScope::Changed => writes
                .iter()
                .copied()
                .filter(StageWrite::changed)
                .collect(),
        }
    }

    // =========================================================================
    // Board edits outside drags
    // =========================================================================

    pub async fn add_stage(&mut self, name: &str) -> Result<Stage> {
        let value = self.processor.process(&AddStage::new(name), &self.ctx).await?;
        let stage: Stage = serde_json::from_value(value)?;
        self.engine.upsert_stage(stage.clone());
        Ok(stage)
    }

    pub async fn rename_stage(&mut self, id: StageId, name: &str) -> Result<Stage> {
        let op = UpdateStage::new(id).with_name(name);
        let value = self.processor.process(&op, &self.ctx).await?;
        let stage: Stage = serde_json::from_value(value)?;
        self.engine.upsert_stage(stage.clone());
        Ok(stage)
    }

    /// Delete a stage; its tasks move to the default stage
    pub async fn delete_stage(&mut self, id: StageId) -> Result<()> {
        if self.engine.find_stage(id).is_none() {
            return Err(BoardError::StageNotFound { id: id.to_string() });
        }
        self.processor.process(&DeleteStage::new(id), &self.ctx).await?;
        if !self.engine.remove_stage_locally(id) {
            // The store knows a default stage this board has not loaded yet
            self.reload().await?;
        }
        Ok(())
    }

    pub async fn add_task(&mut self, task: AddTask) -> Result<Task> {
        let value = self.processor.process(&task, &self.ctx).await?;
        let task: Task = serde_json::from_value(value)?;
        self.engine.push_task(task.clone());
        Ok(task)
    }

    pub async fn archive_tasks(&mut self, ids: Vec<TaskId>) -> Result<ArchiveReport> {
        let value = self.processor.process(&ArchiveTasks::new(ids), &self.ctx).await?;
        self.settle_archive(value)
    }

    /// Archive every task of a column
    pub async fn archive_stage_tasks(&mut self, stage: StageId) -> Result<ArchiveReport> {
        let value = self
            .processor
            .process(&ArchiveStageTasks::new(stage), &self.ctx)
            .await?;
        self.settle_archive(value)
    }

    fn settle_archive(&mut self, value: serde_json::Value) -> Result<ArchiveReport> {
        let report: ArchiveReport = serde_json::from_value(value)?;
        self.engine.remove_tasks_locally(&report.archived);
        Ok(report)
    }
}

async fn write_stage_sequences(
    processor: &BoardOperationProcessor,
    ctx: &BoardContext,
    writes: Vec<StageWrite>,
) -> Vec<WriteReport> {
    let ops: Vec<UpdateStage> = writes
        .iter()
        .map(|w| UpdateStage::new(w.stage).with_sequence(w.sequence))
        .collect();

    let results = join_all(ops.iter().map(|op| processor.process(op, ctx))).await;
    ops.iter()
        .zip(results)
        .map(|(op, result)| WriteReport::from_result(ItemRef::Stage(op.id), result))
        .collect()
}

async fn write_task_stage(
    processor: &BoardOperationProcessor,
    ctx: &BoardContext,
    write: TaskStageWrite,
) -> WriteReport {
    let result = processor
        .process(&MoveTask::new(write.task, write.to), ctx)
        .await;
    WriteReport::from_result(ItemRef::Task(write.task), result)
}
