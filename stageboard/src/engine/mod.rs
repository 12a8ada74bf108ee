//! Ordered-board engine
//!
//! Holds the ordered view of one project's stages and tasks and turns drag
//! signals into new arrangements. The engine never performs I/O: a drop
//! returns a [`DropOutcome`] naming the remote writes the caller must issue.

pub mod reorder;
mod session;

pub use reorder::{DropTarget, StageGroups};
pub use session::DragSession;

use crate::input::{Displacement, ItemRef};
use crate::types::{Stage, StageId, Task, TaskId};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::OnceCell;
use tracing::debug;

/// A stage sequence write produced by a stage reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageWrite {
    pub stage: StageId,
    pub previous: i64,
    pub sequence: i64,
}

impl StageWrite {
    pub fn changed(&self) -> bool {
        self.previous != self.sequence
    }
}

/// The single stage-membership write produced by a task move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStageWrite {
    pub task: TaskId,
    pub from: StageId,
    pub to: StageId,
}

/// Result of resolving a drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    /// Nothing changed locally and nothing needs writing
    NoOp,
    /// Stage order changed; one write per stage
    StagesReordered { writes: Vec<StageWrite> },
    /// A task moved; its stage membership must be written
    TaskMoved { write: TaskStageWrite },
}

impl DropOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Local collections captured before an optimistic change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub stages: Vec<Stage>,
    pub tasks: Vec<Task>,
}

/// In-memory ordered view of a board
#[derive(Debug, Default)]
pub struct BoardEngine {
    stages: Vec<Stage>,
    tasks: Vec<Task>,
    active_drag: Option<DragSession>,
    /// Task indices per stage, built on first use after each mutation
    grouping: OnceCell<IndexMap<StageId, Vec<usize>>>,
}

impl BoardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine seeded with the given collections
    pub fn with_data(stages: Vec<Stage>, tasks: Vec<Task>) -> Self {
        let mut engine = Self::new();
        engine.replace(stages, tasks);
        engine
    }

    /// Overwrite local state with a fresh fetch. An active drag survives.
    pub fn replace(&mut self, mut stages: Vec<Stage>, tasks: Vec<Task>) {
        reorder::sort_stages(&mut stages);
        self.stages = stages;
        self.tasks = tasks;
        self.touch();
    }

    /// Drop all board data, as after a failed load
    pub fn clear(&mut self) {
        self.stages.clear();
        self.tasks.clear();
        self.active_drag = None;
        self.touch();
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.active_drag.as_ref()
    }

    pub fn find_stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks of every stage in column order. Tasks of stages that are not on
    /// the board are not listed.
    pub fn tasks_by_stage(&self) -> IndexMap<StageId, Vec<&Task>> {
        self.grouping()
            .iter()
            .map(|(stage, indices)| (*stage, indices.iter().map(|&i| &self.tasks[i]).collect()))
            .collect()
    }

    /// Tasks of one stage in display order
    pub fn tasks_in_stage(&self, stage: StageId) -> Vec<&Task> {
        self.grouping()
            .get(&stage)
            .map(|indices| indices.iter().map(|&i| &self.tasks[i]).collect())
            .unwrap_or_default()
    }

    fn grouping(&self) -> &IndexMap<StageId, Vec<usize>> {
        self.grouping.get_or_init(|| {
            let mut grouping: IndexMap<StageId, Vec<usize>> =
                self.stages.iter().map(|s| (s.id, Vec::new())).collect();
            for (index, task) in self.tasks.iter().enumerate() {
                if let Some(indices) = grouping.get_mut(&task.stage_id) {
                    indices.push(index);
                }
            }
            grouping
        })
    }

    fn touch(&mut self) {
        self.grouping = OnceCell::new();
    }

    // =========================================================================
    // Drag lifecycle
    // =========================================================================

    /// Start a drag. Ignored while another drag is active.
    pub fn begin_drag(&mut self, item: ItemRef) -> bool {
        if let Some(active) = &self.active_drag {
            debug!(active = %active.item, ignored = %item, "drag already in progress");
            return false;
        }

        let origin_stage = item
            .as_task()
            .and_then(|id| self.find_task(id))
            .map(|t| t.stage_id);
        self.active_drag = Some(DragSession::new(item, origin_stage));
        debug!(item = %item, "drag started");
        true
    }

    /// Pointer is over `target` while dragging. A dragged task whose stage
    /// differs from the target's stage is moved there locally, keeping its
    /// position in the flat collection. Returns whether anything changed.
    pub fn hover_over(&mut self, target: ItemRef, _delta: Displacement) -> bool {
        let Some(dragged) = self.active_drag.and_then(|s| s.item.as_task()) else {
            return false;
        };

        let target_stage = match target {
            ItemRef::Stage(stage) => self.find_stage(stage).map(|s| s.id),
            ItemRef::Task(over) if over == dragged => None,
            ItemRef::Task(over) => self
                .find_task(over)
                .map(|t| t.stage_id)
                .filter(|stage| self.find_stage(*stage).is_some()),
        };
        let Some(target_stage) = target_stage else {
            return false;
        };

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == dragged) else {
            return false;
        };
        if task.stage_id == target_stage {
            return false;
        }

        debug!(
            task = %dragged,
            from = %task.stage_id,
            to = %target_stage,
            "task hovered into stage"
        );
        task.stage_id = target_stage;
        self.touch();
        true
    }

    /// Resolve the gesture. The drag session is cleared whatever happens.
    pub fn end_drag(&mut self, over: Option<ItemRef>, delta: Displacement) -> DropOutcome {
        let Some(session) = self.active_drag.take() else {
            debug!("drop without an active drag");
            return DropOutcome::NoOp;
        };
        let Some(over) = over else {
            debug!(item = %session.item, "drag released outside any target");
            return DropOutcome::NoOp;
        };

        let outcome = match session.item {
            ItemRef::Stage(dragged) => self.drop_stage(dragged, over),
            ItemRef::Task(dragged) => self.drop_task(&session, dragged, over, delta),
        };
        debug!(item = %session.item, over = %over, ?outcome, "drag resolved");
        outcome
    }

    fn drop_stage(&mut self, dragged: StageId, over: ItemRef) -> DropOutcome {
        let over_stage = match over {
            ItemRef::Stage(stage) => Some(stage),
            ItemRef::Task(task) => self.find_task(task).map(|t| t.stage_id),
        };
        let Some(over_stage) = over_stage else {
            return DropOutcome::NoOp;
        };
        let Some(reordered) = reorder::move_stage(&self.stages, dragged, over_stage) else {
            return DropOutcome::NoOp;
        };

        let writes = reordered
            .iter()
            .map(|stage| StageWrite {
                stage: stage.id,
                previous: self
                    .find_stage(stage.id)
                    .map(|s| s.sequence)
                    .unwrap_or(stage.sequence),
                sequence: stage.sequence,
            })
            .collect();

        self.stages = reordered;
        self.touch();
        DropOutcome::StagesReordered { writes }
    }

    fn drop_task(
        &mut self,
        session: &DragSession,
        dragged: TaskId,
        over: ItemRef,
        delta: Displacement,
    ) -> DropOutcome {
        let target = match over {
            ItemRef::Task(task) => DropTarget::Task(task),
            ItemRef::Stage(stage) => DropTarget::Stage(stage),
        };

        match reorder::move_task(&self.stages, &self.tasks, dragged, target, delta) {
            Some(moved) => {
                self.tasks = moved;
                self.touch();
                let Some(to) = self.find_task(dragged).map(|t| t.stage_id) else {
                    return DropOutcome::NoOp;
                };
                DropOutcome::TaskMoved {
                    write: TaskStageWrite {
                        task: dragged,
                        from: session.origin_stage.unwrap_or(to),
                        to,
                    },
                }
            }
            None => self.settle_hovered_membership(session, dragged),
        }
    }

    /// A card dropped on itself after hovering into another column still has
    /// to persist its new stage.
    fn settle_hovered_membership(&self, session: &DragSession, dragged: TaskId) -> DropOutcome {
        let current = self.find_task(dragged).map(|t| t.stage_id);
        match (session.origin_stage, current) {
            (Some(from), Some(to)) if from != to => DropOutcome::TaskMoved {
                write: TaskStageWrite {
                    task: dragged,
                    from,
                    to,
                },
            },
            _ => DropOutcome::NoOp,
        }
    }

    // =========================================================================
    // Local mutations outside drags
    // =========================================================================

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            stages: self.stages.clone(),
            tasks: self.tasks.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        self.stages = snapshot.stages;
        self.tasks = snapshot.tasks;
        self.touch();
    }

    /// Insert or replace a stage, keeping sequence order
    pub fn upsert_stage(&mut self, stage: Stage) {
        match self.stages.iter_mut().find(|s| s.id == stage.id) {
            Some(existing) => *existing = stage,
            None => self.stages.push(stage),
        }
        reorder::sort_stages(&mut self.stages);
        self.touch();
    }

    /// Remove a stage and move its tasks to the default stage.
    ///
    /// Returns false and leaves the board alone when the stage is the
    /// default one or there is no other default stage.
    pub fn remove_stage_locally(&mut self, id: StageId) -> bool {
        let Some(fallback) = self
            .stages
            .iter()
            .find(|s| s.is_default && s.id != id)
            .map(|s| s.id)
        else {
            return false;
        };
        if self.stages.iter().any(|s| s.id == id && s.is_default) {
            return false;
        }
        self.stages.retain(|s| s.id != id);
        self.tasks
            .iter_mut()
            .filter(|t| t.stage_id == id)
            .for_each(|t| t.stage_id = fallback);
        self.touch();
        true
    }

    /// Append a task at the end of the flat collection
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
        self.touch();
    }

    /// Remove tasks, e.g. after archiving them
    pub fn remove_tasks_locally(&mut self, ids: &[TaskId]) {
        self.tasks.retain(|t| !ids.contains(&t.id));
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectId;

    fn stage_row(id: u64, name: &str, sequence: i64) -> Stage {
        Stage::new(StageId::new(id), ProjectId::new(1), name, sequence)
    }

    fn task_row(id: u64, stage: u64) -> Task {
        Task::new(TaskId::new(id), ProjectId::new(1), StageId::new(stage), format!("T{id}"))
    }

    fn engine() -> BoardEngine {
        BoardEngine::with_data(
            vec![
                stage_row(2, "B", 2),
                stage_row(1, "A", 1),
                stage_row(3, "C", 3),
            ],
            vec![
                task_row(1, 1),
                task_row(2, 1),
                task_row(3, 2),
                task_row(4, 2),
            ],
        )
    }

    fn stage_ids(engine: &BoardEngine, stage: u64) -> Vec<u64> {
        engine
            .tasks_in_stage(StageId::new(stage))
            .iter()
            .map(|t| t.id.get())
            .collect()
    }

    fn task(id: u64) -> ItemRef {
        ItemRef::Task(TaskId::new(id))
    }

    fn stage(id: u64) -> ItemRef {
        ItemRef::Stage(StageId::new(id))
    }

    #[test]
    fn test_replace_sorts_stages() {
        let engine = engine();
        let names: Vec<&str> = engine.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tasks_by_stage_groups_in_column_order() {
        let engine = engine();
        let grouped = engine.tasks_by_stage();
        let keys: Vec<u64> = grouped.keys().map(|k| k.get()).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(grouped[&StageId::new(2)].len(), 2);
        assert!(grouped[&StageId::new(3)].is_empty());
    }

    #[test]
    fn test_begin_drag_ignored_while_active() {
        let mut engine = engine();
        assert!(engine.begin_drag(task(1)));
        assert!(!engine.begin_drag(task(2)));
        assert_eq!(engine.active_drag().unwrap().item, task(1));
        assert_eq!(
            engine.active_drag().unwrap().origin_stage,
            Some(StageId::new(1))
        );
    }

    #[test]
    fn test_stage_reorder_scenario() {
        let mut engine = engine();
        engine.begin_drag(stage(3));
        let outcome = engine.end_drag(Some(stage(1)), Displacement(0.0));

        let summary: Vec<(&str, i64)> = engine
            .stages()
            .iter()
            .map(|s| (s.name.as_str(), s.sequence))
            .collect();
        assert_eq!(summary, vec![("C", 1), ("A", 2), ("B", 3)]);

        let DropOutcome::StagesReordered { writes } = outcome else {
            panic!("expected a stage reorder");
        };
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(StageWrite::changed));
        assert!(engine.active_drag().is_none());
    }

    #[test]
    fn test_stage_reorder_marks_unchanged_sequences() {
        let mut engine = engine();
        engine.begin_drag(stage(2));
        let outcome = engine.end_drag(Some(stage(3)), Displacement(0.0));

        let DropOutcome::StagesReordered { writes } = outcome else {
            panic!("expected a stage reorder");
        };
        let changed: Vec<u64> = writes
            .iter()
            .filter(|w| w.changed())
            .map(|w| w.stage.get())
            .collect();
        assert_eq!(changed, vec![3, 2]);
    }

    #[test]
    fn test_stage_dropped_on_task_uses_its_stage() {
        let mut engine = engine();
        engine.begin_drag(stage(1));
        let outcome = engine.end_drag(Some(task(3)), Displacement(0.0));
        assert!(!outcome.is_noop());
        assert_eq!(engine.stages()[1].id, StageId::new(1));
    }

    #[test]
    fn test_task_move_scenario() {
        let mut engine = engine();
        engine.begin_drag(task(1));
        let outcome = engine.end_drag(Some(task(3)), Displacement(-2.0));

        assert_eq!(stage_ids(&engine, 1), vec![2]);
        assert_eq!(stage_ids(&engine, 2), vec![1, 3, 4]);
        assert_eq!(engine.tasks().len(), 4);
        assert_eq!(
            outcome,
            DropOutcome::TaskMoved {
                write: TaskStageWrite {
                    task: TaskId::new(1),
                    from: StageId::new(1),
                    to: StageId::new(2),
                }
            }
        );
    }

    #[test]
    fn test_hover_reassigns_stage_idempotently() {
        let mut engine = engine();
        engine.begin_drag(task(1));

        assert!(engine.hover_over(task(3), Displacement(0.0)));
        assert_eq!(engine.find_task(TaskId::new(1)).unwrap().stage_id, StageId::new(2));
        assert!(!engine.hover_over(task(4), Displacement(1.0)));
        assert!(!engine.hover_over(stage(2), Displacement(1.0)));

        assert!(engine.hover_over(stage(3), Displacement(0.0)));
        assert_eq!(stage_ids(&engine, 3), vec![1]);
    }

    #[test]
    fn test_hover_ignored_for_stage_drags_and_idle() {
        let mut engine = engine();
        assert!(!engine.hover_over(stage(2), Displacement(0.0)));

        engine.begin_drag(stage(1));
        assert!(!engine.hover_over(stage(2), Displacement(0.0)));
        assert_eq!(engine.find_task(TaskId::new(1)).unwrap().stage_id, StageId::new(1));
    }

    #[test]
    fn test_hover_then_drop_reports_origin_stage() {
        let mut engine = engine();
        engine.begin_drag(task(1));
        engine.hover_over(task(4), Displacement(0.0));
        let outcome = engine.end_drag(Some(task(4)), Displacement(1.0));

        assert_eq!(stage_ids(&engine, 2), vec![3, 4, 1]);
        let DropOutcome::TaskMoved { write } = outcome else {
            panic!("expected a task move");
        };
        assert_eq!(write.from, StageId::new(1));
        assert_eq!(write.to, StageId::new(2));
    }

    #[test]
    fn test_cancelled_drop_keeps_hover_change() {
        let mut engine = engine();
        engine.begin_drag(task(2));
        engine.hover_over(stage(3), Displacement(0.0));
        let outcome = engine.end_drag(None, Displacement(0.0));

        assert!(outcome.is_noop());
        assert!(engine.active_drag().is_none());
        assert_eq!(stage_ids(&engine, 3), vec![2]);
    }

    #[test]
    fn test_self_drop_is_structural_noop() {
        let mut engine = engine();
        let before = engine.snapshot();

        engine.begin_drag(task(2));
        let outcome = engine.end_drag(Some(task(2)), Displacement(6.0));

        assert!(outcome.is_noop());
        assert_eq!(engine.snapshot(), before);
        assert!(engine.active_drag().is_none());
    }

    #[test]
    fn test_self_drop_after_hover_persists_membership() {
        let mut engine = engine();
        engine.begin_drag(task(2));
        engine.hover_over(stage(3), Displacement(0.0));
        let outcome = engine.end_drag(Some(task(2)), Displacement(0.0));

        assert_eq!(
            outcome,
            DropOutcome::TaskMoved {
                write: TaskStageWrite {
                    task: TaskId::new(2),
                    from: StageId::new(1),
                    to: StageId::new(3),
                }
            }
        );
    }

    #[test]
    fn test_end_drag_without_session() {
        let mut engine = engine();
        let before = engine.snapshot();
        assert!(engine.end_drag(Some(task(1)), Displacement(0.0)).is_noop());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_remove_stage_reassigns_to_default() {
        let mut engine = BoardEngine::with_data(
            vec![stage_row(1, "A", 1).as_default(), stage_row(2, "B", 2)],
            vec![task_row(1, 2), task_row(2, 1)],
        );
        assert!(engine.remove_stage_locally(StageId::new(2)));
        assert_eq!(engine.stages().len(), 1);
        assert_eq!(stage_ids(&engine, 1), vec![1, 2]);
    }

    #[test]
    fn test_remove_stage_without_default_leaves_board() {
        let mut engine = engine();
        let before = engine.snapshot();
        assert!(!engine.remove_stage_locally(StageId::new(2)));
        assert_eq!(engine.snapshot(), before);

        let mut engine = BoardEngine::with_data(
            vec![stage_row(1, "A", 1).as_default(), stage_row(2, "B", 2)],
            vec![task_row(1, 1)],
        );
        assert!(!engine.remove_stage_locally(StageId::new(1)));
        assert_eq!(engine.stages().len(), 2);
    }

    #[test]
    fn test_upsert_and_restore() {
        let mut engine = engine();
        let before = engine.snapshot();

        engine.upsert_stage(stage_row(9, "First", 0));
        assert_eq!(engine.stages()[0].id, StageId::new(9));
        engine.push_task(task_row(5, 9));
        assert_eq!(stage_ids(&engine, 9), vec![5]);

        engine.restore(before.clone());
        assert_eq!(engine.snapshot(), before);
    }
}
