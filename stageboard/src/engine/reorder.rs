//! Pure reordering functions over stage and task slices.
//!
//! Nothing here touches the network or any cache: every function takes the
//! current collections and returns new ones (or `None` when the gesture
//! changes nothing).

use crate::input::Displacement;
use crate::types::{Stage, StageId, Task, TaskId};
use indexmap::IndexMap;

/// Where a dragged task was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// On another card
    Task(TaskId),
    /// On a column's empty drop area
    Stage(StageId),
}

/// Sequence for a newly appended stage: max + 1, or 1 on an empty board
pub fn next_sequence(stages: &[Stage]) -> i64 {
    stages
        .iter()
        .map(|s| s.sequence)
        .max()
        .map(|max| max + 1)
        .unwrap_or(1)
}

/// Sort stages by sequence. Stable, so ties keep their fetch order.
pub fn sort_stages(stages: &mut [Stage]) {
    stages.sort_by_key(|s| s.sequence);
}

/// Remove the element at `from` and reinsert it at `to`
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Move `dragged` to the index currently held by `over`, then renumber every
/// stage's sequence densely from 1.
pub fn move_stage(stages: &[Stage], dragged: StageId, over: StageId) -> Option<Vec<Stage>> {
    let old_index = stages.iter().position(|s| s.id == dragged)?;
    let new_index = stages.iter().position(|s| s.id == over)?;
    if old_index == new_index {
        return None;
    }

    let mut reordered = stages.to_vec();
    array_move(&mut reordered, old_index, new_index);
    for (position, stage) in reordered.iter_mut().enumerate() {
        stage.sequence = position as i64 + 1;
    }
    Some(reordered)
}

/// Tasks grouped per stage in stage order, plus tasks whose stage is not on
/// the board. Within a group, order is position in the flat collection.
#[derive(Debug, Clone, Default)]
pub struct StageGroups {
    pub groups: IndexMap<StageId, Vec<Task>>,
    pub orphans: Vec<Task>,
}

impl StageGroups {
    /// Flatten back to one collection: groups in stage order, orphans last
    pub fn flatten(self) -> Vec<Task> {
        let mut flat: Vec<Task> = self.groups.into_values().flatten().collect();
        flat.extend(self.orphans);
        flat
    }

    /// Global index of position `index_in_stage` of `stage` in the flattened collection
    pub fn global_index(&self, stage: StageId, index_in_stage: usize) -> Option<usize> {
        let stage_position = self.groups.get_index_of(&stage)?;
        let preceding: usize = self
            .groups
            .values()
            .take(stage_position)
            .map(Vec::len)
            .sum();
        Some(preceding + index_in_stage)
    }
}

/// Group tasks by stage, in the order of `stages`
pub fn group_by_stage(stages: &[Stage], tasks: &[Task]) -> StageGroups {
    let mut groups: IndexMap<StageId, Vec<Task>> =
        stages.iter().map(|s| (s.id, Vec::new())).collect();
    let mut orphans = Vec::new();

    for task in tasks {
        match groups.get_mut(&task.stage_id) {
            Some(group) => group.push(task.clone()),
            None => orphans.push(task.clone()),
        }
    }

    StageGroups { groups, orphans }
}

/// Move task `dragged` onto `target`.
///
/// Dropped on a column, the task goes to the end of that column. Dropped on a
/// card, it lands right after the card when `delta` points below it and right
/// before it otherwise. The index inside the column is then translated to a
/// position in the flat collection, which comes back regrouped in stage order.
///
/// Returns `None` for drops that cannot change anything: unknown task or
/// target, a target stage that is not on the board, or a card dropped on
/// itself.
pub fn move_task(
    stages: &[Stage],
    tasks: &[Task],
    dragged: TaskId,
    target: DropTarget,
    delta: Displacement,
) -> Option<Vec<Task>> {
    let active = tasks.iter().find(|t| t.id == dragged)?;

    let target_stage = match target {
        DropTarget::Task(over) => tasks.iter().find(|t| t.id == over)?.stage_id,
        DropTarget::Stage(stage) => stage,
    };
    if !stages.iter().any(|s| s.id == target_stage) {
        return None;
    }
    if target == DropTarget::Task(dragged) && active.stage_id == target_stage {
        return None;
    }

    let mut grouped = group_by_stage(stages, tasks);
    match grouped.groups.get_mut(&active.stage_id) {
        Some(group) => group.retain(|t| t.id != dragged),
        None => grouped.orphans.retain(|t| t.id != dragged),
    }

    let group = grouped.groups.get(&target_stage)?;
    let index_in_stage = match target {
        DropTarget::Stage(_) => group.len(),
        DropTarget::Task(over) => {
            let over_index = group.iter().position(|t| t.id == over)?;
            over_index + usize::from(delta.is_below())
        }
    };
    let at = grouped.global_index(target_stage, index_in_stage)?;

    let mut moved = active.clone();
    moved.stage_id = target_stage;
    let mut flat = grouped.flatten();
    flat.insert(at, moved);
    Some(flat)
}
