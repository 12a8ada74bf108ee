//! Query cache for fetched board collections
//!
//! Entries are keyed by query and project. Invalidating an entry marks it
//! stale instead of dropping it, so the last known data stays readable while
//! the next load refetches.

use crate::types::{ProjectId, Stage, Task};
use dashmap::DashMap;
use std::fmt;
use tracing::trace;

/// Identifies one cached query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Stages(ProjectId),
    Tasks(ProjectId),
}

impl QueryKey {
    pub fn project(&self) -> ProjectId {
        match self {
            Self::Stages(project) | Self::Tasks(project) => *project,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stages(project) => write!(f, "stages/{}", project),
            Self::Tasks(project) => write!(f, "tasks/{}", project),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    data: T,
    fresh: bool,
}

impl<T> Entry<T> {
    fn new(data: T) -> Self {
        Self { data, fresh: true }
    }
}

/// Cached stage and task lists, per project
#[derive(Debug, Default)]
pub struct QueryCache {
    stages: DashMap<ProjectId, Entry<Vec<Stage>>>,
    tasks: DashMap<ProjectId, Entry<Vec<Task>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known stages, fresh or stale
    pub fn get_stages(&self, project: ProjectId) -> Option<Vec<Stage>> {
        self.stages.get(&project).map(|e| e.data.clone())
    }

    /// Last known tasks, fresh or stale
    pub fn get_tasks(&self, project: ProjectId) -> Option<Vec<Task>> {
        self.tasks.get(&project).map(|e| e.data.clone())
    }

    pub fn set_stages(&self, project: ProjectId, stages: Vec<Stage>) {
        trace!(%project, count = stages.len(), "cache stages");
        self.stages.insert(project, Entry::new(stages));
    }

    pub fn set_tasks(&self, project: ProjectId, tasks: Vec<Task>) {
        trace!(%project, count = tasks.len(), "cache tasks");
        self.tasks.insert(project, Entry::new(tasks));
    }

    /// Whether `key` holds data that does not need refetching
    pub fn is_fresh(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Stages(project) => self.stages.get(&project).is_some_and(|e| e.fresh),
            QueryKey::Tasks(project) => self.tasks.get(&project).is_some_and(|e| e.fresh),
        }
    }

    /// Mark one query stale
    pub fn invalidate(&self, key: QueryKey) {
        trace!(%key, "invalidate");
        match key {
            QueryKey::Stages(project) => {
                if let Some(mut entry) = self.stages.get_mut(&project) {
                    entry.fresh = false;
                }
            }
            QueryKey::Tasks(project) => {
                if let Some(mut entry) = self.tasks.get_mut(&project) {
                    entry.fresh = false;
                }
            }
        }
    }

    /// Mark every query of a project stale
    pub fn invalidate_project(&self, project: ProjectId) {
        self.invalidate(QueryKey::Stages(project));
        self.invalidate(QueryKey::Tasks(project));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StageId;

    const PROJECT: ProjectId = ProjectId::new(7);

    #[test]
    fn test_missing_entry_is_not_fresh() {
        let cache = QueryCache::new();
        assert!(!cache.is_fresh(QueryKey::Stages(PROJECT)));
        assert!(cache.get_stages(PROJECT).is_none());
        cache.invalidate(QueryKey::Tasks(PROJECT));
        assert!(cache.get_tasks(PROJECT).is_none());
    }

    #[test]
    fn test_invalidate_keeps_data_readable() {
        let cache = QueryCache::new();
        cache.set_stages(
            PROJECT,
            vec![Stage::new(StageId::new(1), PROJECT, "Todo", 1)],
        );
        assert!(cache.is_fresh(QueryKey::Stages(PROJECT)));

        cache.invalidate(QueryKey::Stages(PROJECT));
        assert!(!cache.is_fresh(QueryKey::Stages(PROJECT)));
        assert_eq!(cache.get_stages(PROJECT).unwrap().len(), 1);

        cache.set_stages(PROJECT, Vec::new());
        assert!(cache.is_fresh(QueryKey::Stages(PROJECT)));
    }

    #[test]
    fn test_invalidate_project_touches_only_that_project() {
        let cache = QueryCache::new();
        let other = ProjectId::new(8);
        cache.set_stages(PROJECT, Vec::new());
        cache.set_tasks(PROJECT, Vec::new());
        cache.set_tasks(other, Vec::new());

        cache.invalidate_project(PROJECT);
        assert!(!cache.is_fresh(QueryKey::Stages(PROJECT)));
        assert!(!cache.is_fresh(QueryKey::Tasks(PROJECT)));
        assert!(cache.is_fresh(QueryKey::Tasks(other)));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(QueryKey::Tasks(PROJECT).to_string(), "tasks/7");
        assert_eq!(QueryKey::Stages(PROJECT).project(), PROJECT);
    }
}
