//! BoardContext - data access for one project's board
//!
//! The context pairs the remote store with the query cache. No business
//! logic lives here; commands do the work.

use crate::cache::{QueryCache, QueryKey};
use crate::error::Result;
use crate::store::BoardStore;
use crate::types::{ProjectId, Stage, Task};
use std::sync::Arc;
use tracing::debug;

/// Context passed to every command
#[derive(Clone)]
pub struct BoardContext {
    project: ProjectId,
    store: Arc<dyn BoardStore>,
    cache: Arc<QueryCache>,
}

impl BoardContext {
    /// Context for `project` with a cache of its own
    pub fn new(project: ProjectId, store: Arc<dyn BoardStore>) -> Self {
        Self::with_cache(project, store, Arc::new(QueryCache::new()))
    }

    /// Context sharing a cache owned by the caller
    pub fn with_cache(
        project: ProjectId,
        store: Arc<dyn BoardStore>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            project,
            store,
            cache,
        }
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn store(&self) -> &dyn BoardStore {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Stages ordered by sequence, from the cache when fresh
    pub async fn load_stages(&self) -> Result<Vec<Stage>> {
        if self.cache.is_fresh(QueryKey::Stages(self.project)) {
            if let Some(stages) = self.cache.get_stages(self.project) {
                return Ok(stages);
            }
        }

        debug!(project = %self.project, "fetching stages");
        let stages = self.store.list_stages(self.project).await?;
        self.cache.set_stages(self.project, stages.clone());
        Ok(stages)
    }

    /// Active tasks with details, from the cache when fresh
    pub async fn load_tasks(&self) -> Result<Vec<Task>> {
        if self.cache.is_fresh(QueryKey::Tasks(self.project)) {
            if let Some(tasks) = self.cache.get_tasks(self.project) {
                return Ok(tasks);
            }
        }

        debug!(project = %self.project, "fetching tasks");
        let tasks = self.store.list_tasks_with_details(self.project).await?;
        self.cache.set_tasks(self.project, tasks.clone());
        Ok(tasks)
    }

    pub fn invalidate_stages(&self) {
        self.cache.invalidate(QueryKey::Stages(self.project));
    }

    pub fn invalidate_tasks(&self) {
        self.cache.invalidate(QueryKey::Tasks(self.project));
    }

    /// Mark both queries stale; deleting a stage can move tasks too
    pub fn invalidate_all(&self) {
        self.cache.invalidate_project(self.project);
    }
}

impl std::fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContext")
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}
