//! Task types: Task, its tag/assignee references, priority and status

use super::ids::{ProjectId, StageId, TagId, TaskId, UserId};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// A card on the board. Belongs to exactly one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub assignees: Vec<UserRef>,
    pub stage_id: StageId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    /// False once archived
    #[serde(default = "default_active")]
    pub active: bool,
    /// Derived by the store; never written by the engine
    #[serde(default)]
    pub message_count: u32,
}

fn default_active() -> bool {
    true
}

impl Task {
    pub fn new(
        id: TaskId,
        project_id: ProjectId,
        stage_id: StageId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            assignees: Vec::new(),
            stage_id,
            project_id,
            priority: Priority::default(),
            status: TaskStatus::default(),
            active: true,
            message_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagRef>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<UserRef>) -> Self {
        self.assignees = assignees;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Card view: description cut to `max_words` words, at most `max_tags` tags
    pub fn preview(&self, max_words: usize, max_tags: usize) -> CardPreview {
        let words: Vec<&str> = self.description.split_whitespace().collect();
        let description = if words.len() > max_words {
            format!("{}...", words[..max_words].join(" "))
        } else {
            self.description.clone()
        };

        CardPreview {
            id: self.id,
            name: self.name.clone(),
            description,
            tags: self.tags.iter().take(max_tags).cloned().collect(),
            assignees: self.assignees.clone(),
            priority: self.priority,
            message_count: self.message_count,
        }
    }
}

/// What a card renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPreview {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub tags: Vec<TagRef>,
    pub assignees: Vec<UserRef>,
    pub priority: Priority,
    pub message_count: u32,
}

/// A tag attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: TagId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TagRef {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
        }
    }
}

/// A user assigned to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserRef {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            avatar_url: None,
        }
    }
}

/// Priority rank 0..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MAX: u8 = 5;

    pub fn new(rank: u8) -> Result<Self> {
        if rank > Self::MAX {
            return Err(BoardError::invalid_value(
                "priority",
                format!("{} is outside 0..={}", rank, Self::MAX),
            ));
        }
        Ok(Self(rank))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = BoardError;

    fn try_from(rank: u8) -> Result<Self> {
        Self::new(rank)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

/// Workflow status, independent of the stage a task sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    InProgress,
    ChangesRequested,
    Approved,
    Cancelled,
    Done,
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// None places the task in the project's default stage
    #[serde(default)]
    pub stage_id: Option<StageId>,
    #[serde(default)]
    pub assignee_ids: Vec<UserId>,
}

impl NewTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_stage(mut self, stage: StageId) -> Self {
        self.stage_id = Some(stage);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}
