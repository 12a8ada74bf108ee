//! Core types for the board engine

mod ids;
mod stage;
mod task;

pub use ids::{ProjectId, StageId, TagId, TaskId, UserId};
pub use stage::{Stage, StagePatch};
pub use task::{CardPreview, NewTask, Priority, TagRef, Task, TaskStatus, UserRef};
