//! Ordered stage/task board with drag reordering
//!
//! A board is a list of stages (columns, ordered by `sequence`) and a flat list
//! of tasks (cards), each belonging to one stage. Dragging a stage reorders the
//! columns and renumbers their sequences; dragging a task moves it within or
//! between columns. Changes are applied locally first and then written to the
//! remote store.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use stageboard::{
//!     Board, BoardConfig, BoardContext, Displacement, ItemRef, MemoryBoardStore, ProjectId,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> stageboard::Result<()> {
//! let store = Arc::new(MemoryBoardStore::new());
//! let ctx = BoardContext::new(ProjectId::new(1), store);
//! let mut board = Board::new(ctx, BoardConfig::load()?);
//! board.load().await?;
//!
//! // Decoded once, at the input boundary
//! let dragged = ItemRef::decode("stage-3", Some("stage"))?;
//! let over = ItemRef::decode("stage-1", None)?;
//!
//! board.begin_drag(dragged);
//! let report = board.end_drag(Some(over), Displacement(0.0)).await;
//! assert!(report.is_synced());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! - [`engine`] - pure reordering and the drag state machine, no I/O
//! - [`store`] - the remote store trait and an in-memory implementation
//! - [`stage`], [`task`] - commands run through [`BoardOperationProcessor`]
//! - [`Board`] - ties the engine to the store and the query cache

mod board;
mod cache;
mod config;
mod context;
mod error;
mod processor;

pub mod engine;
pub mod input;
pub mod logging;
pub mod store;
pub mod types;

// Command modules
pub mod stage;
pub mod task;

pub use stageboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, LogOutcome, Operation,
    OperationProcessor,
};

pub use board::{Board, LoadState, SyncReport, WriteReport};
pub use cache::{QueryCache, QueryKey};
pub use config::{BoardConfig, StageWriteScope, WriteFailurePolicy};
pub use context::BoardContext;
pub use engine::{BoardEngine, DragSession, DropOutcome, StageWrite, TaskStageWrite};
pub use error::{BoardError, Result};
pub use input::{Displacement, DragSignal, ItemKind, ItemRef};
pub use logging::Pretty;
pub use processor::BoardOperationProcessor;
pub use store::{ArchiveReport, BoardStore, MemoryBoardStore};

pub use types::{
    CardPreview, NewTask, Priority, ProjectId, Stage, StageId, StagePatch, TagId, TagRef, Task,
    TaskId, TaskStatus, UserId, UserRef,
};
