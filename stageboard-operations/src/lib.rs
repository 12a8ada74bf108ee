//! # Stageboard Operations
//!
//! Operations are structs whose fields are their parameters. The `#[operation]`
//! attribute attaches a verb/noun pair, and an `Execute` impl runs the
//! operation against a context.
//!
//! ## Example
//!
//! ```ignore
//! use stageboard_operations::*;
//!
//! #[operation(verb = "add", noun = "stage", description = "Append a stage to the board")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddStage {
//!     pub name: String,
//! }
//!
//! #[async_trait]
//! impl Execute<BoardContext, BoardError> for AddStage {
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
//!         // mutations return ExecutionResult::Logged, reads return Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::{LogEntry, LogOutcome};
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

// Re-export proc macros
pub use stageboard_operations_macros::operation;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
