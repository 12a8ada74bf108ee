//! Operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every operation carries, usually generated by `#[operation]`
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The entity acted upon, e.g. "task"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Canonical "verb noun" string used in log entries
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run an operation against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Send + Sync
where
    C: Send + Sync,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}
