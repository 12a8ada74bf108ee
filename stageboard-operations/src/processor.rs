//! Processor trait: the place where executed operations meet the activity log

use crate::{Execute, Operation};
use async_trait::async_trait;
use serde_json::Value;

/// Executes operations and records whatever they log
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
{
    /// Execute `op` against `ctx`, persisting its log entry if it produced one
    async fn process<O>(&self, op: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + Operation + Send + Sync;
}
