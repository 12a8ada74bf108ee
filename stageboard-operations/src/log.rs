//! Activity entries written by mutating operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use ulid::Ulid;

/// What a logged operation did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogOutcome {
    /// The store accepted the change
    Applied { value: Value },
    /// The change was refused; nothing was written
    Rejected { error: String },
}

/// One entry in a board's activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Ulid,
    pub at: DateTime<Utc>,
    /// "add stage", "move task", ...
    pub op: String,
    pub input: Value,
    #[serde(flatten)]
    pub outcome: LogOutcome,
    /// Who made the change. Filled in by the processor, not the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub duration_ms: u64,
}

impl LogEntry {
    fn with_outcome(op: String, input: Value, outcome: LogOutcome, duration_ms: u64) -> Self {
        Self {
            id: Ulid::new(),
            at: Utc::now(),
            op,
            input,
            outcome,
            actor: None,
            duration_ms,
        }
    }

    pub fn applied(op: impl Into<String>, input: Value, value: Value, duration_ms: u64) -> Self {
        Self::with_outcome(op.into(), input, LogOutcome::Applied { value }, duration_ms)
    }

    pub fn rejected(
        op: impl Into<String>,
        input: Value,
        error: impl Display,
        duration_ms: u64,
    ) -> Self {
        let outcome = LogOutcome::Rejected {
            error: error.to_string(),
        };
        Self::with_outcome(op.into(), input, outcome, duration_ms)
    }

    /// Attribute the entry to `actor` unless it already names one
    pub fn stamp(&mut self, actor: &str) {
        self.actor.get_or_insert_with(|| actor.to_string());
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, LogOutcome::Rejected { .. })
    }

    /// The refusal message of a rejected entry
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            LogOutcome::Rejected { error } => Some(error),
            LogOutcome::Applied { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stamp_keeps_first_actor() {
        let mut entry = LogEntry::applied("add stage", json!({"name": "Todo"}), json!({}), 1);
        entry.stamp("alice");
        entry.stamp("bob");
        assert_eq!(entry.actor.as_deref(), Some("alice"));
    }

    #[test]
    fn test_rejected_entry_serializes_status() {
        let entry = LogEntry::rejected("delete stage", json!({"id": 2}), "no default stage", 0);
        assert!(entry.is_rejected());
        assert_eq!(entry.error(), Some("no default stage"));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["error"], "no default stage");
        assert!(value.get("actor").is_none());

        let back: LogEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, entry.id);
        assert_eq!(back.outcome, entry.outcome);
    }
}
