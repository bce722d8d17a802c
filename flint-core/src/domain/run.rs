//! Workflow run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single execution of a workflow
///
/// Snapshot type: polling always fetches a fresh copy from the API,
/// nothing is mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub status: RunStatus,
    pub conclusion: Option<RunConclusion>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
}

impl WorkflowRun {
    /// A run is terminal once its status reaches `Completed`; the
    /// conclusion is meaningful only then.
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Run execution status reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Pending,
    Requested,
    /// Any status value this client does not know about
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::Waiting => "waiting",
            RunStatus::Pending => "pending",
            RunStatus::Requested => "requested",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Terminal conclusion of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunConclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Neutral,
    /// Any conclusion value this client does not know about
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunConclusion::Success => "success",
            RunConclusion::Failure => "failure",
            RunConclusion::Cancelled => "cancelled",
            RunConclusion::Skipped => "skipped",
            RunConclusion::TimedOut => "timed_out",
            RunConclusion::ActionRequired => "action_required",
            RunConclusion::Neutral => "neutral",
            RunConclusion::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}
