//! Run DTOs for the workflow run endpoints

use serde::{Deserialize, Serialize};

use crate::domain::run::WorkflowRun;

/// One page of a workflow's run listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunList {
    /// Total number of runs matching the query, across all pages
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_empty_listing() {
        let list: RunList = serde_json::from_str(r#"{"total_count":0,"workflow_runs":[]}"#).unwrap();
        assert_eq!(list.total_count, 0);
        assert!(list.workflow_runs.is_empty());
    }
}
