//! Workflow DTOs for the repository workflow endpoints

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::workflow::Workflow;

/// One page of the repository workflow listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowList {
    /// Total number of workflows in the repository, across all pages
    pub total_count: u64,
    pub workflows: Vec<Workflow>,
}

/// Request body for the workflow dispatch endpoint
///
/// The endpoint acknowledges with a bare 204; the run it queues carries
/// no reference back to this request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchWorkflow {
    /// Git ref the run should execute at
    #[serde(rename = "ref")]
    pub git_ref: String,

    /// Workflow inputs; the API only accepts flat string values
    pub inputs: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_body_uses_ref_key() {
        let req = DispatchWorkflow {
            git_ref: "main".to_string(),
            inputs: HashMap::from([("level".to_string(), "debug".to_string())]),
        };

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["ref"], "main");
        assert_eq!(body["inputs"]["level"], "debug");
    }
}
