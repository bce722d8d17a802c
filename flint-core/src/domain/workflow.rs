//! Workflow domain types

use serde::{Deserialize, Serialize};

/// Workflow definition as reported by the repository workflow listing
///
/// Fetched fresh per invocation from the remote listing; never persisted.
/// The `id` is unique within a repository; the `name` is expected unique
/// but the API does not guarantee it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub state: String,
}

impl Workflow {
    /// Check whether a user-supplied reference selects this workflow.
    ///
    /// The reference is either the workflow name or its numeric id in
    /// decimal string form. Matching is exact: substrings never match.
    pub fn matches_reference(&self, reference: &str) -> bool {
        self.name == reference || self.id.to_string() == reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow(id: u64, name: &str) -> Workflow {
        Workflow {
            id,
            name: name.to_string(),
            path: format!(".github/workflows/{name}.yml"),
            state: "active".to_string(),
        }
    }

    #[test]
    fn test_matches_by_name() {
        assert!(workflow(42, "build").matches_reference("build"));
    }

    #[test]
    fn test_matches_by_id_string() {
        assert!(workflow(42, "build").matches_reference("42"));
    }

    #[test]
    fn test_substring_never_matches() {
        assert!(!workflow(42, "buildx").matches_reference("build"));
        assert!(!workflow(421, "deploy").matches_reference("42"));
    }

    #[test]
    fn test_deserializes_listing_entry() {
        let raw = r#"{
            "id": 161335,
            "name": "CI",
            "path": ".github/workflows/ci.yml",
            "state": "active",
            "node_id": "MDg6V29ya2Zsb3cxNjEzMzU="
        }"#;

        let workflow: Workflow = serde_json::from_str(raw).unwrap();
        assert_eq!(workflow.id, 161335);
        assert_eq!(workflow.name, "CI");
    }
}
