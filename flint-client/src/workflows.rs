//! Workflow definition endpoints

use tracing::debug;

use crate::GithubClient;
use crate::error::{ClientError, Result};
use flint_core::domain::workflow::Workflow;
use flint_core::dto::workflow::WorkflowList;

/// Page size used when walking the workflow listing
const PER_PAGE: u32 = 100;

impl GithubClient {
    // =============================================================================
    // Workflow Definitions
    // =============================================================================

    /// List every workflow defined in a repository
    ///
    /// Follows pagination until the accumulated set covers the total the
    /// API reports. A lookup target may sit on any page, so no page is
    /// skipped and the walk never stops at the first match-less page.
    pub async fn list_workflows(&self, owner: &str, repo: &str) -> Result<Vec<Workflow>> {
        let mut workflows: Vec<Workflow> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/actions/workflows?per_page={}&page={}",
                self.base_url, owner, repo, PER_PAGE, page
            );
            let response = self.get(&url).send().await?;
            let list: WorkflowList = self.handle_response(response).await?;

            debug!(
                page,
                fetched = list.workflows.len(),
                total = list.total_count,
                "fetched workflow listing page"
            );

            if list.workflows.is_empty() {
                break;
            }

            workflows.extend(list.workflows);

            if workflows.len() as u64 >= list.total_count {
                break;
            }
            page += 1;
        }

        Ok(workflows)
    }

    /// Resolve a workflow reference to its definition
    ///
    /// The reference is either the workflow name or its numeric id in
    /// string form. Returns `NotFound` only after the full listing has
    /// been consumed.
    pub async fn find_workflow(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Workflow> {
        let workflows = self.list_workflows(owner, repo).await?;

        workflows
            .into_iter()
            .find(|workflow| workflow.matches_reference(reference))
            .ok_or_else(|| {
                ClientError::NotFound(format!("workflow '{}' in {}/{}", reference, owner, repo))
            })
    }
}
