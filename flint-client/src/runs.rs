//! Workflow run endpoints

use tracing::debug;

use crate::GithubClient;
use crate::error::Result;
use flint_core::domain::run::WorkflowRun;
use flint_core::dto::run::RunList;
use flint_core::dto::workflow::DispatchWorkflow;

impl GithubClient {
    // =============================================================================
    // Dispatch
    // =============================================================================

    /// Submit a `workflow_dispatch` trigger for a workflow
    ///
    /// The API acknowledges with a bare 204 and returns no run id.
    /// Callers must not retry a failed dispatch automatically: a retry
    /// racing a slow acceptance can queue a second run.
    pub async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        req: &DispatchWorkflow,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.base_url, owner, repo, workflow_id
        );
        let response = self.post(&url).json(req).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Run Queries
    // =============================================================================

    /// List queued runs of a workflow that a dispatch trigger created
    ///
    /// Filters server-side on `event=workflow_dispatch` and
    /// `status=queued`; the correlation step narrows the result further.
    pub async fn list_queued_dispatch_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> Result<Vec<WorkflowRun>> {
        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/runs?event=workflow_dispatch&status=queued",
            self.base_url, owner, repo, workflow_id
        );
        let response = self.get(&url).send().await?;
        let list: RunList = self.handle_response(response).await?;

        debug!(
            workflow_id,
            count = list.workflow_runs.len(),
            "listed queued dispatch runs"
        );

        Ok(list.workflow_runs)
    }

    /// Fetch a fresh snapshot of a single run
    pub async fn get_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<WorkflowRun> {
        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}",
            self.base_url, owner, repo, run_id
        );
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }
}
