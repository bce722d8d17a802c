//! Dispatch orchestration
//!
//! Drives the full trigger flow: resolve the workflow, submit the
//! dispatch, correlate it to the run it queued, and optionally poll that
//! run to a terminal state. The dispatch endpoint returns no run id, so
//! correlation re-queries the workflow's queued dispatch runs and picks
//! the newest one created after the dispatch was submitted.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::info;

use crate::GithubClient;
use crate::error::ClientError;
use crate::poll::{PollError, PollPolicy, poll};
use flint_core::domain::run::{RunConclusion, RunStatus, WorkflowRun};
use flint_core::domain::workflow::Workflow;
use flint_core::dto::workflow::DispatchWorkflow;

/// How many seconds before the dispatch instant a queued run may have
/// been created and still count as caused by it. Absorbs clock skew
/// between this host and the API while keeping older unrelated runs out
/// of the candidate set.
const CREATION_SKEW_SECS: i64 = 60;

/// Default budget for waiting until the queued run becomes visible
const APPEARANCE_POLICY: PollPolicy =
    PollPolicy::new(std::time::Duration::from_secs(3), 10);

/// Default budget for waiting until the run completes
const COMPLETION_POLICY: PollPolicy =
    PollPolicy::new(std::time::Duration::from_secs(5), 100);

/// Everything one invocation needs to trigger a workflow
#[derive(Debug, Clone)]
pub struct DispatchSpec {
    pub owner: String,
    pub repo: String,
    /// Workflow name or numeric id in string form
    pub workflow: String,
    /// Git ref the run should execute at
    pub git_ref: String,
    /// JSON-encoded input map; `None` or empty dispatches without inputs
    pub inputs: Option<String>,
    /// Wait for the run to finish instead of returning after acceptance
    pub wait: bool,
}

/// Successful end states of a dispatch invocation
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// Fire-and-forget: the trigger was accepted. Whether the run
    /// eventually succeeds is not this invocation's concern.
    Dispatched { workflow: Workflow },
    /// Waited: the run completed with a success conclusion
    Completed { workflow: Workflow, run: WorkflowRun },
}

/// Errors from the dispatch flow
///
/// Every stage maps to its own variant so a failure message always
/// identifies where the flow stopped.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Raised before any network call; malformed inputs never dispatch
    #[error("workflow inputs are not valid JSON: {0}")]
    InvalidInputs(#[from] serde_json::Error),

    #[error("unable to find workflow '{reference}' in {owner}/{repo}")]
    WorkflowNotFound {
        owner: String,
        repo: String,
        reference: String,
    },

    /// The dispatch endpoint answered with a non-acceptance status.
    /// Never retried: the request may still have queued a run.
    #[error("workflow dispatch rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error(
        "no queued run for workflow '{workflow}' appeared within {attempts} attempts; \
         the dispatch may still surface a run later"
    )]
    CorrelationFailed { workflow: String, attempts: u32 },

    #[error(
        "run {id} was still '{last_status}' after {attempts} poll attempts; \
         it may be running yet: {url}"
    )]
    Incomplete {
        id: u64,
        last_status: RunStatus,
        attempts: u32,
        url: String,
    },

    #[error("run {id} completed with conclusion '{conclusion}': {url}")]
    RunFailed {
        id: u64,
        conclusion: RunConclusion,
        url: String,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Orchestrates a single dispatch end to end
///
/// The flow is strictly linear: locate, dispatch, and when waiting,
/// correlate then poll to completion. Any stage error propagates
/// immediately; no earlier stage is ever retried after a later one fails.
pub struct Dispatcher<'a> {
    client: &'a GithubClient,
    appearance: PollPolicy,
    completion: PollPolicy,
}

impl<'a> Dispatcher<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self {
            client,
            appearance: APPEARANCE_POLICY,
            completion: COMPLETION_POLICY,
        }
    }

    /// Override the budget for waiting on the queued run to appear
    pub fn with_appearance_policy(mut self, policy: PollPolicy) -> Self {
        self.appearance = policy;
        self
    }

    /// Override the budget for waiting on run completion
    pub fn with_completion_policy(mut self, policy: PollPolicy) -> Self {
        self.completion = policy;
        self
    }

    /// Run the dispatch flow described by `spec`
    pub async fn run(&self, spec: &DispatchSpec) -> Result<DispatchOutcome, DispatchError> {
        // Inputs must decode before anything touches the network.
        let inputs = decode_inputs(spec.inputs.as_deref())?;

        let workflow = self.locate(spec).await?;
        info!(workflow = %workflow.name, id = workflow.id, "resolved workflow");

        let submitted_at = Utc::now();
        self.dispatch(spec, &workflow, inputs).await?;
        info!(git_ref = %spec.git_ref, "workflow dispatch accepted");

        if !spec.wait {
            return Ok(DispatchOutcome::Dispatched { workflow });
        }

        let queued = self.correlate(spec, &workflow, submitted_at).await?;
        info!(run = queued.id, "correlated dispatch to queued run");

        let run = self.wait_for_completion(spec, &queued).await?;

        match run.conclusion {
            Some(RunConclusion::Success) => Ok(DispatchOutcome::Completed { workflow, run }),
            conclusion => Err(DispatchError::RunFailed {
                id: run.id,
                conclusion: conclusion.unwrap_or(RunConclusion::Unknown),
                url: run.html_url,
            }),
        }
    }

    async fn locate(&self, spec: &DispatchSpec) -> Result<Workflow, DispatchError> {
        match self
            .client
            .find_workflow(&spec.owner, &spec.repo, &spec.workflow)
            .await
        {
            Ok(workflow) => Ok(workflow),
            Err(ClientError::NotFound(_)) => Err(DispatchError::WorkflowNotFound {
                owner: spec.owner.clone(),
                repo: spec.repo.clone(),
                reference: spec.workflow.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn dispatch(
        &self,
        spec: &DispatchSpec,
        workflow: &Workflow,
        inputs: HashMap<String, String>,
    ) -> Result<(), DispatchError> {
        let req = DispatchWorkflow {
            git_ref: spec.git_ref.clone(),
            inputs,
        };

        match self
            .client
            .dispatch_workflow(&spec.owner, &spec.repo, workflow.id, &req)
            .await
        {
            Ok(()) => Ok(()),
            Err(ClientError::ApiError { status, message }) => {
                Err(DispatchError::Rejected { status, message })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find the run this dispatch queued
    ///
    /// The API offers nothing linking a dispatch to its run, so the proxy
    /// is "newest queued dispatch run created since the submission
    /// instant" (minus a skew allowance). Run creation is asynchronous
    /// relative to acceptance, hence the appearance polling. Under
    /// concurrent triggers of the same workflow this is best-effort.
    async fn correlate(
        &self,
        spec: &DispatchSpec,
        workflow: &Workflow,
        submitted_at: DateTime<Utc>,
    ) -> Result<WorkflowRun, DispatchError> {
        let cutoff = submitted_at - TimeDelta::seconds(CREATION_SKEW_SECS);
        let fetch = || self.newest_queued(&spec.owner, &spec.repo, workflow.id, cutoff);

        match poll(
            fetch,
            |found: &Option<WorkflowRun>| found.is_some(),
            self.appearance,
        )
        .await
        {
            Ok(Some(run)) => Ok(run),
            Ok(None) | Err(PollError::Exhausted { .. }) => {
                Err(DispatchError::CorrelationFailed {
                    workflow: workflow.name.clone(),
                    attempts: self.appearance.max_attempts,
                })
            }
            Err(PollError::Client(e)) => Err(e.into()),
        }
    }

    /// One correlation query: the newest queued dispatch run inside the
    /// causal window, if any has become visible yet
    async fn newest_queued(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        cutoff: DateTime<Utc>,
    ) -> crate::error::Result<Option<WorkflowRun>> {
        let runs = self
            .client
            .list_queued_dispatch_runs(owner, repo, workflow_id)
            .await?;

        Ok(newest_candidate(runs, cutoff))
    }

    /// Poll a run until its status turns terminal
    async fn wait_for_completion(
        &self,
        spec: &DispatchSpec,
        queued: &WorkflowRun,
    ) -> Result<WorkflowRun, DispatchError> {
        let run_id = queued.id;
        let fetch = || self.client.get_run(&spec.owner, &spec.repo, run_id);

        match poll(fetch, WorkflowRun::is_complete, self.completion).await {
            Ok(run) => Ok(run),
            Err(PollError::Exhausted { last, attempts }) => Err(DispatchError::Incomplete {
                id: run_id,
                last_status: last.status,
                attempts,
                url: last.html_url,
            }),
            Err(PollError::Client(e)) => Err(e.into()),
        }
    }
}

/// Decode the JSON-encoded input map
///
/// A missing or blank string dispatches without inputs; anything else
/// must parse as a flat string-to-string object.
fn decode_inputs(raw: Option<&str>) -> Result<HashMap<String, String>, DispatchError> {
    match raw {
        None => Ok(HashMap::new()),
        Some(s) if s.trim().is_empty() => Ok(HashMap::new()),
        Some(s) => Ok(serde_json::from_str(s)?),
    }
}

/// Pick the most recently created run inside the causal window
fn newest_candidate(runs: Vec<WorkflowRun>, cutoff: DateTime<Utc>) -> Option<WorkflowRun> {
    runs.into_iter()
        .filter(|run| run.created_at >= cutoff)
        .max_by_key(|run| run.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn queued_run(id: u64, created_at: DateTime<Utc>) -> WorkflowRun {
        WorkflowRun {
            id,
            status: RunStatus::Queued,
            conclusion: None,
            html_url: format!("https://github.com/acme/widgets/actions/runs/{id}"),
            created_at,
        }
    }

    #[test]
    fn test_decode_inputs_accepts_flat_object() {
        let inputs = decode_inputs(Some(r#"{"level":"debug","target":"prod"}"#)).unwrap();
        assert_eq!(inputs.get("level").map(String::as_str), Some("debug"));
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn test_decode_inputs_defaults_to_empty() {
        assert!(decode_inputs(None).unwrap().is_empty());
        assert!(decode_inputs(Some("")).unwrap().is_empty());
        assert!(decode_inputs(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn test_decode_inputs_rejects_malformed_json() {
        let err = decode_inputs(Some("{not json")).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInputs(_)));
    }

    #[test]
    fn test_decode_inputs_rejects_non_string_values() {
        let err = decode_inputs(Some(r#"{"count": 3}"#)).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInputs(_)));
    }

    #[test]
    fn test_newest_candidate_prefers_most_recent() {
        let now = Utc::now();
        let cutoff = now - TimeDelta::seconds(60);
        let runs = vec![
            queued_run(900, now - TimeDelta::seconds(10)),
            queued_run(901, now - TimeDelta::seconds(2)),
            queued_run(902, now - TimeDelta::seconds(30)),
        ];

        let picked = newest_candidate(runs, cutoff).unwrap();
        assert_eq!(picked.id, 901);
    }

    #[test]
    fn test_newest_candidate_drops_runs_outside_window() {
        let now = Utc::now();
        let cutoff = now - TimeDelta::seconds(60);
        let runs = vec![queued_run(800, now - TimeDelta::minutes(30))];

        assert!(newest_candidate(runs, cutoff).is_none());
    }

    #[test]
    fn test_newest_candidate_empty_set() {
        assert!(newest_candidate(Vec::new(), Utc::now()).is_none());
    }
}
