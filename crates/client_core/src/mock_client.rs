//! In-memory [`ApiClient`] for tests and the demo binary.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{Comment, CommentId, Project, ProjectId, User},
    error::ErrorCode,
};
use tokio::sync::{Mutex, Semaphore};
use tracing::debug;

use crate::{ApiClient, ClientError, ClientResult};

const POSTED_COMMENT_ID_BASE: i64 = 900_000;

#[derive(Debug, Clone)]
pub enum PostOutcome {
    Succeed,
    Fail(ClientError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub fetch_project: Vec<ProjectId>,
    pub fetch_comments: Vec<ProjectId>,
    pub post_comment: Vec<(ProjectId, String)>,
}

/// Holds comment fetches until permits are released or the gate is opened.
#[derive(Clone)]
pub struct FetchGate {
    permits: Arc<Semaphore>,
}

impl FetchGate {
    fn closed() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Lets `count` waiting (or future) fetches through.
    pub fn release(&self, count: usize) {
        self.permits.add_permits(count);
    }

    /// Lets every fetch through from now on.
    pub fn open(&self) {
        self.permits.close();
    }

    async fn pass(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

struct MockState {
    project: Project,
    comments: Vec<Comment>,
    commenter: Option<User>,
    fetch_project_error: Option<ClientError>,
    fetch_comments_error: Option<ClientError>,
    post_outcome: PostOutcome,
    comment_gate: Option<FetchGate>,
    posted: i64,
    calls: CallLog,
}

pub struct MockApiClient {
    latency: Duration,
    state: Mutex<MockState>,
}

impl MockApiClient {
    pub fn new(project: Project) -> Self {
        Self {
            latency: Duration::ZERO,
            state: Mutex::new(MockState {
                project,
                comments: Vec::new(),
                commenter: None,
                fetch_project_error: None,
                fetch_comments_error: None,
                post_outcome: PostOutcome::Succeed,
                comment_gate: None,
                posted: 0,
                calls: CallLog::default(),
            }),
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.state.get_mut().comments = comments;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Author stamped on comments created through [`ApiClient::post_comment`].
    /// Defaults to the project creator.
    pub fn with_commenter(mut self, commenter: User) -> Self {
        self.state.get_mut().commenter = Some(commenter);
        self
    }

    pub async fn set_project(&self, project: Project) {
        self.state.lock().await.project = project;
    }

    pub async fn set_comments(&self, comments: Vec<Comment>) {
        self.state.lock().await.comments = comments;
    }

    pub async fn set_post_outcome(&self, outcome: PostOutcome) {
        self.state.lock().await.post_outcome = outcome;
    }

    pub async fn fail_fetch_project(&self, error: Option<ClientError>) {
        self.state.lock().await.fetch_project_error = error;
    }

    pub async fn fail_fetch_comments(&self, error: Option<ClientError>) {
        self.state.lock().await.fetch_comments_error = error;
    }

    /// Holds every subsequent comment fetch behind the returned gate.
    pub async fn pause_comment_fetches(&self) -> FetchGate {
        let gate = FetchGate::closed();
        self.state.lock().await.comment_gate = Some(gate.clone());
        gate
    }

    pub async fn calls(&self) -> CallLog {
        self.state.lock().await.calls.clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn fetch_project(&self, project_id: ProjectId) -> ClientResult<Project> {
        let result = {
            let mut state = self.state.lock().await;
            state.calls.fetch_project.push(project_id);
            if let Some(err) = &state.fetch_project_error {
                Err(err.clone())
            } else if state.project.id == project_id {
                Ok(state.project.clone())
            } else {
                Err(ClientError::api(
                    ErrorCode::NotFound,
                    format!("project {} not found", project_id.0),
                ))
            }
        };
        self.simulate_latency().await;
        result
    }

    async fn fetch_comments(&self, project: &Project) -> ClientResult<Vec<Comment>> {
        let (result, gate) = {
            let mut state = self.state.lock().await;
            state.calls.fetch_comments.push(project.id);
            let result = match &state.fetch_comments_error {
                Some(err) => Err(err.clone()),
                None => Ok(state.comments.clone()),
            };
            (result, state.comment_gate.clone())
        };
        if let Some(gate) = gate {
            debug!(project_id = project.id.0, "mock api: comment fetch waiting at gate");
            gate.pass().await;
        }
        self.simulate_latency().await;
        result
    }

    async fn post_comment(&self, project: &Project, body: &str) -> ClientResult<Comment> {
        let result = {
            let mut state = self.state.lock().await;
            state.calls.post_comment.push((project.id, body.to_string()));
            match state.post_outcome.clone() {
                PostOutcome::Fail(err) => Err(err),
                PostOutcome::Succeed if body.trim().is_empty() => Err(ClientError::api(
                    ErrorCode::Validation,
                    "comment body must not be blank",
                )),
                PostOutcome::Succeed => {
                    state.posted += 1;
                    let comment = Comment {
                        id: CommentId(POSTED_COMMENT_ID_BASE + state.posted),
                        body: body.to_string(),
                        author: state
                            .commenter
                            .clone()
                            .unwrap_or_else(|| project.creator.clone()),
                        created_at: Utc::now(),
                        deleted_at: None,
                    };
                    state.comments.push(comment.clone());
                    Ok(comment)
                }
            }
        };
        self.simulate_latency().await;
        result
    }
}
