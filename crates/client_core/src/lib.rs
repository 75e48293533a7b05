use async_trait::async_trait;
use shared::{
    domain::{Comment, Project, ProjectId},
    error::{ApiException, ErrorCode},
};
use thiserror::Error;

mod current_user;
mod mock_client;
pub mod presenter;

pub use current_user::{CurrentUser, CurrentUserProvider};
pub use mock_client::{CallLog, FetchGate, MockApiClient, PostOutcome};
pub use presenter::{
    CommentFeedPresenter, CommentFeedView, FeedInputs, RenderSnapshot, ViewCommand, ViewPort,
};

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("api error: {0}")]
    Api(#[from] ApiException),
    #[error("network error: {0}")]
    Network(String),
}

/// Coarse bucket for a failed call, used when logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Connectivity,
    Other,
}

impl ClientError {
    pub fn api(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Api(ApiException::new(code, message))
    }

    /// HTTP status the failure corresponds to, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(err) => Some(err.code.http_status()),
            ClientError::Network(_) => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Api(err) if err.code == ErrorCode::Validation => FailureKind::Validation,
            ClientError::Api(_) => FailureKind::Other,
            ClientError::Network(_) => FailureKind::Connectivity,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_project(&self, project_id: ProjectId) -> ClientResult<Project>;
    async fn fetch_comments(&self, project: &Project) -> ClientResult<Vec<Comment>>;
    async fn post_comment(&self, project: &Project, body: &str) -> ClientResult<Comment>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
