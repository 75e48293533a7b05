//! Comment feed presenter.
//!
//! One task owns the whole session: view inputs arrive over a channel, network
//! calls run as child tasks and report back to the same loop, and everything
//! bound for the screen is queued on the attached [`ViewPort`]. Dropping the
//! presenter (or calling [`CommentFeedPresenter::shutdown`]) aborts the loop and
//! every call still in flight, so nothing reaches a screen after teardown.

use std::sync::Arc;

use shared::domain::{Comment, Project, User};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::{AbortHandle, JoinHandle, JoinSet},
};
use tracing::{debug, error, info, warn};

use crate::{ApiClient, ClientResult, CurrentUserProvider};

mod signal;
mod view;

pub use signal::Latest;
pub use view::{CommentFeedView, RenderSnapshot, ViewCommand, ViewPort};

enum FeedInput {
    ComposeText(String),
    EmptyStateLoginClicked,
    ProjectContextClicked,
    Initialize(Project),
    SubmitComment(String),
    LoginSucceeded,
    CommentDialogShown,
    AttachView(mpsc::UnboundedSender<ViewCommand>),
    DetachView,
    WhenIdle(oneshot::Sender<()>),
}

impl FeedInput {
    fn name(&self) -> &'static str {
        match self {
            FeedInput::ComposeText(_) => "compose_text",
            FeedInput::EmptyStateLoginClicked => "empty_state_login_clicked",
            FeedInput::ProjectContextClicked => "project_context_clicked",
            FeedInput::Initialize(_) => "initialize",
            FeedInput::SubmitComment(_) => "submit_comment",
            FeedInput::LoginSucceeded => "login_succeeded",
            FeedInput::CommentDialogShown => "comment_dialog_shown",
            FeedInput::AttachView(_) => "attach_view",
            FeedInput::DetachView => "detach_view",
            FeedInput::WhenIdle(_) => "when_idle",
        }
    }
}

enum Completion {
    Project(ClientResult<Project>),
    Comments {
        generation: u64,
        result: ClientResult<Vec<Comment>>,
    },
    Posted(ClientResult<Comment>),
}

/// Cloneable handle for the events a screen reports. Sends after teardown are
/// dropped.
#[derive(Clone)]
pub struct FeedInputs {
    tx: mpsc::UnboundedSender<FeedInput>,
}

impl FeedInputs {
    fn send(&self, input: FeedInput) {
        let name = input.name();
        if self.tx.send(input).is_err() {
            debug!(input = name, "comment feed: input dropped after teardown");
        }
    }

    /// Current draft body. Empty text disables the submit control.
    pub fn set_compose_text(&self, text: impl Into<String>) {
        self.send(FeedInput::ComposeText(text.into()));
    }

    pub fn on_empty_state_login_clicked(&self) {
        self.send(FeedInput::EmptyStateLoginClicked);
    }

    pub fn on_project_context_clicked(&self) {
        self.send(FeedInput::ProjectContextClicked);
    }

    /// Scopes the feed to `project` and loads its comments.
    pub fn initialize(&self, project: Project) {
        self.send(FeedInput::Initialize(project));
    }

    pub fn submit_comment(&self, body: impl Into<String>) {
        self.send(FeedInput::SubmitComment(body.into()));
    }

    /// Reports that a login started from the empty state finished successfully.
    pub fn notify_login_succeeded(&self) {
        self.send(FeedInput::LoginSucceeded);
    }

    /// Reports that the screen opened the compose dialog on its own.
    pub fn comment_dialog_shown(&self) {
        self.send(FeedInput::CommentDialogShown);
    }
}

pub struct CommentFeedPresenter {
    inputs: FeedInputs,
    task: Option<JoinHandle<()>>,
}

impl CommentFeedPresenter {
    /// Starts the session loop on the current tokio runtime.
    pub fn spawn(client: Arc<dyn ApiClient>, current_user: &dyn CurrentUserProvider) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let users = current_user.observe();
        let session = FeedSession::new(client);
        let task = tokio::spawn(session.run(rx, users));
        info!("comment feed: presenter started");
        Self {
            inputs: FeedInputs { tx },
            task: Some(task),
        }
    }

    pub fn inputs(&self) -> FeedInputs {
        self.inputs.clone()
    }

    /// Binds a new view. Any previously attached port stops receiving.
    pub fn attach_view(&self) -> ViewPort {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inputs.send(FeedInput::AttachView(tx));
        ViewPort::new(rx)
    }

    pub fn detach_view(&self) {
        self.inputs.send(FeedInput::DetachView);
    }

    pub fn set_compose_text(&self, text: impl Into<String>) {
        self.inputs.set_compose_text(text);
    }

    pub fn on_empty_state_login_clicked(&self) {
        self.inputs.on_empty_state_login_clicked();
    }

    pub fn on_project_context_clicked(&self) {
        self.inputs.on_project_context_clicked();
    }

    pub fn initialize(&self, project: Project) {
        self.inputs.initialize(project);
    }

    pub fn submit_comment(&self, body: impl Into<String>) {
        self.inputs.submit_comment(body);
    }

    pub fn notify_login_succeeded(&self) {
        self.inputs.notify_login_succeeded();
    }

    pub fn comment_dialog_shown(&self) {
        self.inputs.comment_dialog_shown();
    }

    /// Resolves once every input sent so far is handled and no network call is
    /// in flight. Resolves immediately after teardown.
    pub async fn when_idle(&self) {
        let (tx, rx) = oneshot::channel();
        self.inputs.send(FeedInput::WhenIdle(tx));
        let _ = rx.await;
    }

    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    error!(%err, "comment feed: presenter task failed");
                }
            }
        }
        info!("comment feed: presenter shut down");
    }
}

impl Drop for CommentFeedPresenter {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct FeedSession {
    client: Arc<dyn ApiClient>,
    view: Option<mpsc::UnboundedSender<ViewCommand>>,
    project: Latest<Project>,
    comments: Latest<Vec<Comment>>,
    current_user: Latest<Option<User>>,
    has_body: Latest<bool>,
    is_posting: bool,
    login_succeeded: bool,
    compose_dialog_opened: bool,
    comments_generation: u64,
    comments_fetch: Option<AbortHandle>,
    in_flight: JoinSet<Completion>,
    idle_waiters: Vec<oneshot::Sender<()>>,
}

impl FeedSession {
    fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            view: None,
            project: Latest::new(),
            comments: Latest::new(),
            current_user: Latest::new(),
            has_body: Latest::new(),
            is_posting: false,
            login_succeeded: false,
            compose_dialog_opened: false,
            comments_generation: 0,
            comments_fetch: None,
            in_flight: JoinSet::new(),
            idle_waiters: Vec::new(),
        }
    }

    async fn run(
        mut self,
        mut inputs: mpsc::UnboundedReceiver<FeedInput>,
        mut users: watch::Receiver<Option<User>>,
    ) {
        let initial_user = users.borrow_and_update().clone();
        self.current_user.set(initial_user);
        let mut users_open = true;

        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle_input(input),
                    None => break,
                },
                changed = users.changed(), if users_open => match changed {
                    Ok(()) => {
                        let user = users.borrow_and_update().clone();
                        self.on_current_user(user);
                    }
                    Err(_) => {
                        debug!("comment feed: current user provider dropped");
                        users_open = false;
                    }
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok(completion) => self.handle_completion(completion),
                        Err(err) if err.is_cancelled() => {}
                        Err(err) => error!(%err, "comment feed: network task failed"),
                    }
                }
            }
            self.notify_if_idle();
        }

        info!("comment feed: all input handles dropped, stopping");
    }

    fn handle_input(&mut self, input: FeedInput) {
        debug!(input = input.name(), "comment feed: input");
        match input {
            FeedInput::ComposeText(text) => {
                self.has_body.set(!text.is_empty());
                self.bind_submit_enabled();
            }
            FeedInput::EmptyStateLoginClicked => self.dispatch(ViewCommand::StartLogin),
            FeedInput::ProjectContextClicked => self.dispatch(ViewCommand::NavigateBack),
            FeedInput::Initialize(project) => self.initialize(project),
            FeedInput::SubmitComment(body) => self.submit_comment(body),
            FeedInput::LoginSucceeded => self.login_succeeded(),
            FeedInput::CommentDialogShown => self.compose_dialog_opened = true,
            FeedInput::AttachView(tx) => {
                self.view = Some(tx);
                info!("comment feed: view attached");
                self.bind_render();
                self.bind_submit_enabled();
                self.bind_compose_dialog();
            }
            FeedInput::DetachView => {
                if self.view.take().is_some() {
                    info!("comment feed: view detached");
                }
            }
            FeedInput::WhenIdle(waiter) => self.idle_waiters.push(waiter),
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Project(Ok(project)) => {
                let current = self.project.get().map(|p| p.id);
                if current != Some(project.id) {
                    debug!(
                        project_id = project.id.0,
                        "comment feed: dropping project fetched for a previous scope"
                    );
                    return;
                }
                self.on_project(project);
                self.fetch_comments();
            }
            Completion::Project(Err(err)) => {
                error!(%err, "comment feed: fetching project failed");
            }
            Completion::Comments { generation, result } => {
                if generation != self.comments_generation {
                    debug!(generation, "comment feed: dropping stale comments");
                    return;
                }
                self.comments_fetch = None;
                match result {
                    Ok(comments) => {
                        debug!(count = comments.len(), "comment feed: comments loaded");
                        self.comments.set(comments);
                        self.bind_render();
                    }
                    Err(err) => error!(%err, "comment feed: fetching comments failed"),
                }
            }
            Completion::Posted(Ok(comment)) => {
                info!(comment_id = comment.id.0, "comment feed: comment posted");
                self.set_posting(false);
                self.refresh_feed();
                self.dispatch(ViewCommand::ShowPostSuccessToast);
            }
            Completion::Posted(Err(err)) => {
                // TODO: surface validation (422) and connectivity failures to the view.
                warn!(
                    kind = ?err.kind(),
                    status = err.status(),
                    %err,
                    "comment feed: posting comment failed"
                );
                self.set_posting(false);
            }
        }
    }

    fn initialize(&mut self, project: Project) {
        info!(project_id = project.id.0, "comment feed: initialize");
        self.login_succeeded = false;
        self.compose_dialog_opened = false;
        self.on_project(project);
        self.refresh_feed();
    }

    fn login_succeeded(&mut self) {
        self.login_succeeded = true;
        self.bind_compose_dialog();
        if let Some(project_id) = self.project.get().map(|p| p.id) {
            let client = Arc::clone(&self.client);
            self.in_flight
                .spawn(async move { Completion::Project(client.fetch_project(project_id).await) });
        }
        self.refresh_feed();
    }

    fn submit_comment(&mut self, body: String) {
        if self.is_posting {
            debug!("comment feed: ignoring submit while a post is in flight");
            return;
        }
        self.set_posting(true);

        let Some(project) = self.project.get().cloned() else {
            warn!("comment feed: submit before a project was initialized");
            self.set_posting(false);
            return;
        };
        let client = Arc::clone(&self.client);
        self.in_flight.spawn(async move {
            Completion::Posted(client.post_comment(&project, &body).await)
        });
    }

    fn on_project(&mut self, project: Project) {
        let previous = self.project.set(project);
        let scope_changed = match (previous.as_ref(), self.project.get()) {
            (Some(previous), Some(current)) => previous.id != current.id,
            _ => true,
        };
        if scope_changed {
            self.comments.clear();
        }
        self.bind_render();
        self.bind_compose_dialog();
    }

    fn on_current_user(&mut self, user: Option<User>) {
        debug!(
            user_id = user.as_ref().map(|u| u.id().0),
            "comment feed: current user changed"
        );
        self.current_user.set(user);
        self.bind_render();
    }

    fn refresh_feed(&mut self) {
        self.dispatch(ViewCommand::DismissComposeDialog);
        self.fetch_comments();
    }

    /// Starts a comment fetch for the latest project, abandoning any fetch
    /// still in flight.
    fn fetch_comments(&mut self) {
        let Some(project) = self.project.get().cloned() else {
            debug!("comment feed: no project to fetch comments for");
            return;
        };
        if let Some(previous) = self.comments_fetch.take() {
            previous.abort();
        }
        self.comments_generation += 1;
        let generation = self.comments_generation;
        let client = Arc::clone(&self.client);
        let handle = self.in_flight.spawn(async move {
            Completion::Comments {
                generation,
                result: client.fetch_comments(&project).await,
            }
        });
        self.comments_fetch = Some(handle);
    }

    fn set_posting(&mut self, posting: bool) {
        self.is_posting = posting;
        self.dispatch(ViewCommand::SetPostingIndicator(posting));
        if posting {
            self.dispatch(ViewCommand::SetSubmitEnabled(false));
        } else {
            self.bind_submit_enabled();
        }
    }

    fn bind_render(&mut self) {
        if self.view.is_none() {
            return;
        }
        let Some(((project, comments), current_user)) = self
            .project
            .zip(&self.comments)
            .and_then(|pc| Some((pc, self.current_user.get()?)))
        else {
            return;
        };
        let snapshot = RenderSnapshot {
            project: project.clone(),
            comments: comments.clone(),
            current_user: current_user.clone(),
        };
        self.dispatch(ViewCommand::Render(snapshot));
    }

    fn bind_submit_enabled(&mut self) {
        if let Some(&has_body) = self.has_body.get() {
            self.dispatch(ViewCommand::SetSubmitEnabled(has_body));
        }
    }

    /// Opens the compose dialog the first time, after a successful login, that
    /// a view is attached and the project is backed. Latched until the next
    /// `initialize`.
    fn bind_compose_dialog(&mut self) {
        if self.compose_dialog_opened || !self.login_succeeded || self.view.is_none() {
            return;
        }
        if self.project.get().is_some_and(Project::is_backing) {
            self.compose_dialog_opened = true;
            self.dispatch(ViewCommand::OpenComposeDialog);
        }
    }

    fn dispatch(&mut self, command: ViewCommand) {
        let Some(view) = &self.view else {
            return;
        };
        let name = command.name();
        if view.send(command).is_err() {
            debug!(command = name, "comment feed: view port dropped, detaching");
            self.view = None;
        } else {
            debug!(command = name, "comment feed: dispatched to view");
        }
    }

    fn notify_if_idle(&mut self) {
        if !self.in_flight.is_empty() || self.idle_waiters.is_empty() {
            return;
        }
        for waiter in self.idle_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}

#[cfg(test)]
#[path = "../tests/presenter_tests.rs"]
mod tests;
