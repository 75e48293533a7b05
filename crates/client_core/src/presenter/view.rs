//! View side of the comment feed: the capability set a screen implements and the
//! port it drains on the thread that owns it.

use shared::domain::{Comment, Project, User};
use tokio::sync::mpsc;

pub trait CommentFeedView {
    fn render(&mut self, project: &Project, comments: &[Comment], current_user: Option<&User>);
    fn navigate_back(&mut self);
    fn start_login(&mut self);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn dismiss_compose_dialog(&mut self);
    fn set_posting_indicator(&mut self, posting: bool);
    fn show_post_success_toast(&mut self);
    fn open_compose_dialog(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub project: Project,
    pub comments: Vec<Comment>,
    pub current_user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Render(RenderSnapshot),
    NavigateBack,
    StartLogin,
    SetSubmitEnabled(bool),
    DismissComposeDialog,
    SetPostingIndicator(bool),
    ShowPostSuccessToast,
    OpenComposeDialog,
}

impl ViewCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ViewCommand::Render(_) => "render",
            ViewCommand::NavigateBack => "navigate_back",
            ViewCommand::StartLogin => "start_login",
            ViewCommand::SetSubmitEnabled(_) => "set_submit_enabled",
            ViewCommand::DismissComposeDialog => "dismiss_compose_dialog",
            ViewCommand::SetPostingIndicator(_) => "set_posting_indicator",
            ViewCommand::ShowPostSuccessToast => "show_post_success_toast",
            ViewCommand::OpenComposeDialog => "open_compose_dialog",
        }
    }

    pub fn apply<V: CommentFeedView + ?Sized>(self, view: &mut V) {
        match self {
            ViewCommand::Render(snapshot) => view.render(
                &snapshot.project,
                &snapshot.comments,
                snapshot.current_user.as_ref(),
            ),
            ViewCommand::NavigateBack => view.navigate_back(),
            ViewCommand::StartLogin => view.start_login(),
            ViewCommand::SetSubmitEnabled(enabled) => view.set_submit_enabled(enabled),
            ViewCommand::DismissComposeDialog => view.dismiss_compose_dialog(),
            ViewCommand::SetPostingIndicator(posting) => view.set_posting_indicator(posting),
            ViewCommand::ShowPostSuccessToast => view.show_post_success_toast(),
            ViewCommand::OpenComposeDialog => view.open_compose_dialog(),
        }
    }
}

/// Receiving end of an attached view. Commands arrive in dispatch order and are
/// applied by whoever owns the view; once the presenter detaches or shuts down,
/// the port yields `None`.
pub struct ViewPort {
    rx: mpsc::UnboundedReceiver<ViewCommand>,
}

impl ViewPort {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<ViewCommand>) -> Self {
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<ViewCommand> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ViewCommand> {
        self.rx.try_recv().ok()
    }

    /// Applies every queued command without waiting. Meant to be called once per
    /// frame from a UI loop.
    pub fn drain_into<V: CommentFeedView + ?Sized>(&mut self, view: &mut V) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.rx.try_recv() {
            command.apply(view);
            applied += 1;
        }
        applied
    }

    /// Applies commands until the presenter stops sending.
    pub async fn run<V: CommentFeedView + ?Sized>(mut self, view: &mut V) -> usize {
        let mut applied = 0;
        while let Some(command) = self.rx.recv().await {
            command.apply(view);
            applied += 1;
        }
        applied
    }
}
