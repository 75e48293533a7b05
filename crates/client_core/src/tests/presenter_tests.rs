use super::*;
use std::time::Duration;

use factories::{comment, project, user};
use shared::error::ErrorCode;
use tokio::time::timeout;

use crate::{ClientError, CurrentUser, MockApiClient, PostOutcome};

const WAIT: Duration = Duration::from_secs(2);

struct Harness {
    client: Arc<MockApiClient>,
    current_user: CurrentUser,
    presenter: CommentFeedPresenter,
    port: ViewPort,
}

fn harness(client: MockApiClient) -> Harness {
    let client = Arc::new(client);
    let current_user = CurrentUser::signed_out();
    let presenter = CommentFeedPresenter::spawn(client.clone(), &current_user);
    let port = presenter.attach_view();
    Harness {
        client,
        current_user,
        presenter,
        port,
    }
}

impl Harness {
    /// Waits for the presenter to go idle and returns everything it dispatched.
    async fn settle(&mut self) -> Vec<ViewCommand> {
        timeout(WAIT, self.presenter.when_idle())
            .await
            .expect("presenter should go idle");
        let mut commands = Vec::new();
        while let Some(command) = self.port.try_recv() {
            commands.push(command);
        }
        commands
    }

    async fn next(&mut self) -> ViewCommand {
        timeout(WAIT, self.port.recv())
            .await
            .expect("command in time")
            .expect("port open")
    }
}

fn renders(commands: &[ViewCommand]) -> Vec<&RenderSnapshot> {
    commands
        .iter()
        .filter_map(|command| match command {
            ViewCommand::Render(snapshot) => Some(snapshot),
            _ => None,
        })
        .collect()
}

fn count(commands: &[ViewCommand], wanted: &ViewCommand) -> usize {
    commands.iter().filter(|command| *command == wanted).count()
}

#[tokio::test]
async fn initialize_loads_comments_once_and_renders() {
    let mut h = harness(MockApiClient::new(project::project()).with_comments(comment::comments(2)));

    h.presenter.initialize(project::project());
    let commands = h.settle().await;

    assert_eq!(
        commands,
        vec![
            ViewCommand::DismissComposeDialog,
            ViewCommand::Render(RenderSnapshot {
                project: project::project(),
                comments: comment::comments(2),
                current_user: None,
            }),
        ]
    );
    assert_eq!(h.client.calls().await.fetch_comments, vec![project::project().id]);
    assert!(h.client.calls().await.fetch_project.is_empty());
}

#[tokio::test]
async fn compose_text_toggles_submit_control() {
    let mut h = harness(MockApiClient::new(project::project()));

    h.presenter.set_compose_text("hello");
    h.presenter.set_compose_text("");
    h.presenter.set_compose_text(" ");

    assert_eq!(
        h.settle().await,
        vec![
            ViewCommand::SetSubmitEnabled(true),
            ViewCommand::SetSubmitEnabled(false),
            ViewCommand::SetSubmitEnabled(true),
        ]
    );
}

#[tokio::test]
async fn successful_post_refreshes_once_and_shows_one_toast() {
    let mut h = harness(MockApiClient::new(project::project()).with_comments(comment::comments(1)));
    h.presenter.initialize(project::project());
    h.settle().await;

    h.presenter.set_compose_text("hello");
    h.presenter.submit_comment("hello");
    let commands = h.settle().await;

    assert_eq!(
        &commands[..7],
        &[
            ViewCommand::SetSubmitEnabled(true),
            ViewCommand::SetPostingIndicator(true),
            ViewCommand::SetSubmitEnabled(false),
            ViewCommand::SetPostingIndicator(false),
            ViewCommand::SetSubmitEnabled(true),
            ViewCommand::DismissComposeDialog,
            ViewCommand::ShowPostSuccessToast,
        ]
    );
    assert_eq!(count(&commands, &ViewCommand::ShowPostSuccessToast), 1);
    assert_eq!(count(&commands, &ViewCommand::DismissComposeDialog), 1);

    let rendered = renders(&commands);
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].comments.len(), 2);
    assert_eq!(rendered[0].comments[1].body, "hello");

    let calls = h.client.calls().await;
    assert_eq!(calls.fetch_comments.len(), 2);
    assert_eq!(
        calls.post_comment,
        vec![(project::project().id, "hello".to_string())]
    );
}

#[tokio::test]
async fn failed_post_clears_posting_without_refresh_or_toast() {
    let client = MockApiClient::new(project::project());
    client
        .set_post_outcome(PostOutcome::Fail(ClientError::api(
            ErrorCode::Validation,
            "body too long",
        )))
        .await;
    let mut h = harness(client);
    h.presenter.initialize(project::project());
    h.settle().await;

    h.presenter.submit_comment("hello");
    let commands = h.settle().await;

    assert_eq!(
        commands,
        vec![
            ViewCommand::SetPostingIndicator(true),
            ViewCommand::SetSubmitEnabled(false),
            ViewCommand::SetPostingIndicator(false),
        ]
    );
    assert_eq!(h.client.calls().await.fetch_comments.len(), 1);
}

#[tokio::test]
async fn submit_before_initialize_clears_posting_without_calling_api() {
    let mut h = harness(MockApiClient::new(project::project()));

    h.presenter.submit_comment("hello");

    assert_eq!(
        h.settle().await,
        vec![
            ViewCommand::SetPostingIndicator(true),
            ViewCommand::SetSubmitEnabled(false),
            ViewCommand::SetPostingIndicator(false),
        ]
    );
    assert!(h.client.calls().await.post_comment.is_empty());
}

#[tokio::test]
async fn submit_while_posting_is_ignored() {
    let client = MockApiClient::new(project::project()).with_latency(Duration::from_millis(50));
    let mut h = harness(client);
    h.presenter.initialize(project::project());
    h.settle().await;

    h.presenter.submit_comment("first");
    h.presenter.submit_comment("second");
    let commands = h.settle().await;

    assert_eq!(count(&commands, &ViewCommand::SetPostingIndicator(true)), 1);
    assert_eq!(count(&commands, &ViewCommand::ShowPostSuccessToast), 1);
    assert_eq!(
        h.client.calls().await.post_comment,
        vec![(project::project().id, "first".to_string())]
    );
}

#[tokio::test]
async fn login_success_opens_compose_dialog_once_for_backed_project() {
    let mut h = harness(MockApiClient::new(project::backed_project()));
    h.presenter.initialize(project::project());
    h.settle().await;

    h.presenter.notify_login_succeeded();
    let commands = h.settle().await;
    assert_eq!(count(&commands, &ViewCommand::OpenComposeDialog), 1);
    assert_eq!(
        h.client.calls().await.fetch_project,
        vec![project::project().id]
    );
    let rendered = renders(&commands);
    assert!(rendered.last().expect("render after refetch").project.is_backing());

    h.presenter.notify_login_succeeded();
    let commands = h.settle().await;
    assert_eq!(count(&commands, &ViewCommand::OpenComposeDialog), 0);
}

#[tokio::test]
async fn login_success_does_not_open_dialog_for_unbacked_project() {
    let mut h = harness(MockApiClient::new(project::project()));
    h.presenter.initialize(project::project());
    h.presenter.notify_login_succeeded();

    let commands = h.settle().await;
    assert_eq!(count(&commands, &ViewCommand::OpenComposeDialog), 0);
}

#[tokio::test]
async fn initialize_rearms_compose_dialog() {
    let mut h = harness(MockApiClient::new(project::backed_project()));
    h.presenter.initialize(project::backed_project());
    h.presenter.notify_login_succeeded();
    assert_eq!(count(&h.settle().await, &ViewCommand::OpenComposeDialog), 1);

    h.presenter.initialize(project::backed_project());
    assert_eq!(count(&h.settle().await, &ViewCommand::OpenComposeDialog), 0);

    h.presenter.notify_login_succeeded();
    assert_eq!(count(&h.settle().await, &ViewCommand::OpenComposeDialog), 1);
}

#[tokio::test]
async fn manually_shown_dialog_is_not_reopened_after_login() {
    let mut h = harness(MockApiClient::new(project::backed_project()));
    h.presenter.initialize(project::backed_project());
    h.presenter.comment_dialog_shown();
    h.presenter.notify_login_succeeded();

    assert_eq!(count(&h.settle().await, &ViewCommand::OpenComposeDialog), 0);
}

#[tokio::test]
async fn clicks_forward_to_view() {
    let mut h = harness(MockApiClient::new(project::project()));

    h.presenter.on_empty_state_login_clicked();
    h.presenter.on_project_context_clicked();

    assert_eq!(
        h.settle().await,
        vec![ViewCommand::StartLogin, ViewCommand::NavigateBack]
    );
}

#[tokio::test]
async fn attach_replays_latest_state_but_not_one_shot_events() {
    let client = Arc::new(MockApiClient::new(project::project()).with_comments(comment::comments(1)));
    let current_user = CurrentUser::new(Some(user::user()));
    let presenter = CommentFeedPresenter::spawn(client.clone(), &current_user);

    presenter.initialize(project::project());
    presenter.set_compose_text("draft");
    presenter.on_project_context_clicked();
    timeout(WAIT, presenter.when_idle()).await.expect("idle");

    let mut port = presenter.attach_view();
    timeout(WAIT, presenter.when_idle()).await.expect("idle");

    let mut commands = Vec::new();
    while let Some(command) = port.try_recv() {
        commands.push(command);
    }
    assert_eq!(
        commands,
        vec![
            ViewCommand::Render(RenderSnapshot {
                project: project::project(),
                comments: comment::comments(1),
                current_user: Some(user::user()),
            }),
            ViewCommand::SetSubmitEnabled(true),
        ]
    );
}

#[tokio::test]
async fn current_user_change_rerenders() {
    let mut h = harness(MockApiClient::new(project::project()));
    h.presenter.initialize(project::project());
    h.settle().await;

    h.current_user.login(user::creator());

    match h.next().await {
        ViewCommand::Render(snapshot) => {
            assert_eq!(snapshot.current_user, Some(user::creator()));
        }
        other => panic!("expected render, got {other:?}"),
    }
}

#[tokio::test]
async fn newer_comment_fetch_replaces_stale_one() {
    let client = MockApiClient::new(project::project()).with_comments(comment::comments(2));
    let gate = client.pause_comment_fetches().await;
    let mut h = harness(client);

    h.presenter.initialize(project::project());
    assert_eq!(h.next().await, ViewCommand::DismissComposeDialog);

    h.client.set_comments(comment::comments(3)).await;
    h.presenter.submit_comment("hello");
    loop {
        if h.next().await == ViewCommand::ShowPostSuccessToast {
            break;
        }
    }
    gate.release(2);

    let commands = h.settle().await;
    let rendered = renders(&commands);
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].comments.len(), 4);
}

#[tokio::test]
async fn fetch_failure_leaves_presenter_running() {
    let client = MockApiClient::new(project::project());
    client
        .fail_fetch_comments(Some(ClientError::Network("connection reset".into())))
        .await;
    let mut h = harness(client);

    h.presenter.initialize(project::project());
    assert_eq!(h.settle().await, vec![ViewCommand::DismissComposeDialog]);

    h.presenter.set_compose_text("still alive");
    assert_eq!(h.settle().await, vec![ViewCommand::SetSubmitEnabled(true)]);
}

#[tokio::test]
async fn detached_view_receives_nothing() {
    let mut h = harness(MockApiClient::new(project::project()));

    h.presenter.detach_view();
    h.presenter.on_project_context_clicked();
    h.presenter.initialize(project::project());
    timeout(WAIT, h.presenter.when_idle()).await.expect("idle");

    assert_eq!(timeout(WAIT, h.port.recv()).await.expect("closed"), None);
}

#[tokio::test]
async fn shutdown_stops_delivery_while_fetch_in_flight() {
    let client = MockApiClient::new(project::project()).with_comments(comment::comments(2));
    let gate = client.pause_comment_fetches().await;
    let mut h = harness(client);

    h.presenter.initialize(project::project());
    assert_eq!(h.next().await, ViewCommand::DismissComposeDialog);

    h.presenter.shutdown().await;
    gate.open();

    assert_eq!(timeout(WAIT, h.port.recv()).await.expect("closed"), None);
}

#[tokio::test]
async fn cloned_inputs_reach_the_same_session() {
    let mut h = harness(MockApiClient::new(project::project()));
    let inputs = h.presenter.inputs();

    let from_worker = tokio::spawn(async move {
        inputs.on_empty_state_login_clicked();
    });
    from_worker.await.expect("worker");

    assert_eq!(h.settle().await, vec![ViewCommand::StartLogin]);
}
