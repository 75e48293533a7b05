use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{CommentFeedPresenter, CurrentUser, MockApiClient};
use shared::domain::{Project, ProjectId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console_view;

use config::{load_settings, DemoStep};
use console_view::ConsoleView;

/// Drives the comment feed presenter against an in-memory API.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "feed.toml")]
    config: PathBuf,
    #[arg(long)]
    project_id: Option<i64>,
    #[arg(long)]
    backing: Option<bool>,
    #[arg(long)]
    latency_ms: Option<u64>,
    /// Demo step, repeatable: text:<body>, submit:<body>, login_click, login, back.
    #[arg(long = "step")]
    steps: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(project_id) = args.project_id {
        settings.project_id = project_id;
    }
    if let Some(backing) = args.backing {
        settings.backing = backing;
    }
    if let Some(latency_ms) = args.latency_ms {
        settings.latency_ms = latency_ms;
    }
    if !args.steps.is_empty() {
        settings.script = args.steps;
    }

    let filter = EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let steps = settings.steps()?;
    let project = Project {
        id: ProjectId(settings.project_id),
        name: settings.project_name.clone(),
        ..factories::project::project()
    };
    // The server only reports the pledge once the user is signed in.
    let server_project = Project {
        is_backing: settings.backing,
        ..project.clone()
    };

    let client = Arc::new(
        MockApiClient::new(server_project)
            .with_comments(factories::comment::comments(settings.comment_count))
            .with_commenter(factories::user::user())
            .with_latency(Duration::from_millis(settings.latency_ms)),
    );
    let current_user = CurrentUser::signed_out();
    let presenter = CommentFeedPresenter::spawn(client, &current_user);

    let port = presenter.attach_view();
    let ui = tokio::spawn(async move {
        let mut view = ConsoleView::default();
        port.run(&mut view).await;
        view
    });

    info!(project_id = settings.project_id, steps = steps.len(), "feed demo starting");
    presenter.initialize(project);
    for step in steps {
        presenter.when_idle().await;
        info!(?step, "feed demo: step");
        match step {
            DemoStep::ComposeText(text) => presenter.set_compose_text(text),
            DemoStep::Submit(body) => presenter.submit_comment(body),
            DemoStep::LoginClick => presenter.on_empty_state_login_clicked(),
            DemoStep::Login => {
                current_user.login(factories::user::user());
                presenter.notify_login_succeeded();
            }
            DemoStep::Back => presenter.on_project_context_clicked(),
        }
    }
    presenter.when_idle().await;
    presenter.shutdown().await;

    let view = ui.await.context("console view task failed")?;
    println!("{}", serde_json::to_string_pretty(view.summary())?);
    Ok(())
}
