//! Terminal rendering of the comment feed screen.

use client_core::CommentFeedView;
use serde::Serialize;
use shared::domain::{Comment, Project, User};

#[derive(Debug, Default, Serialize)]
pub struct ViewSummary {
    pub renders: usize,
    pub comments_shown: usize,
    pub toasts: usize,
    pub dialogs_opened: usize,
    pub navigated_back: bool,
    pub login_requested: bool,
    pub submit_enabled: bool,
    pub posting: bool,
}

#[derive(Default)]
pub struct ConsoleView {
    summary: ViewSummary,
}

impl ConsoleView {
    pub fn summary(&self) -> &ViewSummary {
        &self.summary
    }
}

impl CommentFeedView for ConsoleView {
    fn render(&mut self, project: &Project, comments: &[Comment], current_user: Option<&User>) {
        self.summary.renders += 1;
        self.summary.comments_shown = comments.len();

        let viewer = current_user.map_or("guest", User::name);
        let backing = if project.is_backing() { " (backing)" } else { "" };
        println!("== {}{backing} | viewing as {viewer}", project.name);
        if comments.is_empty() {
            println!("   no comments yet, be the first!");
        }
        for comment in comments.iter().filter(|c| !c.is_deleted()) {
            println!(
                "   [{}] {}: {}",
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.author.name(),
                comment.body
            );
        }
    }

    fn navigate_back(&mut self) {
        self.summary.navigated_back = true;
        println!("<- back to project");
    }

    fn start_login(&mut self) {
        self.summary.login_requested = true;
        println!("-> login");
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.summary.submit_enabled = enabled;
    }

    fn dismiss_compose_dialog(&mut self) {
        println!("   (compose dialog closed)");
    }

    fn set_posting_indicator(&mut self, posting: bool) {
        self.summary.posting = posting;
        if posting {
            println!("   posting...");
        }
    }

    fn show_post_success_toast(&mut self) {
        self.summary.toasts += 1;
        println!("   comment posted");
    }

    fn open_compose_dialog(&mut self) {
        self.summary.dialogs_opened += 1;
        println!("   (compose dialog opened)");
    }
}
