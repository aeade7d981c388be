use std::fmt::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::repositories::{Repository, UserWithRepos};
use crate::state::SearchState;

pub const PROMPT: &str = "Search GitHub username...";
pub const LOADING: &str = "Loading...";

const COLLAPSED: char = '▸';
const EXPANDED: char = '▾';

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Render repository names as OSC 8 terminal hyperlinks.
    pub hyperlinks: bool,
}

/// Renders the result list for the current state.
pub fn render(state: &SearchState, options: &RenderOptions) -> String {
    let mut out = String::new();
    if state.is_loading() {
        let _ = writeln!(out, "{}", LOADING);
    }
    if state.has_failed() {
        let _ = writeln!(out, "Search for {:?} did not complete; no results to show.", state.query());
    } else if state.has_searched() && state.results().is_empty() {
        let _ = writeln!(out, "No users found for {:?}.", state.query());
    }
    for (i, user) in state.results().iter().enumerate() {
        let expanded = state.is_expanded(&user.login);
        render_user(&mut out, i + 1, user, expanded, options);
    }
    out
}

fn render_user(out: &mut String, index: usize, user: &UserWithRepos, expanded: bool, options: &RenderOptions) {
    let marker = if expanded { EXPANDED } else { COLLAPSED };
    let count = match user.repos.len() {
        1 => "1 repo".to_string(),
        n => format!("{} repos", n),
    };
    let _ = writeln!(out, "[{}] {} {} ({})", index, marker, user.login, count);
    if !expanded {
        return;
    }
    if user.repos.is_empty() {
        let _ = writeln!(out, "      (no public repositories)");
    }
    for repo in &user.repos {
        render_repo(out, repo, options);
    }
}

fn render_repo(out: &mut String, repo: &Repository, options: &RenderOptions) {
    let name = if options.hyperlinks {
        hyperlink(&repo.url, &repo.name)
    } else {
        repo.name.clone()
    };
    let _ = writeln!(out, "      • {}  ★ {}", name, repo.star_count);
    if let Some(description) = &repo.description {
        let _ = writeln!(out, "        {}", description);
    }
    if !options.hyperlinks {
        let _ = writeln!(out, "        {}", repo.url);
    }
}

// OSC 8: terminals that support it open the target in the browser on click.
fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
}

/// Spinner on stderr, visible while a search is running.
pub struct LoadingIndicator {
    bar: Option<ProgressBar>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        LoadingIndicator { bar: None }
    }

    /// Shows or hides the spinner to match `loading`.
    pub fn sync(&mut self, loading: bool) {
        match (loading, self.bar.take()) {
            (true, Some(bar)) => self.bar = Some(bar),
            (true, None) => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                    bar.set_style(style);
                }
                bar.set_message(LOADING);
                bar.enable_steady_tick(Duration::from_millis(100));
                self.bar = Some(bar);
            }
            (false, Some(bar)) => bar.finish_and_clear(),
            (false, None) => {}
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.sync(false);
    }
}
