use std::sync::Arc;

use futures::future::try_join_all;
use log::{error, info, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::api::GitHubApi;
use crate::error::SearchError;
use crate::repositories::{UserWithRepos, REPOS_PER_PAGE};
use crate::state::{SearchStart, SearchState, SearchTicket};
use crate::users::USERS_PER_PAGE;

/// What a finished search posts back to the interactive loop.
pub type SearchOutcome = (SearchTicket, Result<Vec<UserWithRepos>, SearchError>);

/// Searches users, then fetches every user's repositories concurrently.
///
/// Fails as soon as any single request fails; users keep the order of the
/// search response and repositories the order of their listing.
pub async fn fetch_users_with_repos(
    api: &dyn GitHubApi,
    query: &str,
) -> Result<Vec<UserWithRepos>, SearchError> {
    let matches = api.search_users(query, USERS_PER_PAGE).await?;
    info!("{} users match {:?}", matches.len(), query);

    let fetches = matches.into_iter().map(|user| async move {
        let repos = api.list_repos(&user.login, REPOS_PER_PAGE).await?;
        Ok::<_, SearchError>(UserWithRepos {
            login: user.login,
            repos,
        })
    });
    try_join_all(fetches).await
}

pub struct SearchController {
    api: Arc<dyn GitHubApi>,
    state: SearchState,
}

impl SearchController {
    pub fn new(api: Arc<dyn GitHubApi>) -> Self {
        SearchController {
            api,
            state: SearchState::new(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Runs a whole search in place. Failures are logged and leave an empty
    /// result list.
    pub async fn search(&mut self, query: &str) -> &[UserWithRepos] {
        if let Some(ticket) = self.start(query) {
            let outcome = fetch_users_with_repos(self.api.as_ref(), ticket.query()).await;
            self.apply(ticket, outcome);
        }
        self.state.results()
    }

    /// Starts a search on a background task; its outcome is sent to `tx` and
    /// must be fed back through [`SearchController::apply`].
    /// Returns false when the query was too short to search.
    pub fn spawn_search(&mut self, query: &str, tx: UnboundedSender<SearchOutcome>) -> bool {
        let ticket = match self.start(query) {
            Some(ticket) => ticket,
            None => return false,
        };
        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = fetch_users_with_repos(api.as_ref(), ticket.query()).await;
            if tx.send((ticket, outcome)).is_err() {
                warn!("search finished after the session ended");
            }
        });
        true
    }

    /// Feeds a search outcome into the state. Returns whether it was applied.
    pub fn apply(&mut self, ticket: SearchTicket, outcome: Result<Vec<UserWithRepos>, SearchError>) -> bool {
        match &outcome {
            Ok(users) => info!(
                "search {:?} (#{}) finished with {} users",
                ticket.query(),
                ticket.generation(),
                users.len()
            ),
            Err(err) => error!("GitHub API error for {:?}: {}", ticket.query(), err),
        }
        let applied = self.state.finish_search(&ticket, outcome);
        if !applied {
            warn!(
                "discarding results of superseded search {:?} (#{})",
                ticket.query(),
                ticket.generation()
            );
        }
        applied
    }

    pub fn toggle(&mut self, login: &str) -> bool {
        self.state.toggle(login)
    }

    pub fn expand_all(&mut self) {
        self.state.expand_all();
    }

    pub fn collapse_all(&mut self) {
        self.state.collapse_all();
    }

    fn start(&mut self, query: &str) -> Option<SearchTicket> {
        match self.state.begin_search(query) {
            SearchStart::Started(ticket) => {
                info!("searching for {:?}", ticket.query());
                Some(ticket)
            }
            SearchStart::Rejected => {
                info!("query {:?} too short, not searching", query.trim());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockGitHubApi;
    use crate::render::{render, RenderOptions};
    use crate::repositories::Repository;
    use crate::users::UserMatch;
    use tokio::sync::mpsc;

    fn matches(logins: &[&str]) -> Vec<UserMatch> {
        logins
            .iter()
            .map(|login| UserMatch {
                login: login.to_string(),
            })
            .collect()
    }

    fn repo(id: u64, name: &str) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            url: format!("https://github.com/x/{}", name),
            description: None,
            star_count: 0,
        }
    }

    fn controller(mock: MockGitHubApi) -> SearchController {
        SearchController::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn short_query_makes_no_requests() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users().times(0);
        mock.expect_list_repos().times(0);
        let mut controller = controller(mock);

        for query in ["", "a", "  a  ", "\t"] {
            assert!(controller.search(query).await.is_empty());
            assert!(!controller.state().is_loading());
        }
    }

    #[tokio::test]
    async fn octocat_results_are_rendered() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users()
            .withf(|query, per_page| query.to_string() == "octocat" && *per_page == 5)
            .times(1)
            .returning(|_, _| Ok(matches(&["octocat"])));
        mock.expect_list_repos()
            .withf(|login, per_page| login.to_string() == "octocat" && *per_page == 100)
            .times(1)
            .returning(|_, _| {
                Ok(vec![Repository {
                    id: 1,
                    name: "Hello-World".to_string(),
                    url: "https://github.com/octocat/Hello-World".to_string(),
                    description: Some("My first repository on GitHub!".to_string()),
                    star_count: 42,
                }])
            });
        let mut controller = controller(mock);

        let results = controller.search(" octocat ").await;
        assert_eq!(results.len(), 1);
        assert!(!controller.state().is_loading());

        let options = RenderOptions { hyperlinks: false };
        let collapsed = render(controller.state(), &options);
        assert!(collapsed.contains("octocat"));
        assert!(!collapsed.contains("Hello-World"));

        assert!(controller.toggle("octocat"));
        let expanded = render(controller.state(), &options);
        assert!(expanded.contains("octocat"));
        assert!(expanded.contains("Hello-World"));
        assert!(expanded.contains("My first repository on GitHub!"));
        assert!(expanded.contains("42"));
    }

    #[tokio::test]
    async fn failed_repo_listing_discards_everything() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users()
            .returning(|_, _| Ok(matches(&["octocat", "octokit"])));
        mock.expect_list_repos().returning(|login, _| {
            if login == "octokit" {
                Err(SearchError::Network("connection reset".to_string()))
            } else {
                Ok(vec![repo(1, "Hello-World")])
            }
        });
        let mut controller = controller(mock);

        assert!(controller.search("octo").await.is_empty());
        assert!(!controller.state().is_loading());
        assert!(controller.state().has_searched());
    }

    #[tokio::test]
    async fn failed_user_search_yields_empty_results() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users()
            .returning(|_, _| Err(SearchError::MalformedResponse("not json".to_string())));
        mock.expect_list_repos().times(0);
        let mut controller = controller(mock);

        assert!(controller.search("octo").await.is_empty());
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn no_matches_is_an_empty_success() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users().returning(|_, _| Ok(Vec::new()));
        mock.expect_list_repos().times(0);

        let users = fetch_users_with_repos(&mock, "zzzzzz").await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn order_follows_the_api() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users()
            .returning(|_, _| Ok(matches(&["carol", "alice", "bob"])));
        mock.expect_list_repos().returning(|login, _| {
            Ok(vec![
                repo(9, &format!("{}-z", login)),
                repo(2, &format!("{}-a", login)),
            ])
        });

        let users = fetch_users_with_repos(&mock, "any").await.unwrap();
        let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, vec!["carol", "alice", "bob"]);
        let names: Vec<&str> = users[0].repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["carol-z", "carol-a"]);
    }

    #[tokio::test]
    async fn superseded_background_search_is_discarded() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users()
            .returning(|query, _| Ok(matches(&[query])));
        mock.expect_list_repos()
            .returning(|login, _| Ok(vec![repo(1, &format!("{}-repo", login))]));
        let mut controller = controller(mock);
        let (tx, mut rx) = mpsc::unbounded_channel();

        assert!(controller.spawn_search("octocat", tx.clone()));
        assert!(controller.spawn_search("torvalds", tx.clone()));
        assert!(!controller.spawn_search("t", tx));
        assert!(!controller.state().is_loading());

        let mut applied = 0;
        while let Some((ticket, outcome)) = rx.recv().await {
            if controller.apply(ticket, outcome) {
                applied += 1;
            }
        }
        assert_eq!(applied, 0);
        assert!(controller.state().results().is_empty());
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn latest_background_search_wins() {
        let mut mock = MockGitHubApi::new();
        mock.expect_search_users()
            .returning(|query, _| Ok(matches(&[query])));
        mock.expect_list_repos()
            .returning(|login, _| Ok(vec![repo(1, &format!("{}-repo", login))]));
        let mut controller = controller(mock);
        let (tx, mut rx) = mpsc::unbounded_channel();

        assert!(controller.spawn_search("octocat", tx.clone()));
        assert!(controller.spawn_search("torvalds", tx));
        assert!(controller.state().is_loading());

        while let Some((ticket, outcome)) = rx.recv().await {
            controller.apply(ticket, outcome);
        }
        assert_eq!(controller.state().login_at(1), Some("torvalds"));
        assert_eq!(controller.state().results().len(), 1);
        assert!(!controller.state().is_loading());
    }
}
