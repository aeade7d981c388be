use async_trait::async_trait;
use http::header::USER_AGENT;
use log::debug;
use octocrab::Octocrab;
use serde_json::Value;

use crate::error::SearchError;
use crate::repositories::{self, ListParams, Repository};
use crate::users::{self, SearchParams, UserMatch};

/// The two read-only GitHub endpoints the search needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Searches accounts whose login matches `query`.
    async fn search_users(&self, query: &str, per_page: u8) -> Result<Vec<UserMatch>, SearchError>;

    /// Lists the public repositories of `login`.
    async fn list_repos(&self, login: &str, per_page: u8) -> Result<Vec<Repository>, SearchError>;
}

pub struct OctocrabApi {
    octocrab: Octocrab,
}

impl OctocrabApi {
    pub fn new(api_url: &str, user_agent: &str) -> octocrab::Result<Self> {
        let octocrab = Octocrab::builder()
            .base_uri(api_url)?
            .add_header(USER_AGENT, user_agent.to_string())
            .build()?;
        Ok(OctocrabApi { octocrab })
    }
}

#[async_trait]
impl GitHubApi for OctocrabApi {
    async fn search_users(&self, query: &str, per_page: u8) -> Result<Vec<UserMatch>, SearchError> {
        debug!("GET /search/users q={:?} per_page={}", query, per_page);
        let body: Value = self
            .octocrab
            .get("/search/users", Some(&SearchParams { q: query, per_page }))
            .await?;
        users::decode_search_response(body)
    }

    async fn list_repos(&self, login: &str, per_page: u8) -> Result<Vec<Repository>, SearchError> {
        let route = repositories::repos_route(login);
        debug!("GET {} per_page={}", route, per_page);
        let body: Value = self
            .octocrab
            .get(&route, Some(&ListParams { per_page }))
            .await?;
        repositories::decode_repositories(body)
    }
}
