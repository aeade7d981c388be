use serde_json::Value;

use crate::error::SearchError;
use crate::users::json_kind;

/// Number of repositories requested per user.
pub const REPOS_PER_PAGE: u8 = 100;

/// A repository as shown in the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub star_count: u64,
}

/// A matched user together with their repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithRepos {
    pub login: String,
    pub repos: Vec<Repository>,
}

// Raw record of `/users/{login}/repos`. Only the fields we display.
#[derive(Debug, Deserialize)]
struct RepoRecord {
    id: u64,
    name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: Option<u64>,
}

impl From<RepoRecord> for Repository {
    fn from(record: RepoRecord) -> Self {
        Repository {
            id: record.id,
            name: record.name,
            url: record.html_url,
            description: record.description.filter(|d| !d.is_empty()),
            star_count: record.stargazers_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListParams {
    pub per_page: u8,
}

pub fn repos_route(login: &str) -> String {
    format!("/users/{}/repos", login)
}

/// Decodes a repository listing, keeping the order the API returned.
pub fn decode_repositories(body: Value) -> Result<Vec<Repository>, SearchError> {
    if !body.is_array() {
        return Err(SearchError::MalformedResponse(format!(
            "expected a JSON array of repositories, got {}",
            json_kind(&body)
        )));
    }
    let records: Vec<RepoRecord> = serde_json::from_value(body)?;
    Ok(records.into_iter().map(Repository::from).collect())
}
