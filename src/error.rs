use thiserror::Error;

/// Failures of the search pipeline.
///
/// An empty result is not an error: a search that matches nobody yields an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request never produced a response (connection, TLS, timeout...).
    #[error("network failure: {0}")]
    Network(String),

    /// The body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// GitHub answered with an error status.
    #[error("GitHub API error: {0}")]
    Api(String),
}

impl From<octocrab::Error> for SearchError {
    fn from(err: octocrab::Error) -> Self {
        // octocrab's own Display appends the captured backtrace; keep only the source.
        match err {
            octocrab::Error::GitHub { source, .. } => SearchError::Api(source.to_string()),
            octocrab::Error::Json { source, .. } => SearchError::MalformedResponse(source.to_string()),
            octocrab::Error::Serde { source, .. } => SearchError::MalformedResponse(source.to_string()),
            other => SearchError::Network(first_line(&other.to_string())),
        }
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::MalformedResponse(err.to_string())
    }
}
