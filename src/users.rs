// Decoding of the `/search/users` response.
// Only the login of each match is used; everything else GitHub sends is ignored.

use serde_json::Value;

use crate::error::SearchError;

/// Number of users requested from the search endpoint.
pub const USERS_PER_PAGE: u8 = 5;

/// A GitHub account returned by the user search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserMatch {
    pub login: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<UserMatch>>,
}

/// Query string parameters of the user search.
#[derive(Debug, Serialize)]
pub struct SearchParams<'a> {
    pub q: &'a str,
    pub per_page: u8,
}

/// Extracts the matched users, in the order GitHub ranked them.
/// A body without `items` means nobody matched.
pub fn decode_search_response(body: Value) -> Result<Vec<UserMatch>, SearchError> {
    if !body.is_object() {
        return Err(SearchError::MalformedResponse(format!(
            "expected a JSON object from user search, got {}",
            json_kind(&body)
        )));
    }
    let response: SearchResponse = serde_json::from_value(body)?;
    Ok(response.items.unwrap_or_default())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
