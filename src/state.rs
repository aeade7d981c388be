//! Search state, independent of any terminal or UI toolkit.
//!
//! Every change goes through one of the transitions below: [`SearchState::begin_search`],
//! [`SearchState::finish_search`] and [`SearchState::toggle`]. Each search gets a
//! generation number; only the outcome of the most recently started search is
//! applied, so a slow response can never overwrite a newer one.

use std::collections::HashSet;

use crate::error::SearchError;
use crate::repositories::UserWithRepos;

/// Queries shorter than this (after trimming) never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Whether `raw` is long enough to search for. Length is counted in UTF-16
/// code units, so a single astral character such as an emoji counts as two.
pub fn is_searchable(raw: &str) -> bool {
    raw.trim().encode_utf16().count() >= MIN_QUERY_LEN
}

/// Identifies one started search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchStart {
    /// Query too short; results were cleared and nothing must be fetched.
    Rejected,
    /// Fetch for the trimmed query and hand the outcome back with the ticket.
    Started(SearchTicket),
}

#[derive(Debug, Default)]
pub struct SearchState {
    query: String,
    loading: bool,
    searched: bool,
    failed: bool,
    results: Vec<UserWithRepos>,
    expanded: HashSet<String>,
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_search(&mut self, raw: &str) -> SearchStart {
        let trimmed = raw.trim();
        self.generation += 1;
        self.query = trimmed.to_string();
        self.results.clear();
        self.expanded.clear();

        self.searched = false;
        self.failed = false;

        if !is_searchable(trimmed) {
            self.loading = false;
            return SearchStart::Rejected;
        }

        self.loading = true;
        SearchStart::Started(SearchTicket {
            generation: self.generation,
            query: trimmed.to_string(),
        })
    }

    /// Applies the outcome of a search. Returns false, leaving the state
    /// untouched, when a newer search has been started since `ticket` was issued.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<UserWithRepos>, SearchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        // no partial results on failure
        self.failed = outcome.is_err();
        self.results = outcome.unwrap_or_default();
        self.expanded.clear();
        self.loading = false;
        self.searched = true;
        true
    }

    /// Flips the expansion of `login`, returning whether it is now expanded.
    pub fn toggle(&mut self, login: &str) -> bool {
        if self.expanded.remove(login) {
            false
        } else {
            self.expanded.insert(login.to_string());
            true
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.results.iter().map(|u| u.login.clone()).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the latest search has completed (successfully or not).
    pub fn has_searched(&self) -> bool {
        self.searched
    }

    /// True when the latest completed search failed. Its results are empty,
    /// but that emptiness says nothing about whether anyone matched.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn results(&self) -> &[UserWithRepos] {
        &self.results
    }

    pub fn is_expanded(&self, login: &str) -> bool {
        self.expanded.contains(login)
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    /// Login shown at 1-based position `index` of the result list.
    pub fn login_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.results.get(i))
            .map(|u| u.login.as_str())
    }
}
