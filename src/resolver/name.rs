use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{Resolution, Unresolved};
use crate::models::{Ecosystem, SearchResult};
use crate::oracle::{prompts, TextOracle};
use crate::search::WebSearch;

/// Turns free-text dependency identifiers into repository links or registry
/// package names.
///
/// Answers are always grounded in an actual search result list: the oracle
/// writes the query and picks among hits, it never supplies a URL itself.
pub struct NameResolver {
    oracle: Arc<dyn TextOracle>,
    repository_search: Arc<dyn WebSearch>,
    registry_search: Arc<dyn WebSearch>,
}

impl NameResolver {
    /// `repository_search` should return repository-root shaped results;
    /// `registry_search` is a general web search.
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        repository_search: Arc<dyn WebSearch>,
        registry_search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            oracle,
            repository_search,
            registry_search,
        }
    }

    /// Best-guess source repository link for a dependency name.
    pub async fn resolve_repository_link(&self, name: &str) -> Resolution<String> {
        let query = match self.oracle.ask(&prompts::repository_query(name)).await {
            Some(query) => query,
            None => {
                debug!(name, "no synthesized query, using default");
                format!("{} Github", name)
            }
        };

        let search = self.repository_search.search(&query).await?;
        if search.results.is_empty() {
            return Err(Unresolved::not_found(format!(
                "no repository search results for {:?}",
                query
            )));
        }

        let answer = self
            .oracle
            .ask(&prompts::pick_repository(name, &search.results))
            .await;
        let index = clamp_index(answer.as_deref(), search.results.len());
        let link = pick(&search.results, index)?;

        info!(name, link = %link, index, "resolved repository link");
        Ok(link)
    }

    /// Canonical registry package name for one manifest line.
    ///
    /// Falls back to the leading package token of the line when the oracle
    /// cannot name the package.
    pub async fn resolve_package_name(
        &self,
        entry: &str,
        ecosystem: Ecosystem,
    ) -> Resolution<String> {
        let query = match self.oracle.ask(&prompts::registry_query(entry, ecosystem)).await {
            Some(query) => query,
            None => format!("{} {} package", entry, ecosystem.registry_name()),
        };

        let results = match self.registry_search.search(&query).await {
            Ok(search) => search.results,
            Err(e) => {
                warn!(entry, error = %e, "registry search failed");
                Vec::new()
            }
        };

        let answer = self
            .oracle
            .ask(&prompts::package_name(entry, ecosystem, &results))
            .await
            .map(|name| clean_package_name(&name))
            .filter(|name| !name.is_empty());

        match answer.or_else(|| leading_package_token(entry)) {
            Some(name) => {
                info!(entry, package = %name, %ecosystem, "resolved package name");
                Ok(name)
            }
            None => Err(Unresolved::NoAnswer("naming the package")),
        }
    }
}

/// Interpret an untrusted index answer against a list of `len` results.
///
/// The leading integer of the answer is used; a missing, non-numeric or
/// negative answer selects 0 and values past the end (however large) select
/// the last result.
pub fn clamp_index(answer: Option<&str>, len: usize) -> usize {
    let last = len.saturating_sub(1);
    let Some(a) = answer else {
        return 0;
    };
    let Ok(re) = Regex::new(r"^\s*(-?)([0-9]+)") else {
        return 0;
    };
    let Some(caps) = re.captures(a) else {
        return 0;
    };

    if &caps[1] == "-" {
        return 0;
    }
    // Digits only, so a parse error means overflow.
    caps[2].parse::<usize>().map_or(last, |n| n.min(last))
}

fn pick(results: &[SearchResult], index: usize) -> Resolution<String> {
    results
        .get(index)
        .map(|r| r.url.clone())
        .ok_or_else(|| Unresolved::not_found("search result"))
}

fn clean_package_name(name: &str) -> String {
    name.trim_matches(|c: char| c == '`' || c == '"' || c == '\'' || c.is_whitespace())
        .to_string()
}

/// The package identifier at the start of a manifest line, e.g. `requests`
/// from `requests[socks]>=2.31 ; python_version > "3.8"` or `@scope/pkg`
/// from `"@scope/pkg": "^1.0.0"`.
pub fn leading_package_token(entry: &str) -> Option<String> {
    let trimmed = entry.trim().trim_start_matches(['"', '\'']);
    let re = Regex::new(r"^(@[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+|[A-Za-z0-9][A-Za-z0-9_.\-]*)").ok()?;
    re.captures(trimmed).map(|caps| caps[1].to_string())
}
