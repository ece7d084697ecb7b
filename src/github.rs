//! Source-repository metadata: identity parsing, default branch, file tree and
//! raw file content, plus the bounded-depth tree rendering fed to the oracle.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GithubConfig;
use crate::models::TreeEntry;

const JSON: &str = "application/vnd.github+json";
const RAW: &str = "application/vnd.github.v3.raw";

/// Owner and repository parsed from a repository link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub owner: String,
    /// Repository segment as written in the link.
    pub repo: String,
    /// Repository segment without a trailing `.git`.
    pub clean_repo: String,
}

/// A source-hosting service.
///
/// Fetch methods return `Ok(None)` when the service has no such record and
/// `Err` when the lookup itself failed.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    fn resolve_identity(&self, link: &str) -> Option<RepoIdentity>;

    async fn fetch_default_branch(&self, id: &RepoIdentity) -> Result<Option<String>>;

    async fn fetch_file_tree(&self, id: &RepoIdentity, branch: &str)
        -> Result<Option<Vec<TreeEntry>>>;

    async fn fetch_file(&self, id: &RepoIdentity, path: &str) -> Result<Option<String>>;
}

/// Parse `github.com/<owner>/<repo>` out of a link.
pub fn resolve_identity(link: &str) -> Option<RepoIdentity> {
    let re = Regex::new(r"github\.com[/:]([^/\s]+)/([^/?#\s]+)").ok()?;
    let Some(caps) = re.captures(link) else {
        debug!(link, "link is not a GitHub repository link");
        return None;
    };

    let owner = caps[1].to_string();
    let repo = caps[2].to_string();
    let clean_repo = repo.strip_suffix(".git").unwrap_or(&repo).to_string();

    Some(RepoIdentity {
        owner,
        repo,
        clean_repo,
    })
}

/// Render entries at most `max_depth` path segments deep, sorted by path, one
/// indented line per entry naming its last segment.
pub fn render_tree_as_text(tree: &[TreeEntry], max_depth: usize) -> String {
    let mut shown: Vec<&TreeEntry> = tree
        .iter()
        .filter(|e| e.path.split('/').count() <= max_depth)
        .collect();
    shown.sort_by(|a, b| a.path.cmp(&b.path));

    let mut output = String::from("Repository File Structure:\n\n");
    for entry in shown {
        let depth = entry.path.split('/').count() - 1;
        let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        output.push_str(&"  ".repeat(depth));
        output.push_str(name);
        output.push('\n');
    }
    output
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeListing {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

/// GitHub REST API client.
pub struct GithubClient {
    client: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(client: Client, config: GithubConfig) -> Self {
        Self { client, config }
    }

    /// API URL for `/repos/{owner}/{repo}/...`, each segment percent-encoded.
    /// Segments are split on `/`, so branch names and file paths may nest.
    fn repo_url(&self, id: &RepoIdentity, rest: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("GitHub API URL cannot take a path: {}", self.config.api_url))?
            .pop_if_empty()
            .extend(["repos", id.owner.as_str(), id.clean_repo.as_str()])
            .extend(
                rest.iter()
                    .flat_map(|part| part.split('/'))
                    .filter(|segment| !segment.is_empty()),
            );
        Ok(url)
    }

    fn get(&self, url: Url, accept: &str) -> RequestBuilder {
        let request = self.client.get(url).header("Accept", accept);
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RepositoryHost for GithubClient {
    fn resolve_identity(&self, link: &str) -> Option<RepoIdentity> {
        resolve_identity(link)
    }

    async fn fetch_default_branch(&self, id: &RepoIdentity) -> Result<Option<String>> {
        let response = self
            .get(self.repo_url(id, &[])?, JSON)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            s if !s.is_success() => bail!("GitHub repository lookup returned HTTP {}", s.as_u16()),
            _ => {}
        }

        let info: RepoInfo = response.json().await?;
        Ok(info.default_branch.filter(|b| !b.is_empty()))
    }

    async fn fetch_file_tree(
        &self,
        id: &RepoIdentity,
        branch: &str,
    ) -> Result<Option<Vec<TreeEntry>>> {
        let response = self
            .get(self.repo_url(id, &["git", "trees", branch])?, JSON)
            .query(&[("recursive", "1")])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => return Ok(None),
            s if !s.is_success() => bail!("GitHub tree lookup returned HTTP {}", s.as_u16()),
            _ => {}
        }

        let listing: TreeListing = response.json().await?;
        if listing.truncated {
            warn!(owner = %id.owner, repo = %id.clean_repo, "GitHub truncated the file tree");
        }
        Ok(Some(listing.tree))
    }

    async fn fetch_file(&self, id: &RepoIdentity, path: &str) -> Result<Option<String>> {
        let path = path.trim_start_matches("./");
        let response = self
            .get(self.repo_url(id, &["contents", path])?, RAW)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            s if !s.is_success() => bail!("GitHub file fetch returned HTTP {}", s.as_u16()),
            _ => {}
        }

        Ok(Some(response.text().await?))
    }
}
