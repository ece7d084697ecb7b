use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{OrNotFound, Resolution, Unresolved};
use crate::github::{render_tree_as_text, RepositoryHost};
use crate::models::{LicenseClassification, UNCLASSIFIED_LICENSE};
use crate::oracle::{prompts, TextOracle};

/// Locates and classifies the license of a source repository.
pub struct LicenseResolver {
    oracle: Arc<dyn TextOracle>,
    host: Arc<dyn RepositoryHost>,
    tree_depth: usize,
}

impl LicenseResolver {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        host: Arc<dyn RepositoryHost>,
        tree_depth: usize,
    ) -> Self {
        Self {
            oracle,
            host,
            tree_depth,
        }
    }

    pub async fn resolve_license(&self, link: &str) -> Resolution<LicenseClassification> {
        let id = self
            .host
            .resolve_identity(link)
            .ok_or_else(|| Unresolved::not_found(format!("repository link {:?}", link)))?;

        let branch = self
            .host
            .fetch_default_branch(&id)
            .await
            .or_not_found(format!("repository {}/{}", id.owner, id.clean_repo))?;

        let tree = self
            .host
            .fetch_file_tree(&id, &branch)
            .await
            .or_not_found(format!("file tree of {}/{}@{}", id.owner, id.clean_repo, branch))?;
        let structure = render_tree_as_text(&tree, self.tree_depth);
        debug!(link, %structure, "repository structure");

        let path = self
            .oracle
            .ask_allowing_empty(&prompts::license_path(&structure))
            .await
            .ok_or(Unresolved::NoAnswer("locating the license file"))?;
        if path.is_empty() {
            return Err(Unresolved::not_found(format!(
                "license file in {}/{}",
                id.owner, id.clean_repo
            )));
        }

        let text = self
            .host
            .fetch_file(&id, &path)
            .await
            .map(|text| text.filter(|t| !t.trim().is_empty()))
            .or_not_found(format!("{} in {}/{}", path, id.owner, id.clean_repo))?;

        let classification = match self.oracle.ask(&prompts::license_type(&text)).await {
            Some(license_type) => LicenseClassification::new(license_type, text),
            None => {
                warn!(link, path = %path, "license file found but not classified");
                LicenseClassification::new(UNCLASSIFIED_LICENSE, text)
            }
        };

        info!(link, path = %path, license = %classification.license_type, "resolved license");
        Ok(classification)
    }
}
