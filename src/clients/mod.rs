//! Hosting provider clients
//!
//! Each provider gets a thin REST client sharing the JSON plumbing in
//! [`http`]. The [`HostClient`] trait is the seam the editor UI talks
//! through; [`client_for`] picks the implementation from the project URL.

pub mod bitbucket;
pub mod github;
pub mod http;

use async_trait::async_trait;

use crate::error::{Result, TranslateError};
use crate::models::project::{Dict, Project};

pub use bitbucket::BitBucketClient;
pub use github::GitHubClient;
pub use http::JsonClient;

/// Common surface of the hosting provider clients
#[async_trait]
pub trait HostClient: Send + Sync + std::fmt::Debug {
    /// API host this client talks to
    fn host(&self) -> &'static str;

    /// Project configuration the client was built from
    fn project(&self) -> &Project;

    /// Fetch and parse one language's translation file
    async fn get_file_content(&self, lang: &str, branch: Option<&str>) -> Result<Dict>;

    /// Persist one language's dictionary on the working branch
    async fn save_file(&self, lang: &str, dict: &Dict, commit_message: &str) -> Result<()>;
}

/// Pick a client implementation from the project URL
pub fn client_for(project: Project) -> Result<Box<dyn HostClient>> {
    if project.url.contains(github::GITHUB_HOST) {
        Ok(Box::new(GitHubClient::new(project)?))
    } else if project.url.contains(bitbucket::BITBUCKET_HOST) {
        Ok(Box::new(BitBucketClient::new(project)?))
    } else {
        Err(TranslateError::InvalidUrl(project.url))
    }
}
