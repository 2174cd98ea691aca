//! GitHub REST v3 client for translation files
//!
//! Works against the contents API of a single repository directory. Saving
//! runs a strict sequence: ensure the working branch exists, re-fetch the
//! file's blob sha on that branch, PUT the new content, then open a pull
//! request if none is open yet. Remote side effects are not rolled back when
//! a later step fails; a created branch can be left without a commit.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::clients::http::{JsonClient, USER_AGENT_VALUE};
use crate::clients::HostClient;
use crate::error::{Result, TranslateError};
use crate::models::project::{CommitAuthor, Dict, Project};
use crate::utils::codec::{decode_base64_unicode, encode_base64_unicode};
use crate::utils::dict::{clean_empty_keys, dict_from_json, to_canonical_json};

pub const GITHUB_HOST: &str = "api.github.com";

const PULL_REQUEST_TITLE: &str = "Updated translations";

/// File metadata from the contents API
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubFile {
    pub content: String,
    pub encoding: String,
    pub sha: String,
}

/// A ref as listed by `git/refs`
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: GitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

/// Result of a content update
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubSavedFile {
    pub content: SavedContent,
    pub commit: SavedCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedContent {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedCommit {
    pub sha: String,
    pub html_url: String,
}

/// Payload of the contents PUT
#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
    content: &'a str,
    author: &'a CommitAuthor,
}

#[derive(Debug)]
pub struct GitHubClient {
    config: Project,
    author: CommitAuthor,
    http: JsonClient,
}

impl GitHubClient {
    /// Build a client for a contents URL on `api.github.com`. Fails fast on
    /// any other host.
    pub fn new(config: Project) -> Result<Self> {
        if !config.url.contains(GITHUB_HOST) {
            return Err(TranslateError::InvalidUrl(format!(
                "not a GitHub url: {}",
                config.url
            )));
        }

        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        defaults.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("token {token}")).map_err(|_| {
                TranslateError::InvalidInput("token contains invalid header characters".to_string())
            })?;
            defaults.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            config,
            author: CommitAuthor::default(),
            http: JsonClient::new(defaults),
        })
    }

    pub fn set_author_name(&mut self, name: &str) {
        self.author.name = name.to_string();
    }

    pub fn set_author_email(&mut self, email: &str) {
        self.author.email = email.to_string();
    }

    pub fn author(&self) -> &CommitAuthor {
        &self.author
    }

    fn file_url(&self, lang: &str) -> String {
        format!("{}{}.json", self.config.url, lang)
    }

    /// Repository root derived from the contents URL, e.g.
    /// `https://api.github.com/repos/{owner}/{repo}`
    fn repo_url(&self) -> Result<&str> {
        self.config
            .url
            .split_once("/contents")
            .map(|(root, _)| root)
            .ok_or_else(|| {
                TranslateError::InvalidUrl(format!(
                    "missing /contents/ segment: {}",
                    self.config.url
                ))
            })
    }

    fn owner(&self) -> Result<&str> {
        let root = self.repo_url()?;
        let mut segments = root.rsplit('/');
        let _repo = segments.next();
        segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TranslateError::InvalidUrl(format!("missing repo owner: {root}")))
    }

    /// Fetch file metadata, optionally from a specific branch
    pub async fn get_file(&self, lang: &str, branch: Option<&str>) -> Result<GitHubFile> {
        let mut request = self.http.request(Method::GET, &self.file_url(lang));
        if let Some(branch) = branch {
            request = request.query(&[("ref", branch)]);
        }
        self.http.send_json(request).await
    }

    /// Fetch and parse one language's dictionary
    pub async fn get_file_content(&self, lang: &str, branch: Option<&str>) -> Result<Dict> {
        let file = self.get_file(lang, branch).await?;
        let text = if file.encoding == "base64" {
            decode_base64_unicode(&file.content)?
        } else {
            file.content
        };
        dict_from_json(&text)
    }

    /// Commit the dictionary to the working branch and make sure a pull
    /// request is open for it.
    pub async fn save_file(
        &self,
        lang: &str,
        dict: &Dict,
        commit_message: &str,
    ) -> Result<GitHubSavedFile> {
        let base = self.ensure_branch().await?;

        let cleaned = clean_empty_keys(dict);
        let text = to_canonical_json(&cleaned, self.config.indent)?;
        let content = encode_base64_unicode(&text);

        // The update API wants the current blob sha so concurrent edits on
        // the remote are not clobbered silently.
        let sha = match self.get_file(lang, Some(&self.config.branch)).await {
            Ok(file) => file.sha,
            Err(TranslateError::Api { status: 404, .. }) => {
                return Err(TranslateError::FileNotFound(format!(
                    "{}.json does not exist on branch {}",
                    lang, self.config.branch
                )))
            }
            Err(e) => return Err(e),
        };

        let request = self
            .http
            .request(Method::PUT, &self.file_url(lang))
            .header(CONTENT_TYPE, "application/json")
            .json(&self.update_body(commit_message, &sha, &content));
        let saved: GitHubSavedFile = self.http.send_json(request).await?;
        tracing::info!(
            "committed {}.json to {}: {}",
            lang,
            self.config.branch,
            saved.commit.sha
        );

        self.ensure_pull_request(&base).await?;
        Ok(saved)
    }

    fn update_body<'a>(
        &'a self,
        message: &'a str,
        sha: &'a str,
        content: &'a str,
    ) -> UpdateBody<'a> {
        UpdateBody {
            message,
            sha,
            branch: &self.config.branch,
            content,
            author: &self.author,
        }
    }

    /// Create the working branch when absent. Returns the base branch name
    /// the working branch was (or would have been) cut from.
    async fn ensure_branch(&self) -> Result<String> {
        let refs_url = format!("{}/git/refs", self.repo_url()?);
        let refs: Vec<GitRef> = self
            .http
            .send_json(self.http.request(Method::GET, &refs_url))
            .await?;

        // The first listed ref stands in for the default branch. The refs
        // API gives no ordering guarantee, so this can pick the wrong base
        // on repositories where the default branch is not listed first.
        let first = refs
            .first()
            .ok_or_else(|| TranslateError::InvalidInput("repository has no refs".to_string()))?;
        let base = first
            .ref_name
            .trim_start_matches("refs/heads/")
            .to_string();

        if find_branch_sha(&refs, &self.config.branch).is_none() {
            let sha = first.object.sha.clone();

            #[derive(Serialize)]
            struct CreateRefBody<'a> {
                #[serde(rename = "ref")]
                ref_name: &'a str,
                sha: &'a str,
            }

            let head = format!("refs/heads/{}", self.config.branch);
            let request = self
                .http
                .request(Method::POST, &refs_url)
                .header(CONTENT_TYPE, "application/json")
                .json(&CreateRefBody {
                    ref_name: &head,
                    sha: &sha,
                });
            let _: serde_json::Value = self.http.send_json(request).await?;
            tracing::info!("created branch {} from {}", self.config.branch, base);
        }

        Ok(base)
    }

    /// Open a pull request for the working branch unless one is already open
    async fn ensure_pull_request(&self, base: &str) -> Result<()> {
        let pulls_url = format!("{}/pulls", self.repo_url()?);
        let head = format!("{}:{}", self.owner()?, self.config.branch);

        let request = self
            .http
            .request(Method::GET, &pulls_url)
            .query(&[("head", head.as_str()), ("state", "open")]);
        let open: Vec<serde_json::Value> = self.http.send_json(request).await?;
        if !should_open_pull_request(&open) {
            return Ok(());
        }

        #[derive(Serialize)]
        struct CreatePullBody<'a> {
            title: &'a str,
            head: &'a str,
            base: &'a str,
        }

        let request = self
            .http
            .request(Method::POST, &pulls_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&CreatePullBody {
                title: PULL_REQUEST_TITLE,
                head: &self.config.branch,
                base,
            });
        let _: serde_json::Value = self.http.send_json(request).await?;
        tracing::info!(
            "opened pull request from {} into {}",
            self.config.branch,
            base
        );
        Ok(())
    }
}

/// A new pull request is opened only when the open list for the head is empty
fn should_open_pull_request(open: &[serde_json::Value]) -> bool {
    open.is_empty()
}

/// Sha of `refs/heads/<branch>` in a listed ref set, if present
pub fn find_branch_sha<'a>(refs: &'a [GitRef], branch: &str) -> Option<&'a str> {
    let head = format!("refs/heads/{branch}");
    refs.iter()
        .find(|r| r.ref_name == head)
        .map(|r| r.object.sha.as_str())
}

#[async_trait::async_trait]
impl HostClient for GitHubClient {
    fn host(&self) -> &'static str {
        GITHUB_HOST
    }

    fn project(&self) -> &Project {
        &self.config
    }

    async fn get_file_content(&self, lang: &str, branch: Option<&str>) -> Result<Dict> {
        GitHubClient::get_file_content(self, lang, branch).await
    }

    async fn save_file(&self, lang: &str, dict: &Dict, commit_message: &str) -> Result<()> {
        GitHubClient::save_file(self, lang, dict, commit_message).await?;
        Ok(())
    }
}
