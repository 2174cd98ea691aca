//! BitBucket Cloud REST 2.0 client for translation files
//!
//! Reads files from the `src` endpoint and prepares the working branch.
//! The commit upload itself is an open gap: `save_file` refuses with
//! `Unsupported` after the branch step instead of pretending to persist.
//! OAuth2 bearer tokens come from a client-credentials grant and are fetched
//! fresh per operation, never cached; inefficient but free of expiry
//! bookkeeping.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::clients::http::{JsonClient, USER_AGENT_VALUE};
use crate::clients::HostClient;
use crate::error::{Result, TranslateError};
use crate::models::project::{CommitAuthor, Dict, Project};
use crate::utils::dict::dict_from_json;

pub const BITBUCKET_HOST: &str = "api.bitbucket.org";

const TOKEN_URL: &str = "https://bitbucket.org/site/oauth2/access_token";

/// OAuth2 token response. Ephemeral: requested anew for every authenticated
/// operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scopes: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchList {
    pub values: Vec<BranchValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchValue {
    pub name: String,
    pub target: BranchTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchTarget {
    pub hash: String,
}

#[derive(Debug)]
pub struct BitBucketClient {
    config: Project,
    author: CommitAuthor,
    http: JsonClient,
}

impl BitBucketClient {
    /// Build a client for a `src` URL on `api.bitbucket.org`. Fails fast on
    /// any other host.
    pub fn new(config: Project) -> Result<Self> {
        if !config.url.contains(BITBUCKET_HOST) {
            return Err(TranslateError::InvalidUrl(format!(
                "not a BitBucket url: {}",
                config.url
            )));
        }

        let mut defaults = HeaderMap::new();
        defaults.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

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

    /// Exchange the configured `clientId:clientSecret` pair for a bearer
    /// token via the OAuth2 client-credentials grant.
    pub async fn get_access_token(&self) -> Result<AuthResponse> {
        let token = self
            .config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                TranslateError::MissingCredentials(
                    "BitBucket needs a clientId:clientSecret token".to_string(),
                )
            })?;
        let (client_id, client_secret) = token.split_once(':').ok_or_else(|| {
            TranslateError::InvalidInput(
                "BitBucket token must be a clientId:clientSecret pair".to_string(),
            )
        })?;

        let body = format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(client_id),
            urlencoding::encode(client_secret)
        );
        let request = self
            .http
            .request(Method::POST, TOKEN_URL)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);
        self.http.send_json(request).await
    }

    /// Branch collection URL derived from the `src` URL
    fn branch_list_url(&self) -> Result<String> {
        let root = self
            .config
            .url
            .split_once("/src/")
            .map(|(root, _)| root)
            .ok_or_else(|| {
                TranslateError::InvalidUrl(format!("missing /src/ segment: {}", self.config.url))
            })?;
        Ok(format!("{root}/refs/branches"))
    }

    fn file_url(&self, lang: &str, branch: Option<&str>) -> Result<String> {
        let base = match branch {
            Some(branch) => substitute_branch(&self.config.url, branch)?,
            None => self.config.url.clone(),
        };
        Ok(format!("{base}{lang}.json"))
    }

    /// Fetch and parse one language's dictionary, optionally from a branch
    /// other than the one in the configured URL
    pub async fn get_file_content(&self, lang: &str, branch: Option<&str>) -> Result<Dict> {
        let url = self.file_url(lang, branch)?;
        let headers = match &self.config.token {
            Some(_) => {
                let auth = self.get_access_token().await?;
                bearer_headers(&auth.access_token)?
            }
            None => HeaderMap::new(),
        };
        let request = self.http.request_with(Method::GET, &url, headers);
        let text = self.http.send_text(request).await?;
        dict_from_json(&text)
    }

    /// Token, branch preparation, then the (unfinished) commit upload
    pub async fn save_file(&self, lang: &str, dict: &Dict, commit_message: &str) -> Result<()> {
        let auth = self.get_access_token().await?;
        self.create_branch_if_not_exists(&auth.access_token).await?;
        self.commit(lang, dict, commit_message, &auth.access_token)
            .await
    }

    pub async fn create_branch_if_not_exists(&self, token: &str) -> Result<()> {
        if !self.branch_exists(token).await? {
            self.create_branch(token).await?;
        }
        Ok(())
    }

    async fn branch_exists(&self, token: &str) -> Result<bool> {
        let request =
            self.http
                .request_with(Method::GET, &self.branch_list_url()?, bearer_headers(token)?);
        let branches: BranchList = self.http.send_json(request).await?;
        Ok(branches.values.iter().any(|b| b.name == self.config.branch))
    }

    async fn create_branch(&self, token: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Target<'a> {
            hash: &'a str,
        }

        #[derive(Serialize)]
        struct CreateBranchBody<'a> {
            name: &'a str,
            target: Target<'a>,
        }

        let request = self
            .http
            .request_with(Method::POST, &self.branch_list_url()?, bearer_headers(token)?)
            .header(CONTENT_TYPE, "application/json")
            .json(&CreateBranchBody {
                name: &self.config.branch,
                target: Target { hash: "main" },
            });
        let _: serde_json::Value = self.http.send_json(request).await?;
        tracing::info!("created branch {}", self.config.branch);
        Ok(())
    }

    /// Upload the dictionary as a commit on the working branch.
    ///
    /// TODO wire up the repository `src` upload endpoint (form post with
    /// message, branch, author and file content). Until then persisting is
    /// refused explicitly so callers cannot mistake it for a saved edit.
    pub async fn commit(
        &self,
        lang: &str,
        _dict: &Dict,
        _commit_message: &str,
        _token: &str,
    ) -> Result<()> {
        Err(TranslateError::Unsupported(format!(
            "BitBucket commit of {lang}.json is not implemented"
        )))
    }
}

fn bearer_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        TranslateError::InvalidInput("token contains invalid header characters".to_string())
    })?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Swap the branch segment of a `.../src/<branch>/<path>/` URL
fn substitute_branch(url: &str, branch: &str) -> Result<String> {
    let (root, rest) = url
        .split_once("/src/")
        .ok_or_else(|| TranslateError::InvalidUrl(format!("missing /src/ segment: {url}")))?;
    let (_, tail) = rest
        .split_once('/')
        .ok_or_else(|| TranslateError::InvalidUrl(format!("missing branch segment: {url}")))?;
    Ok(format!("{root}/src/{branch}/{tail}"))
}

#[async_trait::async_trait]
impl HostClient for BitBucketClient {
    fn host(&self) -> &'static str {
        BITBUCKET_HOST
    }

    fn project(&self) -> &Project {
        &self.config
    }

    async fn get_file_content(&self, lang: &str, branch: Option<&str>) -> Result<Dict> {
        BitBucketClient::get_file_content(self, lang, branch).await
    }

    async fn save_file(&self, lang: &str, dict: &Dict, commit_message: &str) -> Result<()> {
        BitBucketClient::save_file(self, lang, dict, commit_message).await
    }
}
