//! Client implementation for the GitHub REST API, plus the `owner/repo` identifier type.
//!
//! Two endpoints are used: `GET /repos/<owner>/<repo>` for the default branch and
//! `GET /repos/<owner>/<repo>/contents/` for the files at the root of that branch. Together
//! they let the pipeline link straight to a `CITATION*` file.
//!
//! # Examples
//!
//! ```no_run
//! use station::{
//!   clients::{github::RepoId, http_client, GitHubClient},
//!   config::{Config, GITHUB_API_URL},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = RepoId::from_url("https://github.com/healpy/healpy").unwrap();
//! let client = GitHubClient::new(http_client(&Config::default())?, GITHUB_API_URL);
//!
//! let branch = client.default_branch(&repo).await?;
//! for entry in client.root_listing(&repo).await? {
//!   println!("{}", repo.blob_url(&branch, &entry.name));
//! }
//! # Ok(())
//! # }
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

/// Web host that repository and blob links point at.
pub const GITHUB_WEB_URL: &str = "https://github.com";

/// First path segments on github.com that name site pages rather than accounts.
const RESERVED_OWNERS: [&str; 4] = ["sponsors", "orgs", "apps", "marketplace"];

lazy_static! {
  /// A GitHub repository URL; owner and repository are limited to GitHub's name alphabet.
  static ref GITHUB_REPO: Regex =
    Regex::new(r"https?://(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)").unwrap();
}

/// A GitHub repository in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
  /// Account or organisation owning the repository
  pub owner: String,
  /// Repository name, without any `.git` suffix
  pub name:  String,
}

impl RepoId {
  /// Finds the first GitHub repository URL in `text` and reduces it to `owner/repo`.
  ///
  /// Scheme, host and any trailing path (`/issues`, `/tree/main/docs`, ...) are dropped, as is
  /// a `.git` suffix. Site pages such as `github.com/sponsors/<user>` are not repositories.
  ///
  /// ```
  /// use station::clients::github::RepoId;
  ///
  /// let repo = RepoId::from_url("https://github.com/healpy/healpy.git").unwrap();
  /// assert_eq!(repo.to_string(), "healpy/healpy");
  ///
  /// let repo = RepoId::from_url("https://github.com/healpy/healpy/issues").unwrap();
  /// assert_eq!(repo.web_url(), "https://github.com/healpy/healpy");
  ///
  /// assert!(RepoId::from_url("https://gitlab.com/healpy/healpy").is_none());
  /// ```
  pub fn from_url(text: &str) -> Option<Self> {
    GITHUB_REPO.captures_iter(text).find_map(|captures| {
      let owner = captures.get(1)?.as_str();
      if RESERVED_OWNERS.iter().any(|reserved| owner.eq_ignore_ascii_case(reserved)) {
        return None;
      }
      let name = captures.get(2)?.as_str();
      let name = name.trim_end_matches('.');
      let name = name.strip_suffix(".git").unwrap_or(name);
      if name.is_empty() {
        return None;
      }
      Some(Self { owner: owner.to_string(), name: name.to_string() })
    })
  }

  /// Link to the repository front page.
  pub fn web_url(&self) -> String { format!("{GITHUB_WEB_URL}/{}/{}", self.owner, self.name) }

  /// Link to `path` on `branch`.
  pub fn blob_url(&self, branch: &str, path: &str) -> String {
    format!("{}/blob/{branch}/{path}", self.web_url())
  }
}

impl std::fmt::Display for RepoId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

/// Repository metadata; only the default branch is of interest.
#[derive(Debug, Deserialize)]
struct Repository {
  /// Name of the default branch, e.g. `main`
  default_branch: String,
}

/// One entry of a repository directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
  /// File or directory name
  pub name:       String,
  /// Path from the repository root
  #[serde(default)]
  pub path:       String,
  /// `file`, `dir`, `symlink` or `submodule`
  #[serde(rename = "type", default)]
  pub entry_type: String,
}

/// Client for the GitHub REST API.
pub struct GitHubClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
  /// Bearer token sent with GitHub requests only.
  token:    Option<String>,
}

impl GitHubClient {
  /// Creates a new anonymous GitHub client talking to `base_url` (e.g.
  /// [`config::GITHUB_API_URL`]).
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self { client, base_url: base_url.to_string(), token: None }
  }

  /// Authenticates every request of this client with `token`, if any.
  pub fn with_token(mut self, token: Option<String>) -> Self {
    self.token = token;
    self
  }

  /// Fetches the name of the repository's default branch.
  ///
  /// # Errors
  ///
  /// Returns an error if the request fails, the repository is unknown or private, or the
  /// response cannot be parsed.
  pub async fn default_branch(&self, repo: &RepoId) -> Result<String, StationError> {
    let url = endpoint(&self.base_url, ["repos", repo.owner.as_str(), repo.name.as_str()])?;
    let repository: Repository = self.get_json(url).await?;
    debug!("Default branch of {repo}: {}", repository.default_branch);
    Ok(repository.default_branch)
  }

  /// Lists the entries at the root of the repository's default branch, in API order.
  ///
  /// # Errors
  ///
  /// Returns an error if the request fails or the response is not a directory listing.
  pub async fn root_listing(&self, repo: &RepoId) -> Result<Vec<ContentEntry>, StationError> {
    let url = endpoint(&self.base_url, [
      "repos",
      repo.owner.as_str(),
      repo.name.as_str(),
      "contents",
      "",
    ])?;
    let entries: Vec<ContentEntry> = self.get_json(url).await?;
    debug!("Root of {repo} holds {} entries", entries.len());
    Ok(entries)
  }

  /// Issues a GET request and decodes a successful JSON response.
  async fn get_json<T: serde::de::DeserializeOwned>(
    &self,
    url: url::Url,
  ) -> Result<T, StationError> {
    debug!("Fetching from GitHub via: {url}");
    let mut request = self.client.get(url.clone()).header("Accept", "application/vnd.github+json");
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    let status = response.status();
    debug!("GitHub response status: {status}");

    if !status.is_success() {
      return Err(StationError::ApiError(format!("GitHub returned {status} for {url}")));
    }

    let text = response.text().await?;
    trace!("GitHub response: {text}");
    Ok(serde_json::from_str(&text)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_repo_from_url() {
    let repo = RepoId::from_url("https://github.com/healpy/healpy").unwrap();
    assert_eq!(repo, RepoId { owner: "healpy".into(), name: "healpy".into() });

    let repo = RepoId::from_url("http://www.github.com/astropy/astropy.git#readme").unwrap();
    assert_eq!(repo.to_string(), "astropy/astropy");

    let repo = RepoId::from_url("see (https://github.com/numpy/numpy) for more").unwrap();
    assert_eq!(repo.to_string(), "numpy/numpy");

    assert_eq!(
      RepoId::from_url("https://github.com/healpy/healpy/blob/main/README.rst").unwrap().web_url(),
      "https://github.com/healpy/healpy"
    );

    assert!(RepoId::from_url("https://github.com/healpy").is_none());
    assert!(RepoId::from_url("https://github.com/sponsors/healpy").is_none());
    assert!(RepoId::from_url("https://github.com/orgs/healpy/people").is_none());
    assert_eq!(
      RepoId::from_url("https://github.com/Sponsors/x https://github.com/healpy/healpy")
        .unwrap()
        .to_string(),
      "healpy/healpy"
    );
    assert!(RepoId::from_url("https://healpy.readthedocs.io").is_none());
  }

  #[test]
  fn test_blob_url() {
    let repo = RepoId { owner: "healpy".into(), name: "healpy".into() };
    assert_eq!(
      repo.blob_url("main", "CITATION.cff"),
      "https://github.com/healpy/healpy/blob/main/CITATION.cff"
    );
  }

  #[traced_test]
  #[tokio::test]
  async fn test_default_branch_and_listing() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _repo = server
      .mock("GET", "/repos/healpy/healpy")
      .with_status(200)
      .with_body(r#"{"full_name": "healpy/healpy", "default_branch": "main"}"#)
      .create_async()
      .await;
    let _contents = server
      .mock("GET", "/repos/healpy/healpy/contents/")
      .with_status(200)
      .with_body(
        r#"[{"name": "CITATION", "path": "CITATION", "type": "file"},
            {"name": "healpy", "path": "healpy", "type": "dir"}]"#,
      )
      .create_async()
      .await;

    let client = GitHubClient::new(reqwest::Client::new(), &server.url());
    let repo = RepoId { owner: "healpy".into(), name: "healpy".into() };

    assert_eq!(client.default_branch(&repo).await?, "main");
    let entries = client.root_listing(&repo).await?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "CITATION");
    assert_eq!(entries[1].entry_type, "dir");
    Ok(())
  }

  #[tokio::test]
  async fn test_token_is_sent_to_github() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _m = server
      .mock("GET", "/repos/healpy/healpy")
      .match_header("authorization", "Bearer ghp_secret")
      .with_body(r#"{"default_branch": "main"}"#)
      .create_async()
      .await;

    let client = GitHubClient::new(reqwest::Client::new(), &server.url())
      .with_token(Some("ghp_secret".into()));
    let repo = RepoId { owner: "healpy".into(), name: "healpy".into() };
    assert_eq!(client.default_branch(&repo).await?, "main");
    Ok(())
  }

  #[tokio::test]
  async fn test_missing_repository() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("GET", "/repos/ghost/ghost").with_status(404).create_async().await;

    let client = GitHubClient::new(reqwest::Client::new(), &server.url());
    let repo = RepoId { owner: "ghost".into(), name: "ghost".into() };
    assert!(matches!(client.default_branch(&repo).await, Err(StationError::ApiError(_))));
  }
}
