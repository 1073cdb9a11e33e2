//! Client implementation for the PyPI JSON API.
//!
//! This module fetches `GET /pypi/<name>/json` and keeps the part of the response the citation
//! needs: the `info` mapping with descriptions, classifiers, keywords, dependency requirements
//! and project links. This is the only lookup whose failure aborts a run.
//!
//! # Examples
//!
//! ```no_run
//! use station::{
//!   clients::{http_client, PypiClient},
//!   config::{Config, PYPI_URL},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PypiClient::new(http_client(&Config::default())?, PYPI_URL);
//! let info = client.fetch_package("healpy").await?;
//!
//! println!("Summary: {:?}", info.summary);
//! for (label, url) in info.project_urls() {
//!   println!("{label}: {url}");
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::StatusCode;

use super::*;

/// Response structure from the PyPI JSON API.
#[derive(Debug, Deserialize)]
struct PypiResponse {
  /// Project-level metadata of the latest release
  info: PackageInfo,
}

/// Project metadata from the `info` mapping of a PyPI JSON response.
///
/// PyPI reports missing fields either as `null` or as an empty string, so every text field is
/// optional and callers should treat blank strings as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageInfo {
  /// Canonical project name
  #[serde(default)]
  pub name:          String,
  /// One-line summary
  pub summary:       Option<String>,
  /// Long description (usually the README, often carrying badge links)
  pub description:   Option<String>,
  /// Free-form keyword string, comma or space separated
  pub keywords:      Option<String>,
  /// License string
  pub license:       Option<String>,
  /// Trove classifiers
  #[serde(default)]
  pub classifiers:   Vec<String>,
  /// PEP 508 requirement strings of the latest release
  pub requires_dist: Option<Vec<String>>,
  /// Labelled project links, in the order the package declared them
  pub project_urls:  Option<serde_json::Map<String, serde_json::Value>>,
  /// Legacy homepage field
  pub home_page:     Option<String>,
  /// URL of the project page on PyPI
  pub project_url:   Option<String>,
}

impl PackageInfo {
  /// Iterates the declared project links as `(label, url)` pairs, in declaration order.
  ///
  /// Entries whose value is not a string are skipped.
  pub fn project_urls(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
    self
      .project_urls
      .iter()
      .flat_map(|urls| urls.iter())
      .filter_map(|(label, url)| url.as_str().map(|url| (label.as_str(), url)))
  }
}

/// Client for fetching package metadata from a PyPI-compatible JSON API.
pub struct PypiClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
}

impl PypiClient {
  /// Creates a new PyPI client talking to `base_url` (e.g. [`config::PYPI_URL`]).
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self { client, base_url: base_url.to_string() }
  }

  /// Fetches the project metadata of `package`.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The package does not exist ([`StationError::PackageNotFound`])
  /// - The network request fails
  /// - PyPI answers with any other unsuccessful status
  /// - The response is not the expected JSON
  pub async fn fetch_package(&self, package: &str) -> Result<PackageInfo, StationError> {
    let url = endpoint(&self.base_url, ["pypi", package, "json"])?;
    debug!("Fetching from PyPI via: {url}");

    let response = self.client.get(url).send().await?;
    let status = response.status();
    debug!("PyPI response status: {status}");

    if status == StatusCode::NOT_FOUND {
      return Err(StationError::PackageNotFound(package.to_string()));
    }
    if !status.is_success() {
      return Err(StationError::ApiError(format!("PyPI returned {status} for '{package}'")));
    }

    let text = response.text().await?;
    trace!("PyPI response: {text}");

    let response: PypiResponse = serde_json::from_str(&text)?;
    Ok(response.info)
  }
}
