//! Endpoint configuration for the external services the pipeline talks to.
//!
//! Every service is addressed through a base URL so that the whole pipeline can be pointed at
//! mirrors or at local fake servers. The defaults are the public services.
//!
//! # Examples
//!
//! ```
//! use station::config::Config;
//!
//! let config = Config { pypi_url: "http://localhost:8080".into(), ..Config::default() };
//! assert!(config.validate().is_ok());
//! ```

use super::*;

/// Public PyPI.
pub const PYPI_URL: &str = "https://pypi.org";
/// Public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";
/// DOI resolver supporting content negotiation.
pub const DOI_URL: &str = "https://doi.org";
/// Zenodo, the archive issuing `10.5281/zenodo.*` DOIs.
pub const ZENODO_URL: &str = "https://zenodo.org";
/// `User-Agent` sent with every request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!(
  "citestation/",
  env!("CARGO_PKG_VERSION"),
  " (+https://github.com/zonca/software_citation_station)"
);

/// Where and how to reach the external services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Base URL of the package index (`/pypi/<name>/json` is appended)
  pub pypi_url:       String,
  /// Base URL of the GitHub REST API
  pub github_api_url: String,
  /// Base URL of the DOI content-negotiation resolver
  pub doi_url:        String,
  /// Base URL of the Zenodo archive (`/api/records` is appended)
  pub zenodo_url:     String,
  /// Optional GitHub token, lifting the anonymous rate limit
  pub github_token:   Option<String>,
  /// `User-Agent` header for every request
  pub user_agent:     String,
}

impl Config {
  /// Checks that every configured base URL parses and can carry a path.
  ///
  /// # Errors
  ///
  /// Returns [`StationError::InvalidUrl`] or [`StationError::InvalidEndpoint`] for the first
  /// unusable endpoint.
  pub fn validate(&self) -> Result<(), StationError> {
    for endpoint in [&self.pypi_url, &self.github_api_url, &self.doi_url, &self.zenodo_url] {
      let url = url::Url::parse(endpoint)?;
      if url.cannot_be_a_base() {
        return Err(StationError::InvalidEndpoint(endpoint.clone()));
      }
    }
    Ok(())
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      pypi_url:       PYPI_URL.to_string(),
      github_api_url: GITHUB_API_URL.to_string(),
      doi_url:        DOI_URL.to_string(),
      zenodo_url:     ZENODO_URL.to_string(),
      github_token:   None,
      user_agent:     USER_AGENT.to_string(),
    }
  }
}
