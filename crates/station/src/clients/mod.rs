//! Client implementations for the external services consulted while building a citation.
//!
//! Each submodule wraps exactly one service and exposes narrow fallible operations:
//! - [`pypi`] - Package metadata from the PyPI JSON API
//! - [`github`] - Default branch and root listing of a GitHub repository
//! - [`doi`] - BibTeX through DOI content negotiation
//! - [`zenodo`] - Version records of a Zenodo concept DOI
//!
//! All clients share one [`reqwest::Client`] built by [`http_client`] and carry their own base
//! URL, so a test can swap any service for a local fake.
//!
//! # Examples
//!
//! ```no_run
//! use station::{
//!   clients::{http_client, DOIClient, PypiClient},
//!   config::Config,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let http = http_client(&config)?;
//!
//! let info = PypiClient::new(http.clone(), &config.pypi_url).fetch_package("healpy").await?;
//! let bibtex = DOIClient::new(http, &config.doi_url).fetch_bibtex("10.5281/zenodo.2605425").await?;
//! # Ok(())
//! # }
//! ```

use url::Url;

pub mod doi;
pub mod github;
pub mod pypi;
pub mod zenodo;

pub use doi::DOIClient;
pub use github::GitHubClient;
pub use pypi::PypiClient;
pub use zenodo::ZenodoClient;

use super::*;

/// Builds the HTTP client shared by every service client.
///
/// Sets the configured `User-Agent`. No credentials are attached here: the GitHub token is
/// only ever sent by [`GitHubClient`].
///
/// # Errors
///
/// Returns an error if the TLS backend fails to initialize.
pub fn http_client(config: &Config) -> Result<reqwest::Client, StationError> {
  Ok(reqwest::Client::builder().user_agent(&config.user_agent).build()?)
}

/// Appends path segments to a base URL, percent-encoding each one.
///
/// An empty final segment yields a trailing slash.
fn endpoint<'a>(
  base: &str,
  segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, StationError> {
  let mut url = Url::parse(base)?;
  url
    .path_segments_mut()
    .map_err(|_| StationError::InvalidEndpoint(base.to_string()))?
    .pop_if_empty()
    .extend(segments);
  Ok(url)
}
