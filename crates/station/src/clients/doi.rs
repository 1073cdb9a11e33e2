//! Client implementation for resolving Digital Object Identifiers to BibTeX.
//!
//! DOI registration agencies (Crossref, DataCite, ...) all support content negotiation on
//! `https://doi.org/<doi>`: asking for `application/x-bibtex` redirects to the agency, which
//! answers with a ready-made BibTeX entry.
//!
//! # Examples
//!
//! ```no_run
//! use station::{
//!   clients::{http_client, DOIClient},
//!   config::{Config, DOI_URL},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DOIClient::new(http_client(&Config::default())?, DOI_URL);
//! if let Some(entry) = client.fetch_bibtex("10.5281/zenodo.2605425").await? {
//!   println!("{entry}");
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::{header::ACCEPT, StatusCode};

use super::*;

/// Media type requested from the resolver.
const BIBTEX_MEDIA_TYPE: &str = "application/x-bibtex; charset=utf-8";

/// Client resolving DOIs to BibTeX through content negotiation.
pub struct DOIClient {
  /// Internal web client used to connect to the resolver.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
}

impl DOIClient {
  /// Creates a new DOI client talking to `base_url` (e.g. [`config::DOI_URL`]).
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self { client, base_url: base_url.to_string() }
  }

  /// Fetches the BibTeX entry registered for `doi`.
  ///
  /// # Arguments
  ///
  /// * `doi` - A bare DOI such as `10.5281/zenodo.2605425`
  ///
  /// # Returns
  ///
  /// - `Ok(Some(entry))` with the trimmed BibTeX text
  /// - `Ok(None)` if the resolver does not know the DOI or returns an empty body
  ///
  /// # Errors
  ///
  /// Returns an error if the request fails or the resolver answers with an unexpected status.
  pub async fn fetch_bibtex(&self, doi: &str) -> Result<Option<String>, StationError> {
    let url = endpoint(&self.base_url, doi.split('/'))?;
    debug!("Fetching BibTeX via: {url}");

    let response = self.client.get(url).header(ACCEPT, BIBTEX_MEDIA_TYPE).send().await?;
    let status = response.status();
    debug!("DOI resolver response status: {status}");

    if status == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !status.is_success() {
      return Err(StationError::ApiError(format!("DOI resolver returned {status} for {doi}")));
    }

    let text = response.text().await?;
    trace!("BibTeX for {doi}: {text}");

    let entry = text.trim();
    Ok((!entry.is_empty()).then(|| entry.to_string()))
  }
}
