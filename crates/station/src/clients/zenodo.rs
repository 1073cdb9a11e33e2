//! Client implementation for the Zenodo records API.
//!
//! Zenodo mints two kinds of DOI: one per uploaded version, and one "concept" DOI that stands
//! for all versions of the work. Searching the records API for `conceptdoi:"<doi>"` with
//! `all_versions=true` lists every version under a concept; for a version DOI the search
//! comes back empty.
//!
//! # Examples
//!
//! ```no_run
//! use station::{
//!   clients::{http_client, ZenodoClient},
//!   config::{Config, ZENODO_URL},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ZenodoClient::new(http_client(&Config::default())?, ZENODO_URL);
//! for doi in client.version_dois("10.5281/zenodo.2605425").await? {
//!   println!("{doi}");
//! }
//! # Ok(())
//! # }
//! ```

use super::*;

/// Upper bound on result pages followed for one concept.
const MAX_PAGES: usize = 50;

/// Search response from `/api/records`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
  /// The matching records
  hits:  Hits,
  /// Pagination links
  #[serde(default)]
  links: Links,
}

/// Container of the matching records.
#[derive(Debug, Deserialize)]
struct Hits {
  /// Records on this page
  #[serde(default)]
  hits: Vec<Record>,
}

/// Pagination links of a search page.
#[derive(Debug, Default, Deserialize)]
struct Links {
  /// Absolute URL of the next page, absent on the last one
  next: Option<String>,
}

/// One archived version.
#[derive(Debug, Deserialize)]
struct Record {
  /// The version-specific DOI
  doi:        Option<String>,
  /// The concept DOI this version belongs to
  conceptdoi: Option<String>,
}

/// Client for the Zenodo records API.
pub struct ZenodoClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The base URL to use for the client.
  base_url: String,
}

impl ZenodoClient {
  /// Creates a new Zenodo client talking to `base_url` (e.g. [`config::ZENODO_URL`]).
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self { client, base_url: base_url.to_string() }
  }

  /// Lists the version DOIs grouped under the concept DOI `doi`, in listing order.
  ///
  /// An empty list means `doi` is not a concept DOI (it names a single version, or Zenodo does
  /// not know it). The concept DOI itself is never part of the result, and duplicates are
  /// dropped.
  ///
  /// # Errors
  ///
  /// Returns an error if the first page cannot be fetched or parsed. A later page that fails
  /// ends the listing; the versions gathered so far are returned.
  pub async fn version_dois(&self, doi: &str) -> Result<Vec<String>, StationError> {
    let query = format!("conceptdoi:\"{doi}\"");
    let mut url = endpoint(&self.base_url, ["api", "records"])?;
    url
      .query_pairs_mut()
      .append_pair("q", &query)
      .append_pair("all_versions", "true");

    let mut versions: Vec<String> = Vec::new();
    let mut next = Some(url.to_string());
    let mut pages = 0;

    while let Some(page_url) = next.take() {
      pages += 1;
      if pages > MAX_PAGES {
        warn!("Stopping after {MAX_PAGES} pages of versions for {doi}");
        break;
      }

      let page = match self.fetch_page(&page_url).await {
        Ok(page) => page,
        Err(e) if pages == 1 => return Err(e),
        Err(e) => {
          warn!("Version listing for {doi} cut short at page {pages}: {e}");
          break;
        },
      };
      for record in page.hits.hits {
        let belongs = record.conceptdoi.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(doi));
        let Some(version) = record.doi.filter(|_| belongs) else { continue };
        if !version.eq_ignore_ascii_case(doi) && !versions.contains(&version) {
          versions.push(version);
        }
      }
      next = page.links.next;
    }

    debug!("Concept {doi} has {} versions", versions.len());
    Ok(versions)
  }

  /// Fetches and decodes one page of search results.
  async fn fetch_page(&self, url: &str) -> Result<SearchResponse, StationError> {
    debug!("Fetching from Zenodo via: {url}");
    let response = self.client.get(url).header("Accept", "application/json").send().await?;
    let status = response.status();
    debug!("Zenodo response status: {status}");

    if !status.is_success() {
      return Err(StationError::ApiError(format!("Zenodo returned {status} for {url}")));
    }

    let text = response.text().await?;
    trace!("Zenodo response: {text}");
    Ok(serde_json::from_str(&text)?)
  }
}
