//! The citation pipeline.
//!
//! [`Station::generate`] runs every lookup strictly in sequence:
//!
//! 1. package metadata from PyPI (the only fatal step)
//! 2. the GitHub repository among the project links
//! 3. the repository's default branch and root listing, for a `CITATION*` file
//! 4. the DOIs embedded in the metadata
//! 5. BibTeX for the DOI, plus every version when it is a Zenodo concept DOI
//!
//! Steps 2 to 5 degrade: a failed or empty lookup leaves the placeholder (or no BibTeX entry)
//! and the run carries on.
//!
//! # Examples
//!
//! ```no_run
//! use station::{config::Config, output, Station};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let station = Station::new(Config::default())?;
//! let record = station.generate("healpy").await?;
//! output::write_document(&record.render()?, None)?;
//! # Ok(())
//! # }
//! ```

use crate::citation::CitationFields;

use super::*;

/// Prefix of the root files that count as citation instructions.
const CITATION_PREFIX: &str = "CITATION";

/// The service clients one run needs.
pub struct Station {
  /// Package index
  pypi:   PypiClient,
  /// Source host
  github: GitHubClient,
  /// DOI content-negotiation resolver
  doi:    DOIClient,
  /// Archive for concept DOIs
  zenodo: ZenodoClient,
}

impl Station {
  /// Builds a station talking to the services named in `config`, over one shared HTTP client.
  ///
  /// # Errors
  ///
  /// Returns an error if an endpoint is not a usable URL or the HTTP client cannot be built.
  pub fn new(config: Config) -> Result<Self, StationError> {
    config.validate()?;
    let http = clients::http_client(&config)?;
    let github =
      GitHubClient::new(http.clone(), &config.github_api_url).with_token(config.github_token);
    Ok(Self::from_clients(
      PypiClient::new(http.clone(), &config.pypi_url),
      github,
      DOIClient::new(http.clone(), &config.doi_url),
      ZenodoClient::new(http, &config.zenodo_url),
    ))
  }

  /// Builds a station from already constructed clients.
  pub fn from_clients(
    pypi: PypiClient,
    github: GitHubClient,
    doi: DOIClient,
    zenodo: ZenodoClient,
  ) -> Self {
    Self { pypi, github, doi, zenodo }
  }

  /// Gathers everything known about `package` into a citation record.
  ///
  /// # Errors
  ///
  /// Only the registry lookup is fatal: this returns [`StationError::PackageNotFound`] for an
  /// unknown package, or the error that kept PyPI from answering. Every later failure degrades
  /// to the placeholder.
  pub async fn generate(&self, package: &str) -> Result<CitationRecord, StationError> {
    info!("Fetching package metadata for {package}");
    let package_info = self.pypi.fetch_package(package).await?;
    let mut fields = CitationFields::from_package(&package_info);

    match extract::find_repository(&package_info) {
      Some(repo) => {
        info!("Found repository {repo}");
        fields.attribution_link = self.resolve_attribution(&repo).await;
      },
      None => debug!("No GitHub repository among the project links of {package}"),
    }

    let dois = extract::scan_dois(&package_info);
    debug!("DOIs found in metadata: {dois:?}");
    let bibtex_entries = match extract::primary_doi(&dois) {
      Some(doi) => self.collect_bibtex(doi).await,
      None => Vec::new(),
    };

    Ok(CitationRecord { name: package.to_string(), fields, bibtex_entries })
  }

  /// Resolves the attribution link of `repo`.
  ///
  /// Links to the first root entry (in listing order) whose name starts with `CITATION` on the
  /// default branch, and to the repository itself when there is none or GitHub cannot be
  /// reached.
  pub async fn resolve_attribution(&self, repo: &RepoId) -> String {
    let Some(branch) = available("Default branch", self.github.default_branch(repo).await) else {
      return repo.web_url();
    };
    let Some(entries) = available("Repository listing", self.github.root_listing(repo).await)
    else {
      return repo.web_url();
    };

    match entries.iter().find(|entry| entry.name.starts_with(CITATION_PREFIX)) {
      Some(entry) => {
        info!("Found citation file {} in {repo}", entry.name);
        repo.blob_url(&branch, &entry.name)
      },
      None => {
        debug!("No {CITATION_PREFIX} file in the root of {repo}");
        repo.web_url()
      },
    }
  }

  /// Collects BibTeX for `doi`: its own entry first, then one per version if it is a Zenodo
  /// concept DOI, in listing order.
  ///
  /// Each entry is fetched independently; a missing one is skipped.
  pub async fn collect_bibtex(&self, doi: &str) -> Vec<String> {
    let mut entries = Vec::new();
    if let Some(entry) = available("BibTeX", self.doi.fetch_bibtex(doi).await).flatten() {
      entries.push(entry);
    }

    if !extract::is_zenodo_doi(doi) {
      return entries;
    }

    let versions = available("Zenodo versions", self.zenodo.version_dois(doi).await)
      .unwrap_or_default();
    for version in versions {
      match available("BibTeX", self.doi.fetch_bibtex(&version).await).flatten() {
        Some(entry) => entries.push(entry),
        None => debug!("Skipping version {version} without BibTeX"),
      }
    }

    info!("Collected {} BibTeX entries for {doi}", entries.len());
    entries
  }
}

/// Turns a failed lookup into an explicit "unavailable", logging why.
fn available<T>(what: &str, result: Result<T, StationError>) -> Option<T> {
  match result {
    Ok(value) => Some(value),
    Err(e) => {
      warn!("{what} unavailable: {e}");
      None
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn station_for(server: &mockito::ServerGuard) -> Station {
    let http = reqwest::Client::new();
    Station::from_clients(
      PypiClient::new(http.clone(), &server.url()),
      GitHubClient::new(http.clone(), &server.url()),
      DOIClient::new(http.clone(), &server.url()),
      ZenodoClient::new(http, &server.url()),
    )
  }

  fn healpy() -> RepoId { RepoId { owner: "healpy".into(), name: "healpy".into() } }

  #[traced_test]
  #[tokio::test]
  async fn test_attribution_prefers_first_citation_file() {
    let mut server = mockito::Server::new_async().await;
    let _repo = server
      .mock("GET", "/repos/healpy/healpy")
      .with_body(r#"{"default_branch": "develop"}"#)
      .create_async()
      .await;
    let _contents = server
      .mock("GET", "/repos/healpy/healpy/contents/")
      .with_body(
        r#"[{"name": "README.rst"}, {"name": "CITATION.cff"}, {"name": "CITATION.bib"},
            {"name": "citation.txt"}]"#,
      )
      .create_async()
      .await;

    let link = station_for(&server).resolve_attribution(&healpy()).await;
    assert_eq!(link, "https://github.com/healpy/healpy/blob/develop/CITATION.cff");
  }

  #[tokio::test]
  async fn test_attribution_falls_back_to_repository() {
    let mut server = mockito::Server::new_async().await;
    let _repo = server
      .mock("GET", "/repos/healpy/healpy")
      .with_body(r#"{"default_branch": "main"}"#)
      .create_async()
      .await;
    let _contents = server
      .mock("GET", "/repos/healpy/healpy/contents/")
      .with_body(r#"[{"name": "citation.txt"}, {"name": "setup.py"}]"#)
      .create_async()
      .await;

    let link = station_for(&server).resolve_attribution(&healpy()).await;
    assert_eq!(link, "https://github.com/healpy/healpy");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_attribution_survives_api_failure() {
    let mut server = mockito::Server::new_async().await;
    let _repo = server.mock("GET", "/repos/healpy/healpy").with_status(403).create_async().await;

    let link = station_for(&server).resolve_attribution(&healpy()).await;
    assert_eq!(link, "https://github.com/healpy/healpy");
    assert!(logs_contain("Default branch unavailable"));
  }

  #[tokio::test]
  async fn test_collect_bibtex_for_plain_doi() {
    let mut server = mockito::Server::new_async().await;
    let _doi = server
      .mock("GET", "/10.1093/mnras/stz123")
      .with_body("@article{mnras, year = 2019}")
      .create_async()
      .await;

    let entries = station_for(&server).collect_bibtex("10.1093/mnras/stz123").await;
    assert_eq!(entries, vec!["@article{mnras, year = 2019}"]);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_collect_bibtex_skips_failed_versions() {
    let mut server = mockito::Server::new_async().await;
    let concept = "10.5281/zenodo.100";
    let _concept = server
      .mock("GET", "/10.5281/zenodo.100")
      .with_body("@misc{concept, year = 2019}")
      .create_async()
      .await;
    let _versions = server
      .mock("GET", "/api/records")
      .match_query(mockito::Matcher::Any)
      .with_body(format!(
        r#"{{"hits": {{"hits": [
              {{"doi": "10.5281/zenodo.101", "conceptdoi": "{concept}"}},
              {{"doi": "10.5281/zenodo.102", "conceptdoi": "{concept}"}},
              {{"doi": "10.5281/zenodo.103", "conceptdoi": "{concept}"}}
            ]}}}}"#
      ))
      .create_async()
      .await;
    let _v1 = server
      .mock("GET", "/10.5281/zenodo.101")
      .with_body("@misc{v1, year = 2019}")
      .create_async()
      .await;
    let _v2 = server.mock("GET", "/10.5281/zenodo.102").with_status(500).create_async().await;
    let _v3 = server
      .mock("GET", "/10.5281/zenodo.103")
      .with_body("@misc{v3, year = 2021}")
      .create_async()
      .await;

    let entries = station_for(&server).collect_bibtex(concept).await;
    assert_eq!(entries, vec![
      "@misc{concept, year = 2019}",
      "@misc{v1, year = 2019}",
      "@misc{v3, year = 2021}"
    ]);
  }

  #[tokio::test]
  async fn test_collect_bibtex_survives_zenodo_failure() {
    let mut server = mockito::Server::new_async().await;
    let _concept = server
      .mock("GET", "/10.5281/zenodo.100")
      .with_body("@misc{concept, year = 2019}")
      .create_async()
      .await;
    let _versions = server
      .mock("GET", "/api/records")
      .match_query(mockito::Matcher::Any)
      .with_status(502)
      .create_async()
      .await;

    let entries = station_for(&server).collect_bibtex("10.5281/zenodo.100").await;
    assert_eq!(entries, vec!["@misc{concept, year = 2019}"]);
  }
}
