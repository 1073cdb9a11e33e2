//! Integration tests for the citestation CLI.
//!
//! Every external service is a local mockito server wired in through the environment.

use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use tempfile::tempdir;

// Helper function to create a command pointed at a fake server
fn citestation(server: &ServerGuard) -> Command {
  let mut cmd = Command::cargo_bin("citestation").unwrap();
  cmd
    .env("CITESTATION_PYPI_URL", server.url())
    .env("CITESTATION_GITHUB_API_URL", server.url())
    .env("CITESTATION_DOI_URL", server.url())
    .env("CITESTATION_ZENODO_URL", server.url())
    .env_remove("GITHUB_TOKEN")
    .env_remove("RUST_LOG");
  cmd
}

// Helper to serve a PyPI metadata document
fn mock_package(server: &mut ServerGuard, package: &str, info: &str) -> mockito::Mock {
  server
    .mock("GET", format!("/pypi/{package}/json").as_str())
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(format!(r#"{{"info": {info}, "releases": {{}}}}"#))
    .create()
}

#[test]
fn test_unknown_package_fails() {
  let mut server = Server::new();
  let _m = server.mock("GET", "/pypi/not-a-package/json").with_status(404).create();

  citestation(&server)
    .arg("not-a-package")
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("not found on PyPI"));
}

#[test]
fn test_missing_package_argument() {
  let server = Server::new();
  citestation(&server).assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_placeholder_document_on_stdout() {
  let mut server = Server::new();
  let _pypi = mock_package(&mut server, "bare", r#"{"name": "bare", "summary": ""}"#);
  let github = server.mock("GET", Matcher::Regex("^/repos/".into())).expect(0).create();

  citestation(&server)
    .arg("bare")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("# Citation information\n```\n\"bare\": {\n"))
    .stdout(predicate::str::contains("\"attribution_link\": \"FIXME\""))
    .stdout(predicate::str::contains("zenodo_doi").not())
    .stdout(predicate::str::ends_with("# BibTeX\n```\n```\n"));

  github.assert();
}

#[test]
fn test_document_written_to_file() {
  let mut server = Server::new();
  let _pypi = mock_package(
    &mut server,
    "healpy",
    r#"{
      "name": "healpy",
      "summary": "Healpix tools package for Python",
      "description": "[![DOI](https://zenodo.org/badge/DOI/10.5281/zenodo.2605425.svg)](https://doi.org/10.5281/zenodo.2605425)",
      "classifiers": ["Programming Language :: Python :: 3"],
      "requires_dist": ["numpy>=1.19", "astropy"],
      "project_urls": {"Source": "https://github.com/healpy/healpy"}
    }"#,
  );
  let _repo = server
    .mock("GET", "/repos/healpy/healpy")
    .with_body(r#"{"default_branch": "main"}"#)
    .create();
  let _contents = server
    .mock("GET", "/repos/healpy/healpy/contents/")
    .with_body(r#"[{"name": "CITATION.cff"}]"#)
    .create();
  let _concept = server
    .mock("GET", "/10.5281/zenodo.2605425")
    .with_body("@misc{concept, year = {2019}}")
    .create();
  let _versions = server
    .mock("GET", "/api/records")
    .match_query(Matcher::Any)
    .with_body(
      r#"{"hits": {"hits": [{"doi": "10.5281/zenodo.11", "conceptdoi": "10.5281/zenodo.2605425"}]}}"#,
    )
    .create();
  let _version = server
    .mock("GET", "/10.5281/zenodo.11")
    .with_body("@misc{version, year = {2024}}")
    .create();

  let dir = tempdir().unwrap();
  let path = dir.path().join("healpy_citation.md");

  citestation(&server)
    .arg("healpy")
    .arg("-o")
    .arg(&path)
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Wrote citation"));

  let document = std::fs::read_to_string(&path).unwrap();
  assert!(document.contains("\"language\": \"Python\""));
  assert!(document.contains(
    "\"attribution_link\": \"https://github.com/healpy/healpy/blob/main/CITATION.cff\""
  ));
  assert!(document.contains("\"zenodo_doi\": \"10.5281/zenodo.2605425\""));
  assert!(
    document.contains("@misc{concept,\n  year = {2019}\n}\n\n@misc{version,\n  year = {2024}\n}")
  );

  dir.close().unwrap();
}
