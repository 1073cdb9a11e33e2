//! Pure extraction of citation fields from registry metadata.
//!
//! Nothing in here touches the network: every function maps metadata or text to an optional
//! value, so absence is always explicit and the caller decides on the placeholder.
//!
//! # Examples
//!
//! ```
//! use station::extract;
//!
//! let text = "[![DOI](https://zenodo.org/badge/DOI/10.5281/zenodo.2605425.svg)]\
//!             (https://doi.org/10.5281/zenodo.2605425)";
//! assert_eq!(extract::extract_dois(text), vec!["10.5281/zenodo.2605425"]);
//!
//! assert_eq!(extract::simplify_dependency("numpy[extra]>=1.19; python_version>'3.8'"), "numpy");
//! ```

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

lazy_static! {
  /// A DOI-shaped substring: `10.`, a registrant code, `/`, and a suffix.
  static ref DOI: Regex = Regex::new(r"10\.\d{4,9}/[-._;()/:A-Za-z0-9]+").unwrap();

  /// A DOI minted by Zenodo.
  static ref ZENODO_DOI: Regex = Regex::new(r"(?i)^10\.5281/zenodo\.\d+$").unwrap();

  /// Start of a PEP 508 version specifier or environment marker.
  static ref REQUIREMENT_BREAK: Regex = Regex::new(r"[<>=!~() ]").unwrap();

  /// A requirement that only applies to an optional extra.
  static ref EXTRA_MARKER: Regex = Regex::new(r"extra\s*==").unwrap();
}

/// Project link labels that name the homepage, in order of preference.
const HOMEPAGE_KEYS: [&str; 5] = ["Homepage", "homepage", "Home", "home", "Source"];

/// Badge image extensions that cling to DOIs in badge URLs.
const IMAGE_SUFFIXES: [&str; 5] = [".svg", ".png", ".jpg", ".jpeg", ".gif"];

/// Registrant prefix of every Zenodo DOI.
const ZENODO_PREFIX: &str = "10.5281/zenodo";

/// Width of a description shortened from the long-form text.
const DESCRIPTION_WIDTH: usize = 240;

/// Finds the source repository among the package's declared project links.
///
/// Candidates are the `project_urls` values in declaration order, then `home_page`, then
/// `project_url`; the first one that names a GitHub repository wins.
pub fn find_repository(info: &PackageInfo) -> Option<RepoId> {
  info
    .project_urls()
    .map(|(_, url)| url)
    .chain(info.home_page.as_deref())
    .chain(info.project_url.as_deref())
    .find_map(RepoId::from_url)
}

/// Finds every DOI in `text`, de-duplicated, in order of first appearance.
///
/// Trailing punctuation (`.`, `,`, `)`, `/`) and badge image extensions such as `.svg` are removed
/// from each match.
pub fn extract_dois(text: &str) -> Vec<String> {
  let mut dois: Vec<String> = Vec::new();
  for candidate in DOI.find_iter(text) {
    let doi = clean_doi(candidate.as_str());
    if !doi.is_empty() && !dois.iter().any(|known| known == doi) {
      dois.push(doi.to_string());
    }
  }
  dois
}

/// Strips what a DOI match drags along from its surrounding URL or prose.
fn clean_doi(mut doi: &str) -> &str {
  loop {
    let trimmed = doi.trim_end_matches(['.', ',', ')', '/']);
    let trimmed = IMAGE_SUFFIXES
      .iter()
      .find_map(|suffix| {
        let split = trimmed.len().checked_sub(suffix.len())?;
        let tail = trimmed.get(split..)?;
        tail.eq_ignore_ascii_case(suffix).then(|| &trimmed[..split])
      })
      .unwrap_or(trimmed);
    if trimmed == doi {
      return doi;
    }
    doi = trimmed;
  }
}

/// Scans the summary, the long description and the project links for DOIs.
pub fn scan_dois(info: &PackageInfo) -> Vec<String> {
  let text = [info.summary.as_deref(), info.description.as_deref()]
    .into_iter()
    .flatten()
    .chain(info.project_urls().map(|(_, url)| url))
    .collect::<Vec<&str>>()
    .join(" ");
  extract_dois(&text)
}

/// The first DOI minted by Zenodo.
pub fn zenodo_doi(dois: &[String]) -> Option<&str> {
  dois.iter().map(String::as_str).find(|doi| doi.to_lowercase().contains(ZENODO_PREFIX))
}

/// The DOI to resolve to BibTeX: the Zenodo DOI if there is one, otherwise the first found.
pub fn primary_doi(dois: &[String]) -> Option<&str> {
  zenodo_doi(dois).or_else(|| dois.first().map(String::as_str))
}

/// Checks if `doi` has the shape of a Zenodo record DOI (`10.5281/zenodo.<number>`), the only
/// kind that can be a concept DOI.
pub fn is_zenodo_doi(doi: &str) -> bool { ZENODO_DOI.is_match(doi) }

/// Derives the implementation language from trove classifiers.
///
/// Python wins whenever any `Programming Language :: Python` classifier is present; otherwise
/// the last segment of the first `Programming Language ::` classifier is used.
pub fn extract_language(classifiers: &[String]) -> Option<String> {
  if classifiers.iter().any(|c| c.starts_with("Programming Language :: Python")) {
    return Some("Python".to_string());
  }
  classifiers
    .iter()
    .find(|c| c.starts_with("Programming Language ::"))
    .and_then(|c| last_segment(c))
}

/// Derives a category from the first `Topic ::` classifier, falling back to the first
/// `Intended Audience ::` classifier.
pub fn extract_category(classifiers: &[String]) -> Option<String> {
  ["Topic ::", "Intended Audience ::"].iter().find_map(|prefix| {
    classifiers.iter().find(|c| c.starts_with(prefix)).and_then(|c| last_segment(c))
  })
}

/// Last `::`-separated segment of a classifier, if not blank.
fn last_segment(classifier: &str) -> Option<String> {
  classifier
    .rsplit("::")
    .next()
    .map(str::trim)
    .filter(|segment| !segment.is_empty())
    .map(str::to_string)
}

/// Splits the registry keyword string into keywords.
///
/// Commas, semicolons, pipes and line breaks all separate keywords; blanks are dropped.
pub fn normalize_keywords(raw: Option<&str>) -> Vec<String> {
  raw
    .unwrap_or_default()
    .replace([';', '|', '\n'], ",")
    .split(',')
    .map(str::trim)
    .filter(|keyword| !keyword.is_empty())
    .map(str::to_string)
    .collect()
}

/// Reduces a PEP 508 requirement string to the bare distribution name.
pub fn simplify_dependency(requirement: &str) -> &str {
  let requirement = requirement.split(';').next().unwrap_or_default().trim();
  let requirement = requirement.split('[').next().unwrap_or_default().trim();
  REQUIREMENT_BREAK.split(requirement).next().unwrap_or_default().trim()
}

/// The runtime dependencies: requirements not tied to an extra, reduced to names, de-duplicated
/// and sorted.
pub fn gather_dependencies(requires_dist: &[String]) -> Vec<String> {
  requires_dist
    .iter()
    .filter(|requirement| !EXTRA_MARKER.is_match(requirement))
    .map(|requirement| simplify_dependency(requirement))
    .filter(|name| !name.is_empty())
    .collect::<BTreeSet<&str>>()
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// The package homepage: a homepage-like project link, else the legacy `home_page` field.
pub fn primary_homepage(info: &PackageInfo) -> Option<String> {
  HOMEPAGE_KEYS
    .iter()
    .find_map(|key| info.project_urls().find(|(label, _)| label == key).map(|(_, url)| url))
    .or(info.home_page.as_deref())
    .map(str::trim)
    .filter(|url| !url.is_empty())
    .map(str::to_string)
}

/// A one-line description: the summary if present, else the long description stripped of
/// markup and shortened to a single paragraph.
pub fn cleaned_summary(info: &PackageInfo) -> Option<String> {
  if let Some(summary) = info.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    return Some(summary.to_string());
  }

  let description = info.description.as_deref().unwrap_or_default();
  let description = format::strip_markup(&format::collapse_whitespace(description));
  let description = format::shorten(&description, DESCRIPTION_WIDTH, "...");
  (!description.is_empty()).then_some(description)
}
