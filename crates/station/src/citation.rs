//! The citation record and its Markdown rendering.
//!
//! A [`CitationRecord`] is assembled once per run. Every field that could not be resolved holds
//! the [`PLACEHOLDER`] marker instead of being left out, so the rendered document always has
//! the same shape and the gaps are easy to find and fill by hand.
//!
//! The document has two sections:
//!
//! ````markdown
//! # Citation information
//! ```
//! "healpy": {
//!     "tags": [
//!         "FIXME"
//!     ],
//!     ...
//! }
//! ```
//!
//! # BibTeX
//! ```
//! @misc{...}
//! ```
//! ````

use serde_json::ser::{PrettyFormatter, Serializer};

use super::*;

/// Marker for any value that could not be resolved.
pub const PLACEHOLDER: &str = "FIXME";

/// Indentation of the JSON citation block.
const JSON_INDENT: &[u8] = b"    ";

/// The fields of a citation entry, in the order they are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationFields {
  /// Free-form tags (always left for the submitter)
  pub tags:             Vec<String>,
  /// Logo URL (always left for the submitter)
  pub logo:             String,
  /// Implementation language
  pub language:         String,
  /// Subject category
  pub category:         String,
  /// Keywords
  pub keywords:         Vec<String>,
  /// One-line description
  pub description:      String,
  /// Project homepage
  pub link:             String,
  /// Canonical citation source: a `CITATION*` file, else the repository
  pub attribution_link: String,
  /// Zenodo DOI, omitted from the document when none was found
  #[serde(skip_serializing_if = "Option::is_none")]
  pub zenodo_doi:       Option<String>,
  /// Custom citation text (always left for the submitter)
  pub custom_citation:  String,
  /// Runtime dependencies
  pub dependencies:     Vec<String>,
}

/// Everything gathered about one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
  /// Package name, as requested
  pub name:           String,
  /// The citation entry proper
  pub fields:         CitationFields,
  /// BibTeX entries, concept entry first
  pub bibtex_entries: Vec<String>,
}

/// Returns the value, or the placeholder if there is none.
pub fn or_placeholder(value: Option<String>) -> String {
  value.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Returns the list, or a list holding only the placeholder if it is empty.
pub fn list_or_placeholder(values: Vec<String>) -> Vec<String> {
  if values.is_empty() {
    vec![PLACEHOLDER.to_string()]
  } else {
    values
  }
}

impl CitationFields {
  /// Fields with every value set to the placeholder.
  pub fn placeholders() -> Self {
    Self {
      tags:             list_or_placeholder(Vec::new()),
      logo:             PLACEHOLDER.to_string(),
      language:         PLACEHOLDER.to_string(),
      category:         PLACEHOLDER.to_string(),
      keywords:         list_or_placeholder(Vec::new()),
      description:      PLACEHOLDER.to_string(),
      link:             PLACEHOLDER.to_string(),
      attribution_link: PLACEHOLDER.to_string(),
      zenodo_doi:       None,
      custom_citation:  PLACEHOLDER.to_string(),
      dependencies:     list_or_placeholder(Vec::new()),
    }
  }

  /// Fills every field derivable from registry metadata alone.
  ///
  /// `attribution_link` stays the placeholder; it needs the source host.
  pub fn from_package(info: &PackageInfo) -> Self {
    let dois = extract::scan_dois(info);
    Self {
      language: or_placeholder(extract::extract_language(&info.classifiers)),
      category: or_placeholder(extract::extract_category(&info.classifiers)),
      keywords: list_or_placeholder(extract::normalize_keywords(info.keywords.as_deref())),
      description: or_placeholder(extract::cleaned_summary(info)),
      link: or_placeholder(extract::primary_homepage(info)),
      zenodo_doi: extract::zenodo_doi(&dois).map(str::to_string),
      dependencies: list_or_placeholder(extract::gather_dependencies(
        info.requires_dist.as_deref().unwrap_or_default(),
      )),
      ..Self::placeholders()
    }
  }
}

impl CitationRecord {
  /// Renders the two-section Markdown document, ending with a newline.
  ///
  /// # Errors
  ///
  /// Returns an error if the fields cannot be encoded as JSON.
  ///
  /// # Examples
  ///
  /// ```
  /// use station::citation::{CitationFields, CitationRecord};
  ///
  /// let record = CitationRecord {
  ///   name:           "healpy".into(),
  ///   fields:         CitationFields::placeholders(),
  ///   bibtex_entries: Vec::new(),
  /// };
  /// let document = record.render().unwrap();
  /// assert!(document.starts_with("# Citation information\n```\n\"healpy\": {\n"));
  /// assert!(document.ends_with("# BibTeX\n```\n```\n"));
  /// ```
  pub fn render(&self) -> Result<String, StationError> {
    let mut buffer = Vec::new();
    let mut serializer =
      Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    self.fields.serialize(&mut serializer)?;
    let json = String::from_utf8_lossy(&buffer);

    let mut lines = vec!["# Citation information".to_string(), "```".to_string()];
    lines.push(format!("{}: {json}", serde_json::to_string(&self.name)?));
    lines.push("```".to_string());
    lines.push(String::new());
    lines.push("# BibTeX".to_string());
    lines.push("```".to_string());

    let entries = self
      .bibtex_entries
      .iter()
      .filter(|entry| !entry.trim().is_empty())
      .map(|entry| bibtex::format_entry(entry))
      .collect::<Vec<_>>();
    if !entries.is_empty() {
      lines.push(entries.join("\n\n"));
    }

    lines.push("```".to_string());
    Ok(lines.join("\n") + "\n")
  }
}
