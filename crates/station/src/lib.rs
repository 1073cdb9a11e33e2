//! A library for gathering the metadata of a published software package and rendering it into
//! a [Software Citation Station](https://github.com/zonca/software_citation_station) entry.
//!
//! The pipeline runs once per package: the PyPI JSON API supplies the package metadata, GitHub
//! is consulted for a `CITATION*` file, and any DOI found in the metadata is resolved to BibTeX
//! (including every version of a Zenodo concept DOI). Anything that cannot be resolved is
//! rendered as the [`citation::PLACEHOLDER`] marker.
//!
//! # Example
//! ```rust,no_run
//! use station::{config::Config, Station};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let station = Station::new(Config::default())?;
//!   let record = station.generate("healpy").await?;
//!   print!("{}", record.render()?);
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod bibtex;
pub mod citation;
pub mod clients;
pub mod config;
pub mod errors;
pub mod extract;
pub mod format;
pub mod output;
pub mod station;

use citation::CitationRecord;
use clients::{
  doi::DOIClient,
  github::{GitHubClient, RepoId},
  pypi::{PackageInfo, PypiClient},
  zenodo::ZenodoClient,
};
use config::Config;
use errors::StationError;
pub use station::Station;
