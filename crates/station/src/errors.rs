//! Error types for the station library.
//!
//! Only a handful of failures are fatal to a run: the package cannot be found in the registry,
//! the registry cannot be reached, the configuration names an unusable endpoint, or the output
//! cannot be written. Every other lookup in the pipeline degrades to the placeholder, but the
//! clients still report those failures through [`StationError`] so the caller decides.
//!
//! # Examples
//!
//! ```no_run
//! use station::{config::Config, errors::StationError, Station};
//!
//! # async fn example() -> Result<(), StationError> {
//! let station = Station::new(Config::default())?;
//! match station.generate("no-such-package-here").await {
//!   Err(e) if e.is_not_found() => println!("Unknown package"),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(record) => println!("{}", record.render()?),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Errors that can occur while gathering and rendering citation metadata.
#[derive(Error, Debug)]
pub enum StationError {
  /// The package index answered, but has no package under this name.
  ///
  /// The string parameter is the package name as it was requested.
  #[error("Package '{0}' not found on PyPI")]
  PackageNotFound(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - TLS/SSL errors occur
  /// - The response body could not be read
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// An API returned an unexpected or unsuccessful response.
  ///
  /// The string parameter describes the endpoint and what went wrong.
  #[error("API error: {0}")]
  ApiError(String),

  /// A configured base URL could not be parsed.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A configured base URL parsed, but cannot carry a path (e.g. `mailto:` URLs).
  #[error("Endpoint cannot be used as a base URL: {0}")]
  InvalidEndpoint(String),

  /// JSON could not be decoded from an API response or encoded into the citation block.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// Writing the rendered document failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl StationError {
  /// Checks if this error means the requested package does not exist in the registry.
  ///
  /// The command-line front end uses this to tell a mistyped package name apart from an
  /// unreachable registry.
  pub fn is_not_found(&self) -> bool { matches!(self, StationError::PackageNotFound(_)) }
}
