//! Error types for the citestation CLI application.
//!
//! The errors are transparent, so the message of the underlying library or logging error is
//! what the user sees.

use thiserror::Error;

/// Errors that can end a citestation run.
///
/// # Examples
///
/// ```ignore
/// # fn example() -> Result<(), CitestationErrors> {
/// // Library errors convert with `?`
/// let station = station::Station::new(station::config::Config::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum CitestationErrors {
  /// Errors from the underlying station library
  #[error(transparent)]
  Station(#[from] station::errors::StationError),

  /// A global tracing subscriber was already installed
  #[error(transparent)]
  Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl CitestationErrors {
  /// Checks if the run failed because the package is unknown to the registry.
  pub fn is_not_found(&self) -> bool {
    matches!(self, CitestationErrors::Station(e) if e.is_not_found())
  }
}
