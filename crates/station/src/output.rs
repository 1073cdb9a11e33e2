//! Writing the rendered document to a file or to standard output.

use std::io::Write;

use super::*;

/// Writes `document` to `path`, or to standard output when no path is given.
///
/// # Errors
///
/// Returns [`StationError::Io`] if the file cannot be created or written, or standard output is
/// closed.
pub fn write_document(document: &str, path: Option<&Path>) -> Result<(), StationError> {
  match path {
    Some(path) => {
      debug!("Writing citation document to path: {path:?}");
      std::fs::write(path, document)?;
    },
    None => {
      let mut stdout = std::io::stdout().lock();
      stdout.write_all(document.as_bytes())?;
      stdout.flush()?;
    },
  }
  Ok(())
}
