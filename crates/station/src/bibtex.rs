//! Normalization of BibTeX entries returned by DOI resolvers.
//!
//! Resolvers return entries in whatever layout they like, often a single line. The citation
//! document shows each entry as a header line, one field per indented line, and a closing brace.
//! Entries that cannot be parsed are passed through verbatim.
//!
//! # Examples
//!
//! ```
//! use station::bibtex::format_entry;
//!
//! let entry = "@misc{healpy, title={healpy, HEALPix in Python}, year=2019}";
//! assert_eq!(
//!   format_entry(entry),
//!   "@misc{healpy,\n  title = {healpy, HEALPix in Python},\n  year = 2019\n}"
//! );
//! ```

/// Indentation of each field line.
const INDENT: &str = "  ";

/// Pretty-prints a single BibTeX entry.
///
/// The entry type and key are kept, each field is written as `name = value` on its own line, and
/// anything after the entry's closing brace is dropped. Text that is not a well-formed
/// `@type{key, fields...}` entry is returned trimmed but otherwise unchanged.
pub fn format_entry(entry: &str) -> String {
  let text = entry.trim();
  parse_entry(text)
    .map(|(entry_type, key, fields)| {
      let mut lines = vec![format!("@{entry_type}{{{key},")];
      let count = fields.len();
      for (i, field) in fields.into_iter().enumerate() {
        let field = match field.split_once('=') {
          Some((name, value)) => format!("{} = {}", name.trim(), value.trim()),
          None => field,
        };
        let suffix = if i + 1 < count { "," } else { "" };
        lines.push(format!("{INDENT}{field}{suffix}"));
      }
      lines.push("}".to_string());
      lines.join("\n")
    })
    .unwrap_or_else(|| text.to_string())
}

/// Splits `@type{key, fields...}` into its type, key and fields.
fn parse_entry(text: &str) -> Option<(&str, &str, Vec<String>)> {
  let rest = text.strip_prefix('@')?;
  let (entry_type, remainder) = rest.split_once('{')?;

  let mut depth = 1usize;
  let mut end = None;
  for (i, c) in remainder.char_indices() {
    match c {
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          end = Some(i);
          break;
        }
      },
      _ => {},
    }
  }

  let body = remainder[..end?].trim();
  let (key, fields) = body.split_once(',')?;
  let fields = split_fields(fields.trim());
  if fields.is_empty() {
    return None;
  }
  Some((entry_type.trim(), key.trim(), fields))
}

/// Splits the field list on commas outside braces and quotes, dropping empty fields.
fn split_fields(fields: &str) -> Vec<String> {
  let mut parts = Vec::new();
  let mut current = String::new();
  let mut depth = 0usize;
  let mut in_quotes = false;

  for c in fields.chars() {
    match c {
      '"' => in_quotes = !in_quotes,
      '{' => depth += 1,
      '}' => depth = depth.saturating_sub(1),
      _ => {},
    }

    if c == ',' && depth == 0 && !in_quotes {
      push_field(&mut parts, &current);
      current.clear();
    } else {
      current.push(c);
    }
  }
  push_field(&mut parts, &current);
  parts
}

/// Appends `field` trimmed, unless it is blank.
fn push_field(parts: &mut Vec<String>, field: &str) {
  let field = field.trim();
  if !field.is_empty() {
    parts.push(field.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_datacite_entry() {
    let entry = "@misc{https://doi.org/10.5281/zenodo.2605425, doi = {10.5281/ZENODO.2605425}, \
                 url = {https://zenodo.org/doi/10.5281/zenodo.2605425}, author = {Zonca, Andrea \
                 and Singer, Leo}, title = \"healpy: {Python}, wrapper\", year = {2019}, }";
    assert_eq!(
      format_entry(entry),
      "@misc{https://doi.org/10.5281/zenodo.2605425,\n  doi = {10.5281/ZENODO.2605425},\n  url = \
       {https://zenodo.org/doi/10.5281/zenodo.2605425},\n  author = {Zonca, Andrea and Singer, \
       Leo},\n  title = \"healpy: {Python}, wrapper\",\n  year = {2019}\n}"
    );
  }

  #[test]
  fn test_trailing_text_is_dropped() {
    assert_eq!(format_entry("  @article{k,year=2020} trailing"), "@article{k,\n  year = 2020\n}");
  }

  #[test]
  fn test_malformed_entries_pass_through() {
    assert_eq!(format_entry("  not bibtex  "), "not bibtex");
    assert_eq!(format_entry("@misc{unterminated, a = {b}"), "@misc{unterminated, a = {b}");
    assert_eq!(format_entry("@misc{nofields}"), "@misc{nofields}");
    assert_eq!(format_entry("@misc{key, }"), "@misc{key, }");
  }

  #[test]
  fn test_split_fields_respects_nesting() {
    assert_eq!(split_fields(r#"a = {x, {y, z}}, b = "p, q", c = 3,"#), vec![
      "a = {x, {y, z}}",
      r#"b = "p, q""#,
      "c = 3"
    ]);
  }
}
