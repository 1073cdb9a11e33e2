//! Text formatting utilities for turning long-form package descriptions into one-liners.
//!
//! Long descriptions on PyPI are usually the whole README, full of Markdown markup and line
//! breaks. These helpers collapse that into a single line and cut it down at a word boundary.
//!
//! # Examples
//!
//! ```
//! use station::format;
//!
//! let text = "A   *fast*\n\n library for `maps`";
//! assert_eq!(format::strip_markup(&format::collapse_whitespace(text)), "A fast library for maps");
//!
//! assert_eq!(format::shorten("Healpix tools package for Python", 20, "..."), "Healpix tools...");
//! ```

/// Characters removed from descriptions: Markdown emphasis, code and heading markers, and
/// angle brackets of inline HTML.
const MARKUP_CHARS: [char; 6] = ['`', '*', '_', '#', '<', '>'];

/// Replaces every run of whitespace (including line breaks) with a single space and trims both
/// ends.
///
/// ```
/// use station::format::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  No    Extra\n\tSpaces "), "No Extra Spaces");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Removes Markdown and HTML markup characters.
pub fn strip_markup(text: &str) -> String {
  text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}

/// Shortens `text` to at most `width` characters on word boundaries.
///
/// Whitespace is collapsed first. If the result fits it is returned unchanged; otherwise as many
/// leading words as fit together with `placeholder` are kept and `placeholder` is appended. If
/// not even the first word fits, only the placeholder is returned.
///
/// # Arguments
///
/// * `text` - The input text
/// * `width` - Maximum length in characters of the result
/// * `placeholder` - Marker appended when text was dropped, e.g. `"..."`
///
/// # Examples
///
/// ```
/// use station::format::shorten;
///
/// assert_eq!(shorten("Hello World", 50, "..."), "Hello World");
/// assert_eq!(shorten("This Is A Very Long Title Indeed", 20, "..."), "This Is A Very...");
/// assert_eq!(shorten("Supercalifragilistic", 10, "..."), "...");
/// ```
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
  let collapsed = collapse_whitespace(text);
  if collapsed.chars().count() <= width {
    return collapsed;
  }

  let budget = width.saturating_sub(placeholder.chars().count());
  let mut result = String::new();
  let mut length = 0;

  // Whole words only, leaving room for the placeholder
  for word in collapsed.split(' ') {
    let word_length = word.chars().count();
    let needed = if result.is_empty() { word_length } else { length + 1 + word_length };
    if needed > budget {
      break;
    }
    if !result.is_empty() {
      result.push(' ');
    }
    result.push_str(word);
    length = needed;
  }

  result.push_str(placeholder);
  result
}
