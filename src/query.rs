//! Search query construction.
//!
//! Tag titles are noisy: `Song (feat. X)`, `Song [Bonus Track]`,
//! `Song ft. X`. Everything from the first such qualifier onwards only hurts
//! the keyword search, so it is cut off.

use once_cell::sync::Lazy;
use regex::Regex;

/// An opening parenthesis starts a qualifier, as does a bare featuring or
/// production credit written as a whole word.
static QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(|\b(?:ft|feat|featuring|prod)\b\.?\s").expect("qualifier pattern is valid")
});

/// Build the keyword query for a track.
///
/// The query is `"{artist} {title}"` lower-cased, with square brackets read as
/// parentheses and anything from the first qualifier on dropped. A string
/// without qualifiers is returned whole.
pub fn normalize_query(artist: &str, title: &str) -> String {
    let query = format!("{artist} {title}")
        .to_lowercase()
        .replace('[', "(")
        .replace(']', ")");

    match QUALIFIER.find(&query) {
        Some(m) => {
            let head = query[..m.start()].trim();
            if head.is_empty() {
                query.trim().to_string()
            } else {
                head.to_string()
            }
        }
        None => query.trim().to_string(),
    }
}
