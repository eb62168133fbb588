//! Matching producer credits against the producers the user asked for.

use std::collections::HashSet;

use thiserror::Error;

use crate::genius::ProducerCredit;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no producer names in {0:?}; pass them pipe-delimited, e.g. -p \"Dr. Dre|Kanye West\"")]
pub struct EmptyProducerList(pub String);

/// Producers to look for, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerQuery {
    names: Vec<String>,
}

impl ProducerQuery {
    /// Split a `|`-delimited list. Blank entries are ignored.
    pub fn parse(raw: &str) -> Result<Self, EmptyProducerList> {
        let names: Vec<String> = raw
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            return Err(EmptyProducerList(raw.to_string()));
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The first requested producer, in query order, credited on the song.
    ///
    /// Names are compared after [`normalize_name`]; there is no substring or
    /// edit-distance matching.
    pub fn find_match(&self, credits: &[ProducerCredit]) -> Option<&str> {
        let credited: HashSet<String> = credits.iter().map(|c| normalize_name(&c.name)).collect();

        self.names
            .iter()
            .find(|name| credited.contains(&normalize_name(name)))
            .map(String::as_str)
    }
}

/// Lower-case and keep only letters, digits and whitespace, so `Dr. Dre`
/// equals `dr dre` and a curly apostrophe counts the same as a straight one.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `"Produced by {Name}"`, with the name title-cased.
pub fn playlist_name(producer: &str) -> String {
    format!("Produced by {}", title_case(producer))
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
