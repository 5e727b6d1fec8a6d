//! Logbook search terms and the row filter predicate

use lv_core::range::{DistanceRange, YearRange};
use lv_data::LogbookRow;

/// Split search input into lowercase terms.
///
/// Terms are separated by whitespace. A token starting with `'` or `"` runs
/// to the matching closing quote and may contain spaces. A quote that is
/// never closed is kept as a literal character. Empty terms are dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        let Some(first) = rest.chars().next() else {
            break;
        };

        if first == '"' || first == '\'' {
            let body = &rest[first.len_utf8()..];
            if let Some(close) = body.find(first) {
                push_term(&mut terms, &body[..close]);
                rest = &body[close + first.len_utf8()..];
                continue;
            }
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        push_term(&mut terms, &rest[..end]);
        rest = &rest[end..];
    }

    terms
}

fn push_term(terms: &mut Vec<String>, term: &str) {
    if !term.is_empty() {
        terms.push(term.to_lowercase());
    }
}

/// Year, distance and text criteria of the logbook table
#[derive(Debug, Clone, PartialEq)]
pub struct LogbookFilter {
    pub years: YearRange,
    pub distance: DistanceRange,
    /// Lowercase terms, all of which must match
    pub terms: Vec<String>,
}

impl LogbookFilter {
    pub fn new(years: YearRange, distance: DistanceRange, search: &str) -> Self {
        Self { years, distance, terms: tokenize(search) }
    }

    pub fn matches(&self, row: &LogbookRow) -> bool {
        self.years.contains(row.year)
            && self.distance.contains(row.distance_km)
            && matches_terms(&self.terms, row)
    }
}

/// Every term must occur in the boat, crew or destination text
pub fn matches_terms(terms: &[String], row: &LogbookRow) -> bool {
    let fields = row.search_fields();
    terms
        .iter()
        .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
}
