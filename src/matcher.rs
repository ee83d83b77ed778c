//! Name matching for the public "find your table" page.
//!
//! A pure query engine over a roster snapshot: normalization, substring
//! search, and the submit-time decision procedure. Callers re-run it on
//! every keystroke; nothing here holds state or touches the roster.

use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::guest::Guest;

/// Why a submitted name could not be resolved to a single guest.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter your name.")]
    EmptyQuery,
    /// More than one guest matched; the candidates are carried so the
    /// caller can prompt for a full-name selection.
    #[error("Multiple matches found, please select your full name.")]
    Ambiguous(Vec<MatchResult>),
    #[error("Guest not found")]
    NotFound,
}

/// Read-only projection of a matched guest for suggestion lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub display_name: String,
    pub table_label: String,
}

impl MatchResult {
    pub fn from_guest(guest: &Guest) -> Self {
        Self {
            display_name: guest.full_name.clone(),
            table_label: guest.table_label.trim().to_string(),
        }
    }
}

/// Case-fold and strip diacritics so that "José" and "jose" compare equal.
///
/// Canonical (NFD) decomposition splits precomposed characters into a base
/// letter plus combining marks; dropping the marks strips the accents.
/// Idempotent, trims surrounding whitespace.
pub fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_ascii() {
        return trimmed.to_lowercase();
    }
    trimmed
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// All guests whose normalized name contains the normalized query.
///
/// An empty (or whitespace-only) query matches nothing rather than
/// everything. Results come back in ascending normalized-name order.
/// Recomputed from scratch on every call.
pub fn search<'a>(roster: &'a [Guest], query: &str) -> impl Iterator<Item = &'a Guest> + 'a {
    let needle = normalize(query);
    let mut hits: Vec<&Guest> = if needle.is_empty() {
        Vec::new()
    } else {
        roster
            .iter()
            .filter(|guest| normalize(&guest.full_name).contains(&needle))
            .collect()
    };
    hits.sort_by_cached_key(|guest| normalize(&guest.full_name));
    hits.into_iter()
}

/// Submit-time resolution of a typed name to a single guest.
///
/// An exact normalized match wins outright, even when other names contain
/// the query as a substring; otherwise a unique substring match is
/// accepted, several matches are ambiguous, and none is not found. The
/// exact-match short-circuit keeps a guest named exactly "Ana" from being
/// blocked by an "Ana Maria" on the same roster.
pub fn resolve<'a>(roster: &'a [Guest], query: &str) -> Result<&'a Guest, LookupError> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Err(LookupError::EmptyQuery);
    }

    if let Some(exact) = roster.iter().find(|guest| normalize(&guest.full_name) == needle) {
        return Ok(exact);
    }

    let hits: Vec<&Guest> = search(roster, query).collect();
    match hits.len() {
        0 => Err(LookupError::NotFound),
        1 => Ok(hits[0]),
        _ => Err(LookupError::Ambiguous(
            hits.iter().map(|guest| MatchResult::from_guest(guest)).collect(),
        )),
    }
}
