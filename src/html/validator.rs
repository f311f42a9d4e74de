//! Before/after constraint checks
//!
//! In reading order a constrained search looks like
//! `before ... main ... after`. A candidate is rejected when its context
//! marker was never found, or when the marker sits on the wrong side of it.

use super::markers::Marker;
use super::matcher::Match;
use crate::annotations::SearchContext;

/// Whether `candidate`, found in `chapter`, satisfies the search context.
pub fn accepts(
    candidate: &Match,
    context: &SearchContext,
    before: Option<&Marker>,
    after: Option<&Marker>,
    chapter: usize,
) -> bool {
    if context.before.is_some() {
        let Some(marker) = before else {
            return false;
        };
        // Reader has not reached the marker's chapter yet
        if marker.chapter > chapter {
            return false;
        }
        if marker.chapter == chapter && marker.start > candidate.start {
            return false;
        }
    }

    if context.after.is_some() {
        let Some(marker) = after else {
            return false;
        };
        // Reader is already past the marker's chapter
        if marker.chapter < chapter {
            return false;
        }
        if marker.chapter == chapter && marker.end < candidate.end {
            return false;
        }
    }

    true
}
