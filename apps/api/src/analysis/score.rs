//! Best-effort match score extraction from free-form review text.
//!
//! Model output has no guaranteed format. A missing score is a normal outcome
//! (`None`), never an error and never zero.

use std::sync::LazyLock;

use regex::Regex;

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\s?/\s?100\b").expect("score pattern is a valid regex")
});

/// Returns the first `N/100` rating in `text`, if any. Ratings above 100 are skipped.
pub fn parse_match_score(text: &str) -> Option<u8> {
    SCORE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u8>().ok())
        .find(|score| *score <= 100)
}
