//! Token-set relevance scoring for the framework fallback search.
//!
//! Each query term contributes the best tier it reaches against any entry token:
//!
//! | tier | match | points |
//! |------|-------|--------|
//! | exact | token equals term, case-sensitive | 5 |
//! | folded | token equals term ignoring case | 4 |
//! | substring | token contains term ignoring case | 2 |
//! | fuzzy | >70% of the term's characters occur in the token | 1 |
//!
//! ```rust
//! use appledocs_core::scoring::score;
//!
//! let tokens = vec!["NavigationView".to_string(), "Navigation".to_string(), "View".to_string()];
//! assert_eq!(score(&tokens, &["View".to_string()]), 5);
//! assert_eq!(score(&tokens, &["view".to_string()]), 4);
//! assert_eq!(score(&tokens, &["nav".to_string()]), 2);
//! ```

use std::cmp::Ordering;

/// Points for a case-sensitive token match.
pub const EXACT: u32 = 5;
/// Points for a case-insensitive token match.
pub const FOLDED: u32 = 4;
/// Points for a substring match.
pub const SUBSTRING: u32 = 2;
/// Points for a fuzzy character-overlap match.
pub const FUZZY: u32 = 1;

const FUZZY_MIN_LEN: usize = 3;
const FUZZY_THRESHOLD: f64 = 0.7;

/// Something the ranker can score and filter.
pub trait Candidate {
    /// Case-preserving tokens.
    fn tokens(&self) -> &[String];
    /// Display title, used as the tie-breaker.
    fn title(&self) -> &str;
    /// Kind used by the type filter.
    fn kind(&self) -> &str;
    /// Platform names used by the platform filter.
    fn platforms(&self) -> &[String];
}

/// Optional filters applied after scoring.
#[derive(Debug, Clone, Default)]
pub struct RankFilter {
    /// Keep candidates whose kind equals this, ignoring case.
    pub symbol_type: Option<String>,
    /// Keep candidates with a platform containing this, ignoring case.
    pub platform: Option<String>,
}

impl RankFilter {
    /// Whether `candidate` passes both filters.
    pub fn accepts<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        let type_ok = self
            .symbol_type
            .as_deref()
            .is_none_or(|t| candidate.kind().eq_ignore_ascii_case(t));
        let platform_ok = self.platform.as_deref().is_none_or(|p| {
            let p = p.to_lowercase();
            candidate
                .platforms()
                .iter()
                .any(|name| name.to_lowercase().contains(&p))
        });
        type_ok && platform_ok
    }
}

/// A scored candidate.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a, C> {
    /// The candidate.
    pub entry: &'a C,
    /// Its score.
    pub score: u32,
}

/// Split a query into case-preserving terms on non-alphanumeric characters.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sum of the best tier each term reaches.
pub fn score(entry_tokens: &[String], query_terms: &[String]) -> u32 {
    query_terms
        .iter()
        .map(|term| term_score(entry_tokens, term))
        .sum()
}

fn term_score(tokens: &[String], term: &str) -> u32 {
    if tokens.iter().any(|t| t == term) {
        return EXACT;
    }
    let folded = term.to_lowercase();
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    if lowered.iter().any(|t| *t == folded) {
        return FOLDED;
    }
    if lowered.iter().any(|t| t.contains(&folded)) {
        return SUBSTRING;
    }
    if lowered.iter().any(|t| fuzzy_match(t, &folded)) {
        return FUZZY;
    }
    0
}

#[allow(clippy::cast_precision_loss)]
fn fuzzy_match(token: &str, term: &str) -> bool {
    let term_len = term.chars().count();
    if term_len < FUZZY_MIN_LEN || token.chars().count() < FUZZY_MIN_LEN {
        return false;
    }
    let present = term.chars().filter(|c| token.contains(*c)).count();
    present as f64 / term_len as f64 > FUZZY_THRESHOLD
}

/// Score, filter, and order candidates: score descending, then title ascending.
///
/// Zero scores are dropped before filtering; the result is truncated to `limit`.
pub fn rank<'a, C, I>(candidates: I, query: &str, filter: &RankFilter, limit: usize) -> Vec<Ranked<'a, C>>
where
    C: Candidate + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let terms = query_terms(query);
    let mut ranked: Vec<Ranked<'a, C>> = candidates
        .into_iter()
        .map(|entry| Ranked {
            entry,
            score: score(entry.tokens(), &terms),
        })
        .filter(|r| r.score > 0 && filter.accepts(r.entry))
        .collect();

    ranked.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => a.entry.title().cmp(b.entry.title()),
        other => other,
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        tokens: Vec<String>,
        title: String,
        kind: String,
        platforms: Vec<String>,
    }

    impl Item {
        fn new(title: &str, kind: &str, platforms: &[&str]) -> Self {
            Self {
                tokens: crate::tokenize::tokenize_preserving_case(title),
                title: title.to_string(),
                kind: kind.to_string(),
                platforms: platforms.iter().map(ToString::to_string).collect(),
            }
        }
    }

    impl Candidate for Item {
        fn tokens(&self) -> &[String] {
            &self.tokens
        }
        fn title(&self) -> &str {
            &self.title
        }
        fn kind(&self) -> &str {
            &self.kind
        }
        fn platforms(&self) -> &[String] {
            &self.platforms
        }
    }

    fn terms(q: &str) -> Vec<String> {
        query_terms(q)
    }

    #[test]
    fn test_tiers() {
        let tokens = vec!["Button".to_string()];
        assert_eq!(score(&tokens, &terms("Button")), EXACT);
        assert_eq!(score(&tokens, &terms("button")), FOLDED);
        assert_eq!(score(&tokens, &terms("butt")), SUBSTRING);
        assert_eq!(score(&tokens, &terms("buton")), FUZZY);
        assert_eq!(score(&tokens, &terms("xyz")), 0);
    }

    #[test]
    fn test_fuzzy_needs_length() {
        let tokens = vec!["Go".to_string()];
        assert_eq!(score(&tokens, &terms("og")), 0);
    }

    #[test]
    fn test_terms_sum() {
        let tokens = crate::tokenize::tokenize_preserving_case("NavigationView");
        assert_eq!(score(&tokens, &terms("Navigation View")), EXACT * 2);
        assert_eq!(score(&tokens, &terms("nav view")), SUBSTRING + FOLDED);
    }

    #[test]
    fn test_rank_orders_by_score_then_title() {
        let items = vec![
            Item::new("Text", "struct", &["iOS"]),
            Item::new("TextField", "struct", &["iOS"]),
            Item::new("TextEditor", "struct", &["macOS"]),
            Item::new("Button", "struct", &["iOS"]),
        ];

        let ranked = rank(&items, "Text", &RankFilter::default(), 10);
        let titles: Vec<&str> = ranked.iter().map(|r| r.entry.title.as_str()).collect();

        assert_eq!(titles, vec!["Text", "TextEditor", "TextField"]);
        assert!(ranked.iter().all(|r| r.score == EXACT));
    }

    #[test]
    fn test_rank_filters_and_limits() {
        let items = vec![
            Item::new("TextField", "struct", &["iOS"]),
            Item::new("TextEditor", "struct", &["macOS"]),
            Item::new("TextStyle", "protocol", &["iOS"]),
        ];

        let mac = RankFilter {
            platform: Some("MACOS".into()),
            ..RankFilter::default()
        };
        let ranked = rank(&items, "text", &mac, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entry.title, "TextEditor");

        let protocols = RankFilter {
            symbol_type: Some("Protocol".into()),
            ..RankFilter::default()
        };
        assert_eq!(rank(&items, "text", &protocols, 10).len(), 1);
        assert_eq!(rank(&items, "text", &RankFilter::default(), 2).len(), 2);
    }
}
