//! Natural-language query parsing.
//!
//! Turns a raw free-text query ("red shirt July 2023", "pictures of Alice
//! from Cancun") into a structured [`QueryIntent`]. Parsing is pure and
//! never fails; ambiguity is resolved by documented heuristics and the
//! worst outcome of a malformed query is an empty intent.
//!
//! Tie-break policies:
//!
//! - **Year**: leftmost 19xx/20xx literal wins.
//! - **Month**: the twelve month names are checked in calendar order and
//!   the first table hit wins, even if another month name appears earlier
//!   in the query. Queries naming two months are rare enough that the
//!   simpler policy is kept deliberately.
//! - **Person**: a capitalized word right after "of"/"for" wins; otherwise
//!   the first capitalized word that is not a month name or year literal.
//!   Capitalized stopwords ("The", "All") remain eligible as person
//!   candidates even though the keyword pass excludes them; the two passes
//!   are intentionally independent.

use photofind_core::{IndexMode, QueryIntent};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Stopwords dropped from the keyword list.
const STOPWORDS: &[&str] = &[
    "show", "me", "all", "pictures", "photos", "from", "with", "in", "of", "our", "trip",
    "wearing", "the", "a", "an", "to", "pull", "up", "at", "on",
];

/// Full month names, calendar order. Index + 1 is the month number.
const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Clothing-color phrases that set the red-shirt flag. Additional color
/// conditions are added by extending this table.
const RED_CLOTHING_PHRASES: &[&str] = &["red shirt", "red top"];

static YEAR_RE: OnceLock<Regex> = OnceLock::new();
static PERSON_AFTER_PREP_RE: OnceLock<Regex> = OnceLock::new();
static CAPITALIZED_WORD_RE: OnceLock<Regex> = OnceLock::new();
static ALPHA_TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn year_re() -> &'static Regex {
    YEAR_RE.get_or_init(|| Regex::new(r"(?:19|20)\d{2}").expect("static regex is valid"))
}

fn person_after_prep_re() -> &'static Regex {
    PERSON_AFTER_PREP_RE.get_or_init(|| {
        Regex::new(r"(?:\bof\b|\bfor\b)\s+([A-Z][a-zA-Z]+)").expect("static regex is valid")
    })
}

fn capitalized_word_re() -> &'static Regex {
    CAPITALIZED_WORD_RE
        .get_or_init(|| Regex::new(r"\b([A-Z][a-zA-Z]+)\b").expect("static regex is valid"))
}

fn alpha_token_re() -> &'static Regex {
    ALPHA_TOKEN_RE.get_or_init(|| Regex::new(r"[A-Za-z]+").expect("static regex is valid"))
}

/// Whether a token is exactly a 4-digit 19xx/20xx literal.
fn is_year_literal(token: &str) -> bool {
    token.len() == 4 && year_re().find(token).is_some_and(|m| m.as_str() == token)
}

/// Natural-language intent parser.
///
/// The mode decides how a detected person token interacts with the keyword
/// list: `Full` removes it (the structured face filter covers it), `Fast`
/// force-inserts it so place-like names still match file paths.
#[derive(Debug, Clone)]
pub struct IntentParser {
    mode: IndexMode,
}

impl IntentParser {
    /// Create a parser for the given index mode.
    #[must_use]
    pub fn new(mode: IndexMode) -> Self {
        Self { mode }
    }

    /// Parse a raw query into a structured intent.
    ///
    /// Pure and infallible; empty or whitespace-only input yields the
    /// default (all-empty) intent.
    #[must_use]
    pub fn parse(&self, query: &str) -> QueryIntent {
        let mut intent = QueryIntent::default();

        let q = query.trim();
        if q.is_empty() {
            return intent;
        }
        let ql = q.to_lowercase();

        intent.red_shirt = RED_CLOTHING_PHRASES.iter().any(|p| ql.contains(p));

        if let Some(m) = year_re().find(q) {
            intent.year = m.as_str().parse().ok();
        }

        // Calendar-order tie-break: first table hit wins, not first in query.
        for (idx, name) in MONTHS.iter().enumerate() {
            if ql.contains(name) {
                intent.month = Some(idx as u32 + 1);
                break;
            }
        }

        intent.person = Self::detect_person(q);

        let mut raw_keywords = Vec::new();
        for token in alpha_token_re().find_iter(q) {
            let lower = token.as_str().to_lowercase();
            if STOPWORDS.contains(&lower.as_str())
                || MONTHS.contains(&lower.as_str())
                || is_year_literal(token.as_str())
            {
                continue;
            }
            raw_keywords.push(lower);
        }

        if let Some(person) = &intent.person {
            let person_lower = person.to_lowercase();
            match self.mode {
                // The structured face filter already covers the person;
                // keeping the token would double-count it.
                IndexMode::Full => raw_keywords.retain(|w| *w != person_lower),
                // Paths are the primary matching surface: make sure the
                // person/place token is present.
                IndexMode::Fast => {
                    if !raw_keywords.contains(&person_lower) {
                        raw_keywords.push(person_lower);
                    }
                }
            }
        }

        // Same double-counting rule for the color condition: once it is a
        // structured face restriction, its phrase tokens leave the keywords.
        if intent.red_shirt && self.mode.is_full() {
            for phrase in RED_CLOTHING_PHRASES {
                if ql.contains(phrase) {
                    for token in phrase.split_whitespace() {
                        raw_keywords.retain(|w| w != token);
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        intent.keywords = raw_keywords
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect();

        intent
    }

    /// Two-pass person heuristic.
    ///
    /// First a capitalized word following "of"/"for", then the first
    /// standalone capitalized word that is neither a month name nor a year
    /// literal.
    fn detect_person(q: &str) -> Option<String> {
        if let Some(caps) = person_after_prep_re().captures(q) {
            return Some(caps[1].to_string());
        }

        for m in capitalized_word_re().captures_iter(q) {
            let word = &m[1];
            let lower = word.to_lowercase();
            if MONTHS.contains(&lower.as_str()) || is_year_literal(word) {
                continue;
            }
            return Some(word.to_string());
        }
        None
    }
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new(IndexMode::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> IntentParser {
        IntentParser::new(IndexMode::Full)
    }

    fn fast() -> IntentParser {
        IntentParser::new(IndexMode::Fast)
    }

    // ==================== Basics ====================

    #[test]
    fn test_empty_query_yields_default_intent() {
        assert_eq!(full().parse(""), QueryIntent::default());
        assert_eq!(full().parse("   \t "), QueryIntent::default());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = full();
        let q = "red shirt pictures of Alice from July 2023";
        assert_eq!(parser.parse(q), parser.parse(q));
    }

    // ==================== Year ====================

    #[test]
    fn test_year_extraction() {
        assert_eq!(full().parse("beach 2022").year, Some(2022));
        assert_eq!(full().parse("vacation 1999 album").year, Some(1999));
    }

    #[test]
    fn test_first_year_wins() {
        let intent = full().parse("from 2021 to 2023");
        assert_eq!(intent.year, Some(2021));
    }

    #[test]
    fn test_out_of_century_numbers_ignored() {
        assert_eq!(full().parse("photo 1850").year, None);
        assert_eq!(full().parse("photo 2150").year, None);
    }

    // ==================== Month ====================

    #[test]
    fn test_month_extraction() {
        assert_eq!(full().parse("pictures from july").month, Some(7));
        assert_eq!(full().parse("December holidays").month, Some(12));
    }

    #[test]
    fn test_month_calendar_order_tie_break() {
        // Both names present: March (3) beats December (12) because the
        // table is scanned in calendar order, regardless of query order.
        let intent = full().parse("december or march");
        assert_eq!(intent.month, Some(3));
    }

    // ==================== Person ====================

    #[test]
    fn test_person_after_of() {
        let intent = full().parse("pictures of Alice at the beach");
        assert_eq!(intent.person.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_person_after_for() {
        let intent = full().parse("album for Bob");
        assert_eq!(intent.person.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_person_first_standalone_capitalized() {
        let intent = full().parse("show me Cancun beach shots");
        assert_eq!(intent.person.as_deref(), Some("Cancun"));
    }

    #[test]
    fn test_person_skips_month_names() {
        // "May" is a month name, so it is not a person candidate.
        let intent = full().parse("photos from May trip");
        assert_eq!(intent.month, Some(5));
        assert_eq!(intent.person, None);
    }

    #[test]
    fn test_capitalized_stopword_is_person_eligible() {
        // The person pass and the keyword pass are independent, so a
        // capitalized stopword can still be picked here.
        let intent = full().parse("The beach album");
        assert_eq!(intent.person.as_deref(), Some("The"));
    }

    // ==================== Color flag ====================

    #[test]
    fn test_red_shirt_flag() {
        assert!(full().parse("red shirt july").red_shirt);
        assert!(full().parse("RED TOP photos").red_shirt);
        assert!(!full().parse("blue shirt photos").red_shirt);
    }

    // ==================== Keywords ====================

    #[test]
    fn test_keywords_drop_stopwords_months_years() {
        let intent = fast().parse("show me all pictures from july 2023 beach");
        assert_eq!(intent.keywords, vec!["beach"]);
    }

    #[test]
    fn test_only_stopwords_yields_empty_keywords() {
        let intent = full().parse("all pictures from July 2023");
        assert_eq!(intent.year, Some(2023));
        assert_eq!(intent.month, Some(7));
        assert!(intent.keywords.is_empty());
    }

    #[test]
    fn test_keywords_deduplicated_preserving_order() {
        let intent = fast().parse("beach sunset beach waves sunset");
        assert_eq!(intent.keywords, vec!["beach", "sunset", "waves"]);
    }

    #[test]
    fn test_keywords_never_contain_invariant_violations() {
        let intent = fast().parse("Show me ALL photos of Alice wearing a red shirt in July 2023");
        for kw in &intent.keywords {
            assert!(!kw.is_empty());
            assert!(!STOPWORDS.contains(&kw.as_str()), "stopword leaked: {kw}");
            assert!(!MONTHS.contains(&kw.as_str()), "month leaked: {kw}");
            assert!(!is_year_literal(kw), "year leaked: {kw}");
        }
    }

    // ==================== Mode-dependent person handling ====================

    #[test]
    fn test_full_mode_removes_person_from_keywords() {
        let intent = full().parse("pictures of Alice at the beach");
        assert_eq!(intent.person.as_deref(), Some("Alice"));
        assert!(!intent.keywords.contains(&"alice".to_string()));
        assert!(intent.keywords.contains(&"beach".to_string()));
    }

    #[test]
    fn test_fast_mode_keeps_person_in_keywords() {
        let intent = fast().parse("pictures of Alice at the beach");
        assert_eq!(intent.person.as_deref(), Some("Alice"));
        assert!(intent.keywords.contains(&"alice".to_string()));
    }

    #[test]
    fn test_fast_mode_force_inserts_person() {
        // "Of" capture: person token would otherwise survive tokenization,
        // but even a person not present among keyword tokens gets appended.
        let intent = fast().parse("trip of Cancun");
        assert_eq!(intent.person.as_deref(), Some("Cancun"));
        assert_eq!(intent.keywords, vec!["cancun"]);
    }

    // ==================== Spec scenarios ====================

    #[test]
    fn test_scenario_2022_cancun() {
        let intent = full().parse("2022 Cancun");
        assert_eq!(intent.year, Some(2022));
        assert_eq!(intent.month, None);
        // Capitalization heuristic fires: Cancun becomes the person
        // candidate and, in full mode, is removed from keywords.
        assert_eq!(intent.person.as_deref(), Some("Cancun"));
        assert!(intent.keywords.is_empty());

        // Fast mode keeps the token so path matching still works.
        let intent = fast().parse("2022 Cancun");
        assert_eq!(intent.keywords, vec!["cancun"]);
    }

    #[test]
    fn test_scenario_lowercase_cancun_stays_keyword() {
        // Without capitalization the heuristic does not fire.
        let intent = full().parse("2022 cancun");
        assert_eq!(intent.year, Some(2022));
        assert_eq!(intent.person, None);
        assert_eq!(intent.keywords, vec!["cancun"]);
    }

    #[test]
    fn test_scenario_all_pictures_from_july_2023() {
        let intent = full().parse("all pictures from July 2023");
        assert_eq!(intent.year, Some(2023));
        assert_eq!(intent.month, Some(7));
        assert_eq!(intent.person, None);
        assert!(intent.keywords.is_empty());
    }

    #[test]
    fn test_scenario_red_shirt_2021() {
        // Full mode: the color condition becomes a face restriction, so
        // its phrase tokens leave the keywords.
        let intent = full().parse("red shirt 2021");
        assert!(intent.red_shirt);
        assert_eq!(intent.year, Some(2021));
        assert!(intent.keywords.is_empty());

        // Fast mode has no face data; the tokens stay for path matching.
        let intent = fast().parse("red shirt 2021");
        assert!(intent.red_shirt);
        assert_eq!(intent.keywords, vec!["red", "shirt"]);
    }

    #[test]
    fn test_red_shirt_removal_keeps_other_keywords() {
        let intent = full().parse("red shirt beach 2021");
        assert!(intent.red_shirt);
        assert_eq!(intent.keywords, vec!["beach"]);

        // A bare "red" without a clothing phrase is an ordinary keyword.
        let intent = full().parse("red barn 2021");
        assert!(!intent.red_shirt);
        assert_eq!(intent.keywords, vec!["red", "barn"]);
    }
}
