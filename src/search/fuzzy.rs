//! Fuzzy Matching Engine
//!
//! Scores one needle against one haystack value. Exact and substring hits are
//! classified by where they fall relative to word boundaries; everything else
//! goes through normalized Levenshtein distance (via `strsim`) over windows of
//! haystack words, bounded by a tolerance threshold.
//!
//! Distances are in `[0, 1]`, lower is better, and the bands never overlap:
//!
//! | match             | distance        |
//! |-------------------|-----------------|
//! | exact value       | 0.0             |
//! | whole word(s)     | [0.0, 0.1)      |
//! | start of a word   | [0.1, 0.175)    |
//! | end of a word     | [0.15, 0.225)   |
//! | middle of a word  | [0.175, 0.25)   |
//! | fuzzy             | [0.25, 0.55]    |

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Default normalized edit-distance tolerance
pub const DEFAULT_THRESHOLD: f64 = 0.4;
/// Shortest needle or window considered for a match, in characters
pub const MIN_MATCH_CHARS: usize = 2;

const FUZZY_BASE: f64 = 0.25;
const FUZZY_SPAN: f64 = 0.75;

/// Match result with distance and classification
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Distance in `[0, 1]`, lower is better
    pub distance: f64,
    /// Match type classification
    pub match_type: MatchType,
}

/// Classification of where the match occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Needle equals the whole value
    Exact,
    /// Needle covers whole words of the value
    FullWord,
    /// Match at beginning of word
    WordStart,
    /// Match at end of word
    WordEnd,
    /// Match in middle of word
    WordMiddle,
    /// Approximate match within the edit-distance tolerance
    Fuzzy,
}

impl MatchType {
    /// Whether the needle occurs verbatim in the haystack
    pub fn is_literal(&self) -> bool {
        !matches!(self, MatchType::Fuzzy)
    }

    /// (base, span) of the distance band for literal matches
    fn band(&self) -> (f64, f64) {
        match self {
            MatchType::Exact => (0.0, 0.0),
            MatchType::FullWord => (0.0, 0.1),
            MatchType::WordStart => (0.1, 0.075),
            MatchType::WordEnd => (0.15, 0.075),
            MatchType::WordMiddle => (0.175, 0.075),
            MatchType::Fuzzy => (FUZZY_BASE, FUZZY_SPAN),
        }
    }
}

/// Text prepared once for repeated matching
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedText {
    /// Normalized, lowercased text
    pub normalized: String,
    /// Normalized words in order
    pub words: Vec<String>,
    /// Character count of `normalized`
    pub char_len: usize,
}

impl PreparedText {
    pub fn new(text: &str) -> Self {
        let normalized = normalize_for_matching(text);
        let words = normalized.unicode_words().map(str::to_string).collect();
        let char_len = normalized.chars().count();
        Self {
            normalized,
            words,
            char_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Normalize text for matching
/// - Unicode NFKC normalization
/// - lowercase, trimmed
pub fn normalize_for_matching(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_lowercase()
}

/// Fuzzy matcher with a bounded edit-distance tolerance
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    /// Create a new fuzzy matcher with the default tolerance
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }

    /// Create a fuzzy matcher with a custom tolerance in `(0, 1]`
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(f64::EPSILON, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Convenience wrapper over [`FuzzyMatcher::match_prepared`] for raw strings
    pub fn fuzzy_match(&self, haystack: &str, needle: &str) -> Option<FuzzyMatch> {
        self.match_prepared(&PreparedText::new(haystack), &PreparedText::new(needle))
    }

    /// Match a prepared needle against a prepared haystack.
    ///
    /// Returns None when the needle is too short or nothing falls within the
    /// tolerance.
    pub fn match_prepared(&self, haystack: &PreparedText, needle: &PreparedText) -> Option<FuzzyMatch> {
        if needle.char_len < MIN_MATCH_CHARS || haystack.is_empty() {
            return None;
        }

        if haystack.normalized == needle.normalized {
            return Some(FuzzyMatch {
                distance: 0.0,
                match_type: MatchType::Exact,
            });
        }

        if let Some(found) = Self::literal_match(haystack, needle) {
            return Some(found);
        }

        self.edit_distance_match(haystack, needle)
    }

    /// Check for exact substring match (case-insensitive)
    pub fn exact_match(&self, haystack: &str, needle: &str) -> bool {
        let needle = normalize_for_matching(needle);
        if needle.is_empty() {
            return false;
        }
        normalize_for_matching(haystack).contains(&needle)
    }

    /// Best literal occurrence of the needle, classified against word boundaries
    fn literal_match(haystack: &PreparedText, needle: &PreparedText) -> Option<FuzzyMatch> {
        let text = haystack.normalized.as_str();
        let pattern = needle.normalized.as_str();

        let best = text
            .match_indices(pattern)
            .map(|(start, _)| Self::classify_match_type(text, start, start + pattern.len()))
            .min_by(|a, b| a.band().0.total_cmp(&b.band().0))?;

        let coverage = needle.char_len as f64 / haystack.char_len.max(1) as f64;
        let (base, span) = best.band();

        Some(FuzzyMatch {
            distance: base + span * (1.0 - coverage.min(1.0)),
            match_type: best,
        })
    }

    /// Classify the type of match based on position in words.
    ///
    /// `start` and `end` are byte offsets on char boundaries.
    fn classify_match_type(text: &str, start: usize, end: usize) -> MatchType {
        let starts_word = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let ends_word = text[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());

        match (starts_word, ends_word) {
            (true, true) => MatchType::FullWord,
            (true, false) => MatchType::WordStart,
            (false, true) => MatchType::WordEnd,
            (false, false) => MatchType::WordMiddle,
        }
    }

    /// Compare the needle with every window of as many haystack words
    fn edit_distance_match(&self, haystack: &PreparedText, needle: &PreparedText) -> Option<FuzzyMatch> {
        let width = needle.words.len();
        if width == 0 || haystack.words.is_empty() {
            return None;
        }

        let target = needle.words.join(" ");
        let target_len = target.chars().count();

        let best = haystack
            .words
            .windows(width.min(haystack.words.len()))
            .filter_map(|window| {
                let candidate = window.join(" ");
                let candidate_len = candidate.chars().count();
                if candidate_len < MIN_MATCH_CHARS {
                    return None;
                }

                // Length gap alone already exceeds the tolerance
                let longest = candidate_len.max(target_len) as f64;
                let gap = candidate_len.abs_diff(target_len) as f64;
                if gap / longest > self.threshold {
                    return None;
                }

                let ratio = 1.0 - strsim::normalized_levenshtein(&candidate, &target);
                (ratio <= self.threshold).then_some(ratio)
            })
            .fold(None, |best: Option<f64>, ratio| {
                Some(best.map_or(ratio, |b| b.min(ratio)))
            })?;

        Some(FuzzyMatch {
            distance: FUZZY_BASE + FUZZY_SPAN * best,
            match_type: MatchType::Fuzzy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let matcher = FuzzyMatcher::new();
        assert!(matcher.exact_match("toux productive", "toux"));
        assert!(matcher.exact_match("toux productive", "productive"));
        assert!(matcher.exact_match("toux productive", "x p"));
        assert!(!matcher.exact_match("toux productive", "fièvre"));
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let matcher = FuzzyMatcher::new();
        assert!(matcher.exact_match("Escherichia coli", "escherichia"));
        assert!(matcher.exact_match("PNEUMONIE", "pneumonie"));
    }

    #[test]
    fn test_whole_value_is_exact() {
        let matcher = FuzzyMatcher::new();
        let m = matcher.fuzzy_match("Pneumonie", "pneumonie").unwrap();
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.distance, 0.0);
    }

    #[test]
    fn test_match_type_classification() {
        let matcher = FuzzyMatcher::new();

        let full = matcher.fuzzy_match("toux productive", "toux").unwrap();
        assert_eq!(full.match_type, MatchType::FullWord);

        let start = matcher.fuzzy_match("pneumonie communautaire", "pneum").unwrap();
        assert_eq!(start.match_type, MatchType::WordStart);

        let end = matcher.fuzzy_match("hématurie", "turie").unwrap();
        assert_eq!(end.match_type, MatchType::WordEnd);

        let middle = matcher.fuzzy_match("pollakiurie", "laki").unwrap();
        assert_eq!(middle.match_type, MatchType::WordMiddle);
    }

    #[test]
    fn test_literal_bands_are_ordered() {
        let matcher = FuzzyMatcher::new();
        let full = matcher.fuzzy_match("grippe saisonnière", "grippe").unwrap();
        let start = matcher.fuzzy_match("grippe saisonnière", "saison").unwrap();
        let middle = matcher.fuzzy_match("grippe saisonnière", "sonni").unwrap();
        let fuzzy = matcher.fuzzy_match("grippe saisonnière", "grippr").unwrap();

        assert!(full.distance < start.distance);
        assert!(start.distance < middle.distance);
        assert!(middle.distance <= fuzzy.distance);
        assert_eq!(fuzzy.match_type, MatchType::Fuzzy);
    }

    #[test]
    fn test_icd_code_prefix_is_full_word() {
        let matcher = FuzzyMatcher::new();
        let m = matcher.fuzzy_match("J18.9", "j18").unwrap();
        assert_eq!(m.match_type, MatchType::FullWord);
    }

    #[test]
    fn test_fuzzy_accepts_close_spelling() {
        let matcher = FuzzyMatcher::new();
        let m = matcher.fuzzy_match("pneumopathie", "pneumonie").unwrap();
        assert_eq!(m.match_type, MatchType::Fuzzy);
        assert!(m.distance >= 0.25 && m.distance <= 0.55);

        // Missing accent is a single edit
        assert!(matcher.fuzzy_match("fièvre", "fievre").is_some());
    }

    #[test]
    fn test_fuzzy_rejects_unrelated() {
        let matcher = FuzzyMatcher::new();
        assert!(matcher.fuzzy_match("paludisme", "cystite").is_none());
        assert!(matcher.fuzzy_match("toux sèche", "splénomégalie").is_none());
    }

    #[test]
    fn test_fuzzy_matches_any_word_window() {
        let matcher = FuzzyMatcher::new();
        let m = matcher.fuzzy_match("infection urinaire basse", "urinare basse").unwrap();
        assert_eq!(m.match_type, MatchType::Fuzzy);
    }

    #[test]
    fn test_threshold_controls_tolerance() {
        let strict = FuzzyMatcher::with_threshold(0.1);
        assert!(strict.fuzzy_match("pneumopathie", "pneumonie").is_none());

        let loose = FuzzyMatcher::with_threshold(0.5);
        assert!(loose.fuzzy_match("pneumopathie", "pneumonie").is_some());
    }

    #[test]
    fn test_short_needle_rejected() {
        let matcher = FuzzyMatcher::new();
        assert!(matcher.fuzzy_match("a b c", "a").is_none());
        assert!(matcher.fuzzy_match("hello", "").is_none());
    }

    #[test]
    fn test_unicode_normalization() {
        // "é" precomposed vs. "e" + combining acute
        let composed = PreparedText::new("Fièvre");
        let decomposed = PreparedText::new("Fie\u{0300}vre");
        assert_eq!(composed.normalized, decomposed.normalized);
        assert_eq!(composed.words, vec!["fièvre".to_string()]);
    }
}
