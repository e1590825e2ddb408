//! Query Parser & Preprocessor
//!
//! Parses and tokenizes clinical queries, extracts quoted phrases and filters
//! stop words. Only double quotes and guillemets delimit phrases: a single
//! quote is an elision in French ("pneumopathie d'inhalation").

use super::fuzzy::normalize_for_matching;
use unicode_segmentation::UnicodeSegmentation;

/// Stop words that should be excluded from individual word searches
const STOP_WORDS: &[&str] = &[
    "a", "à", "au", "aux", "avec", "chez", "d", "de", "des", "du", "en", "et", "l", "la", "le",
    "les", "ou", "par", "pour", "sans", "sur", "un", "une", "the", "and", "of", "or", "with",
    "in",
];

/// Parsed and processed search query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Original unmodified query
    pub original: String,
    /// Whole query for full-text search, quote marks removed
    pub whole_query: String,
    /// Individual words (excluding stop words and quoted parts)
    pub individual_words: Vec<String>,
    /// Exact match requirements from quoted text
    pub quoted_phrases: Vec<String>,
}

impl ParsedQuery {
    /// Whether there is anything to match at all
    pub fn is_empty(&self) -> bool {
        self.whole_query.is_empty() && self.quoted_phrases.is_empty()
    }
}

/// Query parser and preprocessor
pub struct QueryParser;

impl QueryParser {
    /// Parse a search query into its components
    pub fn parse(query: &str) -> ParsedQuery {
        let original = query.to_string();

        // Extract quoted phrases
        let (quoted_phrases, query_without_quotes) = Self::extract_quoted_phrases(query);

        let whole_query = normalize_for_matching(&Self::strip_quote_marks(query))
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        // Tokenize the query without quoted parts
        let individual_words = Self::tokenize_and_filter(&query_without_quotes);

        ParsedQuery {
            original,
            whole_query,
            individual_words,
            quoted_phrases,
        }
    }

    fn closing_quote(ch: char) -> Option<char> {
        match ch {
            '"' => Some('"'),
            '«' => Some('»'),
            '“' => Some('”'),
            _ => None,
        }
    }

    fn strip_quote_marks(query: &str) -> String {
        query
            .chars()
            .map(|c| if matches!(c, '"' | '«' | '»' | '“' | '”') { ' ' } else { c })
            .collect()
    }

    /// Extract quoted phrases
    /// Returns (quoted_phrases, query_with_quotes_removed)
    fn extract_quoted_phrases(query: &str) -> (Vec<String>, String) {
        let mut phrases = Vec::new();
        let mut remaining = String::new();
        let mut chars = query.chars();

        while let Some(ch) = chars.next() {
            let Some(closing) = Self::closing_quote(ch) else {
                remaining.push(ch);
                continue;
            };

            let mut phrase = String::new();
            let mut found_closing = false;

            while let Some(next) = chars.next() {
                if next == closing {
                    found_closing = true;
                    break;
                } else if next == '\\' {
                    // Handle escaped quotes
                    if let Some(escaped) = chars.next() {
                        phrase.push(escaped);
                    }
                } else {
                    phrase.push(next);
                }
            }

            let phrase_trimmed = phrase.trim();
            if found_closing && !phrase_trimmed.is_empty() {
                phrases.push(phrase_trimmed.to_string());
                remaining.push(' ');
            } else if !found_closing {
                // Unclosed quote - treat the text literally
                remaining.push(' ');
                remaining.push_str(&phrase);
            }
        }

        (phrases, remaining)
    }

    /// Tokenize text into words and filter stop words
    fn tokenize_and_filter(text: &str) -> Vec<String> {
        let normalized = normalize_for_matching(text);
        let mut words: Vec<String> = Vec::new();
        for word in normalized.unicode_words() {
            if Self::is_stop_word(word) || words.iter().any(|w| w == word) {
                continue;
            }
            words.push(word.to_string());
        }
        words
    }

    /// Check if a word is a stop word
    fn is_stop_word(word: &str) -> bool {
        STOP_WORDS.contains(&word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parsing() {
        let parsed = QueryParser::parse("Toux  Fièvre");
        assert_eq!(parsed.original, "Toux  Fièvre");
        assert_eq!(parsed.whole_query, "toux fièvre");
        assert_eq!(parsed.individual_words, vec!["toux", "fièvre"]);
        assert!(parsed.quoted_phrases.is_empty());
    }

    #[test]
    fn test_quoted_phrases() {
        let parsed = QueryParser::parse(r#"fièvre "toux productive" dyspnée"#);
        assert_eq!(parsed.quoted_phrases, vec!["toux productive"]);
        assert_eq!(parsed.individual_words, vec!["fièvre", "dyspnée"]);
        assert_eq!(parsed.whole_query, "fièvre toux productive dyspnée");
    }

    #[test]
    fn test_guillemets() {
        let parsed = QueryParser::parse("«brûlures mictionnelles» femme");
        assert_eq!(parsed.quoted_phrases, vec!["brûlures mictionnelles"]);
        assert_eq!(parsed.individual_words, vec!["femme"]);
    }

    #[test]
    fn test_apostrophe_is_not_a_quote() {
        let parsed = QueryParser::parse("pneumopathie d'inhalation");
        assert!(parsed.quoted_phrases.is_empty());
        assert_eq!(parsed.whole_query, "pneumopathie d'inhalation");
        assert_eq!(parsed.individual_words, vec!["pneumopathie", "d'inhalation"]);
    }

    #[test]
    fn test_stop_words_filtering() {
        let parsed = QueryParser::parse("infection de la vessie et des reins");
        assert_eq!(parsed.individual_words, vec!["infection", "vessie", "reins"]);
    }

    #[test]
    fn test_duplicate_words_collapsed() {
        let parsed = QueryParser::parse("fièvre toux fièvre");
        assert_eq!(parsed.individual_words, vec!["fièvre", "toux"]);
    }

    #[test]
    fn test_escaped_quotes() {
        let parsed = QueryParser::parse(r#""quote with \" inside""#);
        assert_eq!(parsed.quoted_phrases, vec![r#"quote with " inside"#]);
    }

    #[test]
    fn test_unclosed_quote() {
        let parsed = QueryParser::parse(r#"toux "fièvre brutale"#);
        assert!(parsed.quoted_phrases.is_empty());
        assert_eq!(parsed.individual_words, vec!["toux", "fièvre", "brutale"]);
    }

    #[test]
    fn test_empty_query() {
        let parsed = QueryParser::parse("");
        assert_eq!(parsed.original, "");
        assert!(parsed.is_empty());
        assert!(parsed.individual_words.is_empty());
        assert!(parsed.quoted_phrases.is_empty());
    }

    #[test]
    fn test_only_stop_words() {
        let parsed = QueryParser::parse("de la et");
        assert!(parsed.individual_words.is_empty());
        assert_eq!(parsed.whole_query, "de la et");
    }
}
