//! Text normalization and tokenization for alias matching
//!
//! Aliases are free text typed by people and systems. Before two aliases
//! can be compared they are lowercased, stripped of punctuation, collapsed
//! to single spaces and cleared of stopwords.

use crate::stopwords::is_stopword;
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Text normalization configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNormalizer {
    /// Convert to lowercase
    pub lowercase: bool,
    /// Replace punctuation (anything that is not a word or space char) with a space
    pub remove_punctuation: bool,
    /// Collapse whitespace runs and trim
    pub collapse_whitespace: bool,
    /// Drop English stopwords
    pub remove_stopwords: bool,
    /// NFKD-decompose and drop combining marks (`café` -> `cafe`)
    pub fold_accents: bool,
}

// Lazy-initialized regexes
static PUNCTUATION_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_punctuation_regex() -> &'static Regex {
    PUNCTUATION_REGEX.get_or_init(|| {
        Regex::new(r"[^\w\s]+").expect("Failed to compile punctuation regex")
    })
}

fn get_whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| {
        Regex::new(r"\s+").expect("Failed to compile whitespace regex")
    })
}

impl TextNormalizer {
    /// Create a new text normalizer with custom settings
    pub fn new(
        lowercase: bool,
        remove_punctuation: bool,
        collapse_whitespace: bool,
        remove_stopwords: bool,
        fold_accents: bool,
    ) -> Self {
        Self {
            lowercase,
            remove_punctuation,
            collapse_whitespace,
            remove_stopwords,
            fold_accents,
        }
    }

    /// Curation preset (default)
    ///
    /// Everything on except accent folding.
    pub fn curation() -> Self {
        Self {
            lowercase: true,
            remove_punctuation: true,
            collapse_whitespace: true,
            remove_stopwords: true,
            fold_accents: false,
        }
    }

    /// Curation preset plus accent folding.
    pub fn folding() -> Self {
        Self {
            fold_accents: true,
            ..Self::curation()
        }
    }

    /// Normalize text according to configuration
    ///
    /// Applies transformations in the following order:
    /// 1. Accent folding (if enabled)
    /// 2. Lowercase conversion (if enabled)
    /// 3. Punctuation replacement (if enabled)
    /// 4. Whitespace collapse (if enabled)
    /// 5. Stopword removal (if enabled)
    pub fn normalize(&self, text: &str) -> String {
        let mut buffer = String::with_capacity(text.len());
        self.normalize_into(text, &mut buffer);
        buffer
    }

    /// Normalize text into an existing buffer.
    pub fn normalize_into(&self, text: &str, buffer: &mut String) {
        buffer.clear();

        if self.fold_accents {
            buffer.extend(text.nfkd().filter(|c| !is_combining_mark(*c)));
        } else {
            buffer.push_str(text);
        }

        if self.lowercase {
            *buffer = buffer.to_lowercase();
        }

        if self.remove_punctuation {
            let regex = get_punctuation_regex();
            *buffer = regex.replace_all(buffer, " ").into_owned();
        }

        if self.collapse_whitespace {
            let regex = get_whitespace_regex();
            *buffer = regex.replace_all(buffer, " ").trim().to_string();
        }

        if self.remove_stopwords {
            let kept: Vec<&str> = buffer
                .split_whitespace()
                .filter(|t| !is_stopword(t))
                .collect();
            *buffer = kept.join(" ");
        }
    }

    /// Normalize, then keep only purely alphabetic tokens.
    ///
    /// Tokens with digits, underscores or any other leftovers are dropped.
    /// Order and duplicates are preserved.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .filter(|t| is_alphabetic_token(t))
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::curation()
    }
}

fn is_alphabetic_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Normalize with the default curation preset.
pub fn normalize(text: &str) -> String {
    TextNormalizer::default().normalize(text)
}

/// Tokenize with the default curation preset.
pub fn tokens(text: &str) -> Vec<String> {
    TextNormalizer::default().tokens(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Hello World"), "hello world");
        assert_eq!(normalize("UPPERCASE text"), "uppercase text");
    }

    #[test]
    fn test_punctuation_removal() {
        assert_eq!(normalize("hello, world!"), "hello world");
        // underscores are word characters and survive
        assert_eq!(normalize("test-case_123"), "test case_123");
        assert_eq!(normalize("@#$%^&*()"), "");
    }

    #[test]
    fn test_stopwords() {
        assert_eq!(normalize("the quick brown fox"), "quick brown fox");
        assert_eq!(normalize("this is a test"), "test");
        assert_eq!(normalize("and or but"), "");
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(normalize("  multiple   spaces  "), "multiple spaces");
        assert_eq!(normalize("\t\n\r mixed \t whitespace \n"), "mixed whitespace");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert!(tokens("").is_empty());
        assert!(tokens(" \t ").is_empty());
    }

    #[test]
    fn test_tokens_alphabetic_only() {
        assert_eq!(tokens("hello world"), vec!["hello", "world"]);
        assert_eq!(tokens("test123 word"), vec!["word"]);
        assert_eq!(tokens("word123 123 word"), vec!["word"]);
        assert!(tokens("abc123def").is_empty());
        assert!(tokens("snake_case").is_empty());
    }

    #[test]
    fn test_tokens_keep_order_and_duplicates() {
        assert_eq!(
            tokens("apple banana apple"),
            vec!["apple", "banana", "apple"]
        );
        assert_eq!(
            tokens("Wireless Keyboard - Black (TF)"),
            vec!["wireless", "keyboard", "black", "tf"]
        );
    }

    #[test]
    fn test_stopwords_can_be_kept() {
        let normalizer = TextNormalizer::new(true, true, true, false, false);
        assert_eq!(normalizer.normalize("The Top Shelf"), "the top shelf");
        assert_eq!(normalize("The Top Shelf"), "shelf");
    }

    #[test]
    fn test_accent_folding() {
        assert_eq!(TextNormalizer::folding().tokens("Café Crème"), vec!["cafe", "creme"]);
        assert_eq!(tokens("Café"), vec!["café"]);
    }

    #[test]
    fn test_normalize_into_reuses_buffer() {
        let normalizer = TextNormalizer::default();
        let mut buffer = String::new();

        normalizer.normalize_into("Hello, WORLD!", &mut buffer);
        assert_eq!(buffer, "hello world");

        normalizer.normalize_into("Wireless MOUSE", &mut buffer);
        assert_eq!(buffer, "wireless mouse");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in "[a-zA-Z0-9éü ,.!?()'_\t-]{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_tokens_are_lowercase_alphabetic(s in "[a-zA-Z0-9 ,.!-]{0,40}") {
            for t in tokens(&s) {
                prop_assert!(t.chars().all(|c| c.is_alphabetic()));
                prop_assert_eq!(t.to_lowercase(), t.clone());
            }
        }
    }
}
