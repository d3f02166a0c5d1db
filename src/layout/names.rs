//! Cleanup of player-name tokens read off the board.

use regex::Regex;
use std::sync::LazyLock;

/// Ordinal markers ("1.") plus the hyphens and colons OCR sprinkles around names.
static ARTIFACTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]\.|[-:]").expect("artifact pattern is valid"));

/// Header words that share a line with the current players' names.
const HEADER_WORDS: [&str; 2] = ["current", "players"];

/// A correction applied to a trimmed token before transliteration.
pub type Correction = fn(&str) -> String;

/// Turns raw tokens into canonical lowercase ASCII names.
///
/// OCR-confusion fixes are kept as a separate list of [`Correction`]s so they
/// can be replaced without touching the rest of the cleanup.
#[derive(Clone, Debug)]
pub struct NameNormalizer {
    corrections: Vec<Correction>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self {
            corrections: vec![correct_misread_l as Correction],
        }
    }
}

impl NameNormalizer {
    pub fn new(corrections: Vec<Correction>) -> Self {
        Self { corrections }
    }

    /// A normalizer that does no OCR-confusion correction.
    pub fn without_corrections() -> Self {
        Self::new(Vec::new())
    }

    /// Normalizes one token. Returns an empty string when nothing name-like
    /// is left (digits, header words, pure punctuation).
    pub fn normalize(&self, raw: &str) -> String {
        let stripped = ARTIFACTS.replace_all(raw, "");
        let mut token = stripped.trim().to_string();

        for correction in &self.corrections {
            token = correction(&token);
        }

        let name: String = deunicode::deunicode(&token)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();

        if name.chars().all(|c| c.is_ascii_digit()) || HEADER_WORDS.contains(&name.as_str()) {
            return String::new();
        }

        name
    }

    /// Normalizes every token of a line, keeping the non-empty names in order.
    pub fn names_from_line(&self, line: &[String]) -> Vec<String> {
        line.iter()
            .map(|token| self.normalize(token))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Normalizes a token with the default corrections.
pub fn normalize_name(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

/// OCR reads a lowercase "l" as a capital "I"; past the first character a
/// capital "I" is almost always that misread.
pub fn correct_misread_l(token: &str) -> String {
    token
        .chars()
        .enumerate()
        .map(|(i, c)| if i > 0 && c == 'I' { 'l' } else { c })
        .collect()
}
