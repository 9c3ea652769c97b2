//! Flagged-term lexicon.
//!
//! A [`Lexicon`] compiles its terms into one case-insensitive alternation
//! anchored on word boundaries. Matches are replaced by a run of `*` with the
//! same number of characters as the matched text.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use hushboard_common::{AppError, AppResult};
use regex::{Regex, RegexBuilder};

/// Replacement character for masked terms.
pub const MASK_CHAR: char = '*';

/// Built-in flagged terms. Every entry must begin and end with a word
/// character.
const BUILTIN_TERMS: &[&str] = &[
    // English
    "fuck", "fucker", "fucking", "motherfucker", "shit", "bullshit", "bitch", "bastard",
    "asshole", "ass", "dick", "cock", "pussy", "cunt", "slut", "whore", "twat", "wanker",
    "prick", "douchebag", "retard", "faggot", "fag", "nigger", "nigga", "dyke", "tranny",
    // Spanish
    "puta", "puto", "mierda", "pendejo", "cabron", "cabrón", "coño", "gilipollas",
    "maricón", "joder", "verga", "chinga", "culero",
    // French
    "merde", "putain", "connard", "connasse", "salope", "enculé", "pute",
    // German
    "scheisse", "scheiße", "arschloch", "fotze", "wichser", "hurensohn", "schlampe",
    // Portuguese
    "caralho", "porra", "merda", "buceta", "foder", "arrombado",
    // Italian
    "cazzo", "stronzo", "vaffanculo", "troia", "minchia",
    // Tagalog
    "putangina", "tangina", "gago", "ulol", "tarantado",
    // Indonesian
    "bangsat", "kontol", "memek", "ngentot", "bajingan",
    // Russian
    "блядь", "сука", "хуй", "пизда", "ебать", "мудак",
];

#[allow(clippy::expect_used)]
static BUILTIN: LazyLock<Lexicon> =
    LazyLock::new(|| Lexicon::new(BUILTIN_TERMS.iter().copied()).expect("built-in terms compile"));

/// Compiled set of flagged terms.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pattern: Regex,
    terms: Vec<String>,
}

impl Lexicon {
    /// Compile a lexicon from a list of terms.
    ///
    /// Terms are trimmed and de-duplicated case-insensitively. A term that
    /// does not start and end with a word character has no well-defined
    /// word boundary and is rejected.
    pub fn new<I, S>(terms: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.to_lowercase()))
            .collect();

        if terms.is_empty() {
            return Err(AppError::Config("Lexicon needs at least one term".to_string()));
        }

        if let Some(bad) = terms.iter().find(|t| !has_word_edges(t)) {
            return Err(AppError::Config(format!(
                "Flagged term must start and end with a letter or digit: {bad:?}"
            )));
        }

        // Longest first, so a longer term wins over its own prefix.
        terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));

        let alternation = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to compile lexicon: {e}")))?;

        Ok(Self { pattern, terms })
    }

    /// The process-wide built-in lexicon.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Built-in terms plus `extra`.
    pub fn with_extra_terms(extra: &[String]) -> AppResult<Self> {
        Self::new(
            BUILTIN_TERMS
                .iter()
                .copied()
                .chain(extra.iter().map(String::as_str)),
        )
    }

    /// Mask every flagged term in `text`.
    ///
    /// Returns the input unchanged when nothing matched.
    #[must_use]
    pub fn filter<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.is_empty() {
            return Cow::Borrowed(text);
        }

        self.pattern.replace_all(text, |caps: &regex::Captures<'_>| {
            MASK_CHAR.to_string().repeat(caps[0].chars().count())
        })
    }

    /// Whether `text` contains no flagged term.
    #[must_use]
    pub fn is_clean(&self, text: &str) -> bool {
        !self.pattern.is_match(text)
    }

    /// The flagged terms found in `text`, as written, in order of appearance.
    #[must_use]
    pub fn matches<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always `false`; an empty lexicon cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn has_word_edges(term: &str) -> bool {
    term.chars().next().is_some_and(is_word_char) && term.chars().last().is_some_and(is_word_char)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compiles() {
        let lexicon = Lexicon::builtin();
        assert!(!lexicon.is_empty());
        assert_eq!(lexicon.len(), BUILTIN_TERMS.len());
    }

    #[test]
    fn test_masks_whole_words() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.filter("you absolute bitch"), "you absolute *****");
        assert_eq!(lexicon.filter("Shit happens"), "**** happens");
        assert_eq!(lexicon.filter("SHIT, shit; ShIt!"), "****, ****; ****!");
    }

    #[test]
    fn test_substrings_never_match() {
        let lexicon = Lexicon::builtin();
        for text in ["Scunthorpe", "classic assassin", "Dickens", "cockpit", "shitake"] {
            assert_eq!(lexicon.filter(text), text, "{text} should be untouched");
            assert!(lexicon.is_clean(text));
        }
    }

    #[test]
    fn test_mask_length_counts_characters() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.filter("so eine Scheiße"), "so eine *******");
        assert_eq!(lexicon.filter("ты сука"), "ты ****");
        assert_eq!(lexicon.filter("¡Qué coño!"), "¡Qué ****!");
    }

    #[test]
    fn test_longest_term_wins() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.filter("motherfucker"), "************");
        assert_eq!(lexicon.filter("bullshit"), "********");
    }

    #[test]
    fn test_empty_and_clean_input_borrowed() {
        let lexicon = Lexicon::builtin();
        assert!(matches!(lexicon.filter(""), Cow::Borrowed("")));
        assert!(matches!(lexicon.filter("hello there"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let lexicon = Lexicon::builtin();
        for text in [
            "fuck this shit",
            "Merde alors, putain",
            "plain text",
            "ёлки сука палки",
            "emoji 🎉 bitch 🎉",
            "ass-hat and asshole",
        ] {
            let once = lexicon.filter(text).into_owned();
            assert_eq!(lexicon.filter(&once), once);
        }
    }

    #[test]
    fn test_matches_reports_original_text() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.matches("Well, SHIT and merde"), vec!["SHIT", "merde"]);
        assert!(lexicon.matches("nothing here").is_empty());
    }

    #[test]
    fn test_arbitrary_unicode_does_not_panic() {
        let lexicon = Lexicon::builtin();
        let text = "\u{0}\u{200b}\u{feff}é\u{301} 한국어 ✓ 𝔘𝔫𝔦𝔠𝔬𝔡𝔢 \u{10ffff}";
        assert_eq!(lexicon.filter(text), text);
    }

    #[test]
    fn test_custom_terms() {
        let lexicon = Lexicon::new(["Frick", "frick", "  heck "]).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.filter("what the HECK, frick"), "what the ****, *****");
    }

    #[test]
    fn test_extra_terms_extend_builtin() {
        let lexicon = Lexicon::with_extra_terms(&["frick".to_string()]).unwrap();
        assert_eq!(lexicon.filter("frick and shit"), "***** and ****");
    }

    #[test]
    fn test_rejects_terms_without_word_edges() {
        assert!(matches!(Lexicon::new(["$hit"]), Err(AppError::Config(_))));
        assert!(matches!(Lexicon::new(["bad!"]), Err(AppError::Config(_))));
        assert!(matches!(Lexicon::new(Vec::<String>::new()), Err(AppError::Config(_))));
    }
}
