//! Screening of user-submitted text before it is persisted.

use std::sync::Arc;

use tracing::debug;

use super::lexicon::Lexicon;

/// Text after screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screened {
    /// The text to store. The raw submission is never kept.
    pub text: String,
    /// Whether anything was masked.
    pub was_filtered: bool,
}

/// Runs the lexicon over every text field of a submission.
#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    lexicon: Arc<Lexicon>,
}

impl SubmissionGuard {
    /// Create a guard over the given lexicon.
    #[must_use]
    pub const fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Guard over the built-in lexicon.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Arc::new(Lexicon::builtin().clone()))
    }

    /// Screen a single field.
    #[must_use]
    pub fn screen(&self, raw: &str) -> Screened {
        let text = self.lexicon.filter(raw).into_owned();
        let was_filtered = text != raw;
        if was_filtered {
            debug!(len = raw.len(), "Masked flagged terms in submission");
        }
        Screened { text, was_filtered }
    }

    /// Screen several fields of one submission.
    ///
    /// The submission counts as filtered if any field was.
    #[must_use]
    pub fn screen_all<const N: usize>(&self, fields: [&str; N]) -> ([String; N], bool) {
        let screened = fields.map(|f| self.screen(f));
        let was_filtered = screened.iter().any(|s| s.was_filtered);
        (screened.map(|s| s.text), was_filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_passes_through() {
        let guard = SubmissionGuard::builtin();
        let screened = guard.screen("A perfectly pleasant message");
        assert_eq!(screened.text, "A perfectly pleasant message");
        assert!(!screened.was_filtered);
    }

    #[test]
    fn test_flagged_text_is_masked() {
        let guard = SubmissionGuard::builtin();
        let screened = guard.screen("what a load of bullshit");
        assert_eq!(screened.text, "what a load of ********");
        assert!(screened.was_filtered);
    }

    #[test]
    fn test_fully_masked_field_still_returned() {
        let guard = SubmissionGuard::builtin();
        let screened = guard.screen("shit");
        assert_eq!(screened.text, "****");
        assert!(screened.was_filtered);
    }

    #[test]
    fn test_screen_all_ors_flags() {
        let guard = SubmissionGuard::builtin();

        let ([title, body], filtered) = guard.screen_all(["Hello", "merde alors"]);
        assert_eq!(title, "Hello");
        assert_eq!(body, "***** alors");
        assert!(filtered);

        let (_, filtered) = guard.screen_all(["Hello", "world"]);
        assert!(!filtered);
    }
}
