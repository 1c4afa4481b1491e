//! Title derivation from message content.

use super::types::DEFAULT_TITLE;

/// Maximum derived title length, in characters.
const MAX_TITLE_CHARS: usize = 30;

/// Characters kept before the ellipsis marker when truncating.
const TRUNCATED_CHARS: usize = 27;

/// Derive a display title from the first user message of a conversation.
///
/// Takes the first sentence (content up to the first `.`, `!` or `?`),
/// trimmed. Sentences longer than 30 characters are cut to the first 27
/// with a `...` marker. Falls back to [`DEFAULT_TITLE`] when nothing
/// usable remains.
#[must_use]
pub fn derive_title(content: &str) -> String {
    let first_sentence = content
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();

    let title = if first_sentence.chars().count() > MAX_TITLE_CHARS {
        let head: String = first_sentence.chars().take(TRUNCATED_CHARS).collect();
        format!("{head}...")
    } else {
        first_sentence.to_string()
    };

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentence_under_limit_is_kept_whole() {
        assert_eq!(derive_title("Hello there. How are you?"), "Hello there");
    }

    #[test]
    fn test_long_first_sentence_is_truncated_with_ellipsis() {
        let title =
            derive_title("This is a very long opening sentence that keeps going on and on");
        assert_eq!(title, "This is a very long opening...");
        assert_eq!(title.chars().count(), TRUNCATED_CHARS + 3);
    }

    #[test]
    fn test_exactly_thirty_characters_is_not_truncated() {
        let sentence = "a".repeat(MAX_TITLE_CHARS);
        assert_eq!(derive_title(&sentence), sentence);

        let over = "a".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(derive_title(&over), format!("{}...", "a".repeat(TRUNCATED_CHARS)));
    }

    #[test]
    fn test_splits_on_any_sentence_terminator() {
        assert_eq!(derive_title("Wow! That worked."), "Wow");
        assert_eq!(derive_title("Does it work? Yes."), "Does it work");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(derive_title("  spaced out. rest"), "spaced out");
    }

    #[test]
    fn test_empty_content_falls_back_to_default() {
        assert_eq!(derive_title(""), DEFAULT_TITLE);
        assert_eq!(derive_title("   "), DEFAULT_TITLE);
        assert_eq!(derive_title("?!."), DEFAULT_TITLE);
    }
}
