use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static HANDLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@#]\w+").unwrap());
static NON_ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw article content for the scoring models: lowercase, drop
/// URLs and social handles/hashtags, keep letters only, collapse runs of
/// whitespace. Stopword removal and stemming live inside the scorer
/// collaborator; they are tied to its tokenizer.
pub fn normalize_content(text: &str) -> String {
    let text = text.to_lowercase();
    let text = URL_RE.replace_all(&text, "");
    let text = HANDLE_RE.replace_all(&text, "");
    let text = NON_ALPHA_RE.replace_all(&text, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(
            normalize_content("Breaking   News\n\tToday"),
            "breaking news today"
        );
    }

    #[test]
    fn strips_urls() {
        assert_eq!(
            normalize_content("read more at https://example.com/a?b=1 now"),
            "read more at now"
        );
    }

    #[test]
    fn strips_handles_and_hashtags() {
        assert_eq!(
            normalize_content("quote from @official about #election results"),
            "quote from about results"
        );
    }

    #[test]
    fn drops_digits_and_punctuation() {
        assert_eq!(
            normalize_content("prices rose 3.5% (officials said)!"),
            "prices rose officials said"
        );
    }

    #[test]
    fn empty_and_symbol_only_input_normalizes_to_empty() {
        assert_eq!(normalize_content(""), "");
        assert_eq!(normalize_content("12345 !!! ???"), "");
    }
}
