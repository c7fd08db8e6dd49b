use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not a letter, digit, whitespace, or `. , ! ? ' " -`.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\p{L}\p{N}\s.,!?'"-]"#).unwrap());

/// Strip emoji, symbols, and markup leftovers from a scraped comment.
/// Total and idempotent: `clean(&clean(s)) == clean(s)`.
pub fn clean(text: &str) -> String {
    DISALLOWED_RE.replace_all(text, "").into_owned()
}

/// Clean every comment, preserving order and count.
pub fn clean_all<S: AsRef<str>>(comments: &[S]) -> Vec<String> {
    comments.iter().map(|c| clean(c.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_allowed(c: char) -> bool {
        c.is_alphanumeric() || c.is_whitespace() || ".,!?'\"-".contains(c)
    }

    #[test]
    fn test_strips_emoji_and_symbols() {
        assert_eq!(clean("Love this 😍🔥 #blessed @me"), "Love this  blessed me");
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        let text = r#"Wow, really?! It's "great" - 10/10."#;
        assert_eq!(clean(text), r#"Wow, really?! It's "great" - 1010."#);
    }

    #[test]
    fn test_keeps_non_latin_letters() {
        assert_eq!(clean("素晴らしい! отлично"), "素晴らしい! отлично");
    }

    #[test]
    fn test_drops_underscore_and_brackets() {
        assert_eq!(clean("snake_case (yes) [no]"), "snakecase yes no");
    }

    #[test]
    fn test_output_only_allowed_chars() {
        let samples = [
            "Great video!",
            "follow me for more 👉 https://spam.example/?a=1&b=2",
            "<b>bold</b> $$$ 100% ~~~",
            "tabs\tand\nnewlines",
            "",
        ];
        for s in samples {
            let out = clean(s);
            assert!(out.chars().all(is_allowed), "bad char in {out:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        let samples = ["Nice!!", "😀 a_b #c", "plain text", "“smart quotes”"];
        for s in samples {
            let once = clean(s);
            assert_eq!(clean(&once), once);
        }
    }

    #[test]
    fn test_clean_all_preserves_count() {
        let cleaned = clean_all(&["a!", "🙂", "b"]);
        assert_eq!(cleaned, vec!["a!".to_string(), String::new(), "b".to_string()]);
    }
}
