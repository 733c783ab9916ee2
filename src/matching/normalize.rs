use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Organizational tokens that carry no identity information. Two feeds will
/// render the same club as "Barcelona", "FC Barcelona" or "Barcelona CF";
/// dropping these tokens lets the similarity scorer see through the noise.
const NOISE_TOKENS: &[&str] = &[
    "fc", "fk", "sk", "ac", "sc", "cf", "club", "team", "united", "city", "town", "rovers",
];

/// Normalize a participant name for comparison: lowercase, strip diacritics
/// via canonical decomposition, replace punctuation with spaces, collapse
/// whitespace, and drop noise tokens. Idempotent; empty or symbol-only
/// input yields an empty string.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| !NOISE_TOKENS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_whitespace() {
        assert_eq!(normalize("Real  Madrid "), "real madrid");
        assert_eq!(normalize("  Man. Utd  "), "man utd");
    }

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("Atlético Madrid"), "atletico madrid");
        assert_eq!(normalize("Bešiktaš"), "besiktas");
    }

    #[test]
    fn test_drops_noise_tokens() {
        assert_eq!(normalize("FC Barcelona"), "barcelona");
        assert_eq!(normalize("Real Madrid CF"), "real madrid");
        assert_eq!(normalize("Manchester City"), "manchester");
    }

    #[test]
    fn test_symbol_only_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("***!!!"), "");
        assert_eq!(normalize("FC"), "");
    }

    #[test]
    fn test_idempotent() {
        for name in ["FC Bayern München", "Paris Saint-Germain", "N. Djokovic"] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once);
        }
    }
}
