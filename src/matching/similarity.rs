use std::collections::HashSet;

use strsim::normalized_levenshtein;

use super::normalize::normalize;

/// Weight applied to the token-overlap ratio before it competes with the
/// sequence ratio: shared words are strong evidence but not proof.
const TOKEN_OVERLAP_WEIGHT: f64 = 0.9;

/// Floor applied when the abbreviation heuristic fires ("Man" for
/// "Manchester", "PSG" for "Paris Saint-Germain").
const ABBREVIATION_SCORE: f64 = 0.8;

/// Similarity between two participant names in [0, 1].
///
/// The score is the maximum of three signals over the normalized forms:
/// an edit-distance ratio, a weighted token-overlap ratio, and an
/// abbreviation/initialism floor. Either side normalizing to empty gives 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let norm_a = normalize(a);
    let norm_b = normalize(b);
    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }

    let mut score = normalized_levenshtein(&norm_a, &norm_b);

    let tokens_a: HashSet<&str> = norm_a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = norm_b.split_whitespace().collect();
    let common = tokens_a.intersection(&tokens_b).count();
    if common > 0 {
        let overlap = common as f64 / tokens_a.len().max(tokens_b.len()) as f64;
        score = score.max(overlap * TOKEN_OVERLAP_WEIGHT);
    }

    if is_abbreviation(&norm_a, &norm_b) {
        score = score.max(ABBREVIATION_SCORE);
    }

    score.clamp(0.0, 1.0)
}

/// First letters of each word, e.g. "paris saint germain" -> "psg".
fn initials(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Detect abbreviated renderings: one name's initials embedded in the
/// other, or one name contained in the other once spaces are removed
/// ("man" in "manchester"). Single-letter initials are ignored; they match
/// almost anything.
fn is_abbreviation(norm_a: &str, norm_b: &str) -> bool {
    let initials_a = initials(norm_a);
    let initials_b = initials(norm_b);
    let compact_a: String = norm_a.split_whitespace().collect();
    let compact_b: String = norm_b.split_whitespace().collect();

    (initials_a.chars().count() >= 2 && norm_b.contains(&initials_a))
        || (initials_b.chars().count() >= 2 && norm_a.contains(&initials_b))
        || compact_a.contains(&compact_b)
        || compact_b.contains(&compact_a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_is_one() {
        for name in ["Barcelona", "Novak Djokovic", "Wisla Plock"] {
            assert_relative_eq!(similarity(name, name), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("Manchester City", "Man City"),
            ("Paris Saint-Germain", "PSG"),
            ("Barcelona", "Bayern"),
        ];
        for (a, b) in pairs {
            assert_relative_eq!(similarity(a, b), similarity(b, a), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_abbreviated_club_name() {
        assert!(similarity("Manchester City", "Man City") >= 0.7);
        assert!(similarity("Paris Saint-Germain", "PSG") >= 0.7);
    }

    #[test]
    fn test_noise_prefix_is_ignored() {
        assert!(similarity("Barcelona", "FC Barcelona") >= 0.9);
        assert!(similarity("Real Madrid", "Real Madrid CF") >= 0.9);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        assert!(similarity("Liverpool", "Juventus") < 0.5);
        assert!(similarity("Wisla Plock", "THW Kiel") < 0.5);
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_relative_eq!(similarity("", "Barcelona"), 0.0, epsilon = 1e-9);
        assert_relative_eq!(similarity("FC", "Barcelona"), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_surname_only_rendering() {
        assert!(similarity("Novak Djokovic", "Djokovic") >= 0.7);
    }
}
