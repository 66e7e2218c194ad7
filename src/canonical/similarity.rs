/// Safely convert usize to f64 for ratio calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Classic edit distance: insert, delete and substitute each cost 1.
///
/// Operates on Unicode scalar values, not bytes.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Normalized similarity in [0, 1]: `1 - distance / max(len(a), len(b))`.
///
/// Comparison is case-insensitive. Two empty strings are identical (1.0).
///
/// # Examples
///
/// ```
/// use credmatch::canonical::similarity::similarity;
///
/// assert!((similarity("RN", "rn") - 1.0).abs() < f64::EPSILON);
/// assert!(similarity("RN", "LPN") < 0.34);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - count_to_f64(levenshtein_distance(&a, &b)) / count_to_f64(max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("RN", "LPN"), 2);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn test_similarity_below_threshold() {
        // 1 - 2/3
        let s = similarity("RN", "LPN");
        assert!((s - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_case_insensitive() {
        assert!((similarity("Registered Nurse", "REGISTERED NURSE") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_empty_strings() {
        assert!((similarity("", "") - 1.0).abs() < 1e-9);
        assert!(similarity("", "abc").abs() < 1e-9);
    }

    #[test]
    fn test_similarity_one_typo() {
        // "registerd nurse" is one deletion away from 16 characters
        let s = similarity("Registerd Nurse", "Registered Nurse");
        assert!((s - (1.0 - 1.0 / 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_counts_characters_not_bytes() {
        // One substitution over a 4-character string, even with multi-byte characters
        let s = similarity("café", "cafe");
        assert!((s - 0.75).abs() < 1e-9);
    }
}
