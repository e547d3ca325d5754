// 🔤 String Similarity - fuzzy fallback for metric names
// Ratio = 2 × LCS / (len(a) + len(b)), in [0.0, 1.0]

/// Length of the longest common subsequence of two strings (by char)
fn lcs_length(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 || len2 == 0 {
        return 0;
    }

    let mut matrix = vec![vec![0usize; len2 + 1]; len1 + 1];

    for i in 1..=len1 {
        for j in 1..=len2 {
            matrix[i][j] = if s1_chars[i - 1] == s2_chars[j - 1] {
                matrix[i - 1][j - 1] + 1
            } else {
                matrix[i - 1][j].max(matrix[i][j - 1])
            };
        }
    }

    matrix[len1][len2]
}

/// Case-insensitive similarity ratio between two strings
pub fn similarity_ratio(s1: &str, s2: &str) -> f64 {
    let a = s1.trim().to_lowercase();
    let b = s2.trim().to_lowercase();
    let total = a.chars().count() + b.chars().count();

    if total == 0 {
        return 1.0;
    }

    2.0 * lcs_length(&a, &b) as f64 / total as f64
}

/// Best candidate whose ratio against `input` reaches `cutoff`
///
/// Ties go to the earlier candidate.
pub fn closest_match<'a, T, F>(input: &str, candidates: &'a [T], cutoff: f64, name: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    let mut best: Option<(&T, f64)> = None;

    for candidate in candidates {
        let score = similarity_ratio(input, name(candidate));
        if score < cutoff {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(candidate, _)| candidate)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 5] = [
        "Total Revenue",
        "Net Income",
        "Total Assets",
        "Total Liabilities",
        "Cash Flow",
    ];

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("Net Income", "net income"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity_ratio("xyz", "abc"), 0.0);
        assert_eq!(similarity_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_lcs_ratio() {
        // LCS("abcd", "abed") = "abd"
        assert!((similarity_ratio("abcd", "abed") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_closest_match_typo() {
        let found = closest_match("net incme", &NAMES, 0.6, |n| *n);
        assert_eq!(found, Some(&"Net Income"));
    }

    #[test]
    fn test_closest_match_partial_name() {
        let found = closest_match("tesla revenue", &NAMES, 0.6, |n| *n);
        assert_eq!(found, Some(&"Total Revenue"));

        let found = closest_match("apple 2023 liabilities", &NAMES, 0.6, |n| *n);
        assert_eq!(found, Some(&"Total Liabilities"));
    }

    #[test]
    fn test_closest_match_below_cutoff() {
        assert_eq!(closest_match("apple xyz", &NAMES, 0.6, |n| *n), None);
    }
}
