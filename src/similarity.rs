//! Fuzzy string similarity scores in the 0..=100 range

/// Length of the longest common subsequence of two char slices
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Normalized indel similarity of two strings
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b).round() as u8
}

/// Best `ratio` of the shorter string against any equally long window of the longer one.
///
/// Symmetric, and 100 whenever the shorter string is a substring of the
/// longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        let score = ratio_chars(&short, window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert_eq!(ratio("milk", "milk"), 100);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", ""), 100);
    }

    #[test]
    fn test_ratio_partial_overlap() {
        // LCS("kitten", "sitting") = 4 ("ittn"), 2*4/13
        assert_eq!(ratio("kitten", "sitting"), 62);
    }

    #[test]
    fn test_partial_ratio_substring() {
        assert_eq!(partial_ratio("Bananas", "Organic Bananas"), 100);
        assert_eq!(partial_ratio("Organic Bananas", "Bananas"), 100);
    }

    #[test]
    fn test_partial_ratio_unrelated_is_low() {
        assert!(partial_ratio("Bananas", "Whole Milk") < 50);
    }

    #[test]
    fn test_partial_ratio_empty() {
        assert_eq!(partial_ratio("", ""), 100);
        assert_eq!(partial_ratio("", "Milk"), 0);
    }

    #[test]
    fn test_partial_ratio_typo() {
        let score = partial_ratio("Banana", "Organic Bannana Bunch");
        assert!(score >= 80, "score was {score}");
    }
}
