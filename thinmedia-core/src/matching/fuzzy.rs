//! Normalized similarity scoring for title matching.
//!
//! The score is the Indel similarity: `2 * LCS / (len(a) + len(b)) * 100`,
//! where LCS is the longest common subsequence measured in characters. Equal
//! strings score 100, strings with nothing in common score 0. Comparison is
//! exact; callers lowercase both sides when they want case-insensitivity.

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Two rows over the shorter string
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev_row = vec![0usize; inner.len() + 1];
    let mut curr_row = vec![0usize; inner.len() + 1];

    for outer_char in outer {
        for (j, inner_char) in inner.iter().enumerate() {
            curr_row[j + 1] = if outer_char == inner_char {
                prev_row[j] + 1
            } else {
                prev_row[j + 1].max(curr_row[j])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[inner.len()]
}

/// Similarity of `a` and `b` in `0.0..=100.0`.
///
/// Two empty strings are considered identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100.0;
    }

    let common = lcs_len(&a_chars, &b_chars);
    (2 * common) as f64 / total as f64 * 100.0
}

/// [`ratio`] over lowercased inputs.
pub fn ratio_ignore_case(a: &str, b: &str) -> f64 {
    ratio(&a.to_lowercase(), &b.to_lowercase())
}
