//! Edit distance and similarity scoring.

/// Compute the Levenshtein distance between two strings.
///
/// Insertions, deletions and substitutions each cost one edit. Distances are
/// counted in Unicode scalar values, not bytes. Only two rows of the dynamic
/// programming table are kept, each as long as the shorter input.
///
/// ```rust
/// use shelf_text::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("hello world", ""), 11);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    // Rows are sized by the shorter string.
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev_row: Vec<usize> = (0..=short.len()).collect();
    let mut curr_row = vec![0; short.len() + 1];
    for (i, long_char) in long.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, short_char) in short.iter().enumerate() {
            let cost = usize::from(long_char != short_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1) // deletion
                .min(curr_row[j] + 1) // insertion
                .min(prev_row[j] + cost); // substitution
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[short.len()]
}

/// Turn the edit distance between two strings into a score in `[0, 1]`.
///
/// The score is the share of the longer string that survives the edits:
/// `(len(long) - levenshtein(long, short)) / len(long)`. Identical non-empty
/// strings score `1`.
///
/// Two empty strings score `0`, not `1`. Nothing can be learned from
/// comparing two empty titles, and adapters rely on that never being
/// accepted as a match.
///
/// ```rust
/// use shelf_text::similarity;
///
/// assert_eq!(similarity("spike", "mike"), 0.6);
/// assert_eq!(similarity("", ""), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    let (long, short, long_len) = if a_len > b_len { (a, b, a_len) } else { (b, a, b_len) };
    if long_len == 0 {
        return 0.0;
    }
    (long_len - levenshtein(long, short)) as f64 / long_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "Hello World", 0)]
    #[case("abcd", "cdef", 4)]
    #[case("This should", "not match", 10)]
    #[case("short string", "longer string", 6)]
    #[case("hello world", "", 11)]
    #[case("", "hello world", 11)]
    #[case("", "", 0)]
    #[case("kitten", "sitting", 3)]
    #[case("mike", "spike", 2)]
    #[case("café", "cafe", 1)]
    fn test_levenshtein(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
        assert_eq!(levenshtein(b, a), expected);
    }

    #[rstest]
    #[case("Hello World")]
    #[case("a")]
    #[case("ナルト")]
    fn test_similarity_identical(#[case] value: &str) {
        assert_eq!(similarity(value, value), 1.0);
    }

    #[test]
    fn test_similarity_both_empty_is_zero() {
        assert_eq!(similarity("", ""), 0.0);
    }

    #[rstest]
    #[case("spike", "mike", 0.6)]
    #[case("mike", "spike", 0.6)]
    #[case("abc", "", 0.0)]
    #[case("abcd", "cdef", 0.0)]
    #[case("e", "mike", 0.25)]
    fn test_similarity(#[case] a: &str, #[case] b: &str, #[case] expected: f64) {
        assert!((similarity(a, b) - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("one piece", "one-piece")]
    #[case("x", "yyyyyyyy")]
    #[case("berserk", "bezerk")]
    fn test_similarity_in_range(#[case] a: &str, #[case] b: &str) {
        let score = similarity(a, b);
        assert!((0.0..=1.0).contains(&score));
    }
}
