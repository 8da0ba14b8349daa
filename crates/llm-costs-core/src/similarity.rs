//! Fuzzy string scoring for model-name lookup.
//!
//! One named capability, [`similarity`], hides the scoring technique from
//! the resolver: threshold and tie-break logic over there must not care
//! how the score is produced.

/// Partial-ratio similarity between two strings, 0..=100.
///
/// The shorter string is slid across every equal-length window of the
/// longer one and the best Levenshtein-derived ratio wins, so a query
/// that equals any substring of a candidate scores a full 100. Callers
/// are responsible for case-folding; the score itself is case-sensitive.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    let n = short.len();
    let mut best = 0u8;
    for start in 0..=(long.len() - n) {
        let window = &long[start..start + n];
        let dist = levenshtein(short, window);
        let score = (((2 * n - dist) as f64 / (2 * n) as f64) * 100.0).round() as u8;
        if score > best {
            best = score;
        }
        if best == 100 {
            break;
        }
    }
    best
}

/// Classic two-row edit distance over char slices.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(ca != cb);
            curr[j + 1] = sub.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity("jurassic-2 ultra", "jurassic-2 ultra"), 100);
    }

    #[test]
    fn exact_substring_scores_100() {
        // The whole point of partial-ratio: a query buried in a longer
        // candidate (or vice versa) still counts as a perfect hit.
        assert_eq!(similarity("jurassic-2 ultra", "jurassic-2 ultra (v1)"), 100);
        assert_eq!(
            similarity("100 input tokens for jurassic-2 ultra", "jurassic-2 ultra"),
            100
        );
    }

    #[test]
    fn single_typo_stays_high() {
        let score = similarity("jurrasic-2 ultra", "jurassic-2 ultra");
        assert!(score > 80, "one transposition should stay high, got {score}");
    }

    #[test]
    fn unrelated_strings_score_low() {
        let score = similarity("claude 3 haiku", "jurassic-2 ultra");
        assert!(score <= 70, "unrelated names must fall below threshold, got {score}");
    }

    #[test]
    fn symmetric_in_its_arguments() {
        assert_eq!(
            similarity("titan text", "amazon titan text express"),
            similarity("amazon titan text express", "titan text"),
        );
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(similarity("", ""), 100);
        assert_eq!(similarity("", "jurassic"), 0);
        assert_eq!(similarity("jurassic", ""), 0);
    }

    #[test]
    fn edit_distance_basics() {
        let c = |s: &str| s.chars().collect::<Vec<char>>();
        assert_eq!(levenshtein(&c("kitten"), &c("sitting")), 3);
        assert_eq!(levenshtein(&c("abc"), &c("abc")), 0);
        assert_eq!(levenshtein(&c(""), &c("abc")), 3);
    }
}
