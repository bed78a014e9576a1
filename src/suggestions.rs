//! "Did you mean?" matching for mistyped command names.
//!
//! Scores candidates with the Ratcliff/Obershelp similarity ratio
//! (`2 * matches / total_len`).

/// Similarity in `0.0..=1.0`. Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common run inside the window; ties go to the earliest run in `a`, then `b`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];

    for i in alo..ahi {
        let mut row = vec![0usize; width + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                row[j - blo + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = row;
    }

    best
}

/// Up to `n` candidates scoring at least `cutoff`, best first.
pub fn close_matches<'a>(word: &str, candidates: &[&'a str], n: usize, cutoff: f64) -> Vec<&'a str> {
    let mut scored: Vec<(f64, &'a str)> = candidates
        .iter()
        .map(|&candidate| (similarity_ratio(word, candidate), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|x, y| y.0.total_cmp(&x.0).then_with(|| y.1.cmp(x.1)));
    scored.into_iter().take(n).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert_eq!(similarity_ratio("ping", "ping"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_ratio_partial_overlap() {
        assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((similarity_ratio("hangmn", "hangman") - 12.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_close_matches_orders_by_score() {
        let commands = ["help", "ping", "hangman", "hug", "kick"];
        assert_eq!(close_matches("hangmn", &commands, 3, 0.6), vec!["hangman"]);
        assert_eq!(close_matches("pong", &commands, 3, 0.6), vec!["ping"]);
        assert!(close_matches("zzzz", &commands, 3, 0.6).is_empty());
    }

    #[test]
    fn test_close_matches_limits_results() {
        let commands = ["bonk", "bonks", "bonked", "bonker"];
        assert_eq!(close_matches("bonk", &commands, 2, 0.6).len(), 2);
        assert_eq!(close_matches("bonk", &commands, 2, 0.6)[0], "bonk");
    }
}
