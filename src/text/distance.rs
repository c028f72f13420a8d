//! Jaro-Winkler distance
//!
//! Lower is closer: 0.0 for identical strings, 1.0 when nothing matches.

/// Number of leading characters considered for the prefix bonus
const PREFIX_LEN: usize = 4;

/// Weight of each matching prefix character
const PREFIX_SCALE: f64 = 0.1;

/// Compute the Jaro-Winkler distance between two strings.
///
/// The longer string is always scanned first, so the result does not depend
/// on argument order when the lengths differ.
pub fn jaro_winkler_distance(a: &str, b: &str) -> f64 {
    let mut s1: Vec<char> = a.chars().collect();
    let mut s2: Vec<char> = b.chars().collect();
    if s1.len() < s2.len() {
        std::mem::swap(&mut s1, &mut s2);
    }

    let len1 = s1.len();
    let len2 = s2.len();

    if len2 == 0 {
        return if len1 == 0 { 0.0 } else { 1.0 };
    }

    let delta = (len1 / 2).max(1) - 1;
    let mut flagged = vec![false; len2];
    let mut s1_matches: Vec<char> = Vec::with_capacity(len1);

    for (idx1, &ch1) in s1.iter().enumerate() {
        let lo = idx1.saturating_sub(delta);
        let hi = (idx1 + delta + 1).min(len2);
        for idx2 in lo..hi {
            if !flagged[idx2] && s2[idx2] == ch1 {
                flagged[idx2] = true;
                s1_matches.push(ch1);
                break;
            }
        }
    }

    let matches = s1_matches.len();
    if matches == 0 {
        return 1.0;
    }

    let mut transpositions = 0usize;
    let mut next_match = 0usize;
    for (idx2, &ch2) in s2.iter().enumerate() {
        if flagged[idx2] {
            if ch2 != s1_matches[next_match] {
                transpositions += 1;
            }
            next_match += 1;
        }
    }

    let m = matches as f64;
    let jaro = (m / len1 as f64 + m / len2 as f64 + (m - transpositions as f64 / 2.0) / m) / 3.0;

    let prefix = (0..PREFIX_LEN.min(len2)).filter(|&i| s1[i] == s2[i]).count();

    1.0 - (jaro + prefix as f64 * PREFIX_SCALE * (1.0 - jaro))
}
