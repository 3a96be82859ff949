//! Fuzzy string scores on a 0–100 scale.
//!
//! [`ratio`] is the normalised indel similarity `200 · LCS / (|a| + |b|)`.
//! [`partial_ratio`] slides the shorter string across the longer one and
//! keeps the best window score, so a keyword buried in a long sentence still
//! scores high. Both operate on Unicode scalar values, not bytes.
//!
//! Needles of up to 64 characters use a bit-parallel LCS, which makes each
//! window linear in its length. Longer needles use the two-row DP.

/// Normalised indel similarity of two strings.
///
/// Two empty strings are identical (100); one empty string scores 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best [`ratio`] of the shorter string against any same-length window of
/// the longer one, including windows clipped at either edge.
///
/// Returns 100 when the shorter string occurs literally and 0 when either
/// side is empty.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (needle, hay) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let n = needle.len();
    if n == 0 {
        return 0.0;
    }
    if hay.windows(n).any(|w| w == needle.as_slice()) {
        return 100.0;
    }

    // Windows anchored on a character the needle lacks are skipped.
    let in_needle = |c: &char| needle.contains(c);
    let pattern = BitPattern::new(needle);
    let score = |window: &[char]| match &pattern {
        Some(p) => indel_score(n, window.len(), p.lcs_len(window)),
        None => ratio_chars(needle, window),
    };
    let mut best = 0.0_f64;

    for end in 1..n {
        if in_needle(&hay[end - 1]) {
            best = best.max(score(&hay[..end]));
        }
    }
    for start in 0..=hay.len() - n {
        if in_needle(&hay[start]) {
            best = best.max(score(&hay[start..start + n]));
        }
    }
    for start in hay.len() - n + 1..hay.len() {
        if in_needle(&hay[start]) {
            best = best.max(score(&hay[start..]));
        }
    }
    best
}

fn indel_score(a_len: usize, b_len: usize, lcs: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs as f64 / total as f64
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let lcs = match BitPattern::new(a) {
        Some(p) => p.lcs_len(b),
        None => lcs_len(a, b),
    };
    indel_score(a.len(), b.len(), lcs)
}

/// Per-character position masks of a pattern of at most 64 characters.
struct BitPattern {
    len: usize,
    masks: Vec<(char, u64)>,
}

impl BitPattern {
    fn new(pattern: &[char]) -> Option<Self> {
        if pattern.is_empty() || pattern.len() > 64 {
            return None;
        }
        let mut masks: Vec<(char, u64)> = Vec::new();
        for (i, &c) in pattern.iter().enumerate() {
            match masks.iter_mut().find(|(mc, _)| *mc == c) {
                Some((_, m)) => *m |= 1 << i,
                None => masks.push((c, 1 << i)),
            }
        }
        Some(Self {
            len: pattern.len(),
            masks,
        })
    }

    fn mask(&self, c: char) -> u64 {
        self.masks
            .iter()
            .find(|(mc, _)| *mc == c)
            .map_or(0, |(_, m)| *m)
    }

    /// LCS length against `text` (Hyyrö's bit-vector recurrence).
    fn lcs_len(&self, text: &[char]) -> usize {
        let mut v = u64::MAX;
        for &c in text {
            let u = v & self.mask(c);
            v = v.wrapping_add(u) | v.wrapping_sub(u);
        }
        let low = if self.len == 64 {
            u64::MAX
        } else {
            (1u64 << self.len) - 1
        };
        (!v & low).count_ones() as usize
    }
}

/// Longest common subsequence length, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
