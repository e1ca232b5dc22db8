/// String-similarity backend used by the fuzzy keyword tier.
pub trait FuzzyMatcher: Send + Sync + std::fmt::Debug {
    /// Similarity of two lowercased strings on a 0-100 scale.
    fn ratio(&self, left: &str, right: &str) -> f64;

    /// `false` means the fuzzy tier is unavailable and callers match exactly instead.
    fn supports_fuzzy(&self) -> bool {
        true
    }
}

/// Normalized indel similarity: `200 * lcs / (len_left + len_right)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl FuzzyMatcher for IndelRatio {
    fn ratio(&self, left: &str, right: &str) -> f64 {
        indel_ratio(left, right)
    }
}

/// Stand-in backend when fuzzy matching is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactOnly;

impl FuzzyMatcher for ExactOnly {
    fn ratio(&self, _left: &str, _right: &str) -> f64 {
        0.0
    }

    fn supports_fuzzy(&self) -> bool {
        false
    }
}

/// Character-level indel ratio in `[0, 100]`; two empty strings are identical.
pub fn indel_ratio(left: &str, right: &str) -> f64 {
    let a: Vec<char> = left.chars().collect();
    let b: Vec<char> = right.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let lcs = lcs_len(&a, &b);
    200.0 * lcs as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Two rolling rows over the shorter input.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; inner.len() + 1];
    let mut curr = vec![0usize; inner.len() + 1];

    for &oc in outer {
        for (j, &ic) in inner.iter().enumerate() {
            curr[j + 1] = if oc == ic {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[inner.len()]
}
