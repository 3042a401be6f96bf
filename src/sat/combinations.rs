//! k-subsets of a 1-based index range, used for cardinality clauses

use itertools::Itertools;

/// All size-`k` subsets of `{1..=n}` as ascending tuples, in lexicographic order.
///
/// `k > n` yields nothing; `k == 0` yields a single empty tuple.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    (1..=n).combinations(k).collect()
}

/// Binomial coefficient C(n, k)
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
