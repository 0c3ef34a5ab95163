//! Exact hypergeometric probabilities over the hidden shell sequence.
//!
//! Drawing shells is sampling without replacement from a finite two-class
//! population, so every "how many lives in the next n draws" question is a
//! hypergeometric PMF. Populations are tiny (<= 8 shells), so binomials are
//! computed exactly in integer arithmetic before the final division.

/// Binomial coefficient `C(n, k)` as an exact integer.
#[must_use]
pub fn binomial(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 1..=k {
        // Multiply before dividing: the running product of i consecutive
        // ratios is always integral.
        acc = acc * (n - k + i) as u128 / i as u128;
    }
    acc
}

/// Probability of drawing exactly `hits` live shells in `draws` draws
/// without replacement from `total` shells containing `live` live ones.
///
/// Returns 0 for combinatorially impossible requests (`draws > total`,
/// more hits than lives, more misses than blanks).
#[must_use]
pub fn hypergeometric_pmf(total: u8, live: u8, draws: u8, hits: u8) -> f64 {
    if draws > total || hits > draws || hits > live || draws - hits > total - live {
        return 0.0;
    }
    let ways = binomial(live as u64, hits as u64)
        * binomial((total - live) as u64, (draws - hits) as u64);
    ways as f64 / binomial(total as u64, draws as u64) as f64
}

/// As [`hypergeometric_pmf`], conditioned on a known front shell.
///
/// A known front is peeled off deterministically (it is the first draw),
/// then the unconditioned PMF applies to the remainder. `known_front =
/// None` falls through to the plain PMF.
#[must_use]
pub fn conditioned_draw_pmf(
    total: u8,
    live: u8,
    known_front: Option<bool>,
    draws: u8,
    hits: u8,
) -> f64 {
    match known_front {
        None => hypergeometric_pmf(total, live, draws, hits),
        Some(front) => {
            if draws == 0 {
                return if hits == 0 { 1.0 } else { 0.0 };
            }
            if total == 0 {
                return 0.0;
            }
            if front {
                if live == 0 || hits == 0 {
                    return 0.0;
                }
                hypergeometric_pmf(total - 1, live - 1, draws - 1, hits - 1)
            } else {
                if live == total {
                    return 0.0;
                }
                hypergeometric_pmf(total - 1, live, draws - 1, hits)
            }
        }
    }
}
