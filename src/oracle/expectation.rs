//! Memoized exact expectation of ordered item bundles.
//!
//! `expected_value` answers: if the acting player runs this ordered bundle
//! of item uses and then fires, what is the expected damage-weighted
//! probability that the shot lands live? The recursion mirrors how each
//! item reshapes the remaining multiset:
//!
//! - empty bundle: the baseline `live / total`;
//! - magnifying glass: certainty-weighted split — a revealed live shell
//!   continues at full certainty, a revealed blank is implicitly skipped;
//! - beer: probability-weighted split over which shell got ejected;
//! - saw: doubles the scalar of the rest;
//! - handcuffs: passes through unchanged — the extra shot it buys is
//!   scored by the enumeration layer, not folded into this scalar.
//!
//! Candidate bundles share subsequences combinatorially, so results are
//! memoized on `(bundle, live, total)`.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::bundle::Bundle;
use crate::core::ItemKind;

/// Exact probability calculator over the hidden shell sequence.
#[derive(Debug, Default)]
pub struct ShellOracle {
    memo: FxHashMap<(Bundle, u8, u8), f64>,
}

impl ShellOracle {
    /// Fresh oracle with an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected value of running `bundle` then firing, over `total` shells
    /// of which `live` are live.
    pub fn expected_value(&mut self, bundle: &[ItemKind], live: u8, total: u8) -> f64 {
        if live == 0 || total == 0 {
            return 0.0;
        }

        let key = (SmallVec::from_slice(bundle), live, total);
        if let Some(&cached) = self.memo.get(&key) {
            return cached;
        }

        let value = match bundle.split_first() {
            None => live as f64 / total as f64,
            Some((&ItemKind::MagnifyingGlass, rest)) => {
                // A revealed live shell continues at full certainty; a
                // revealed blank is skipped from the remaining multiset.
                let certain = self.expected_value(rest, 1, 1);
                if live < total {
                    let p = live as f64 / total as f64;
                    p * certain + (1.0 - p) * self.expected_value(rest, live, total - 1)
                } else {
                    certain
                }
            }
            Some((&ItemKind::Beer, rest)) => {
                let ejected_live = self.expected_value(rest, live - 1, total - 1);
                if live < total {
                    let p = live as f64 / total as f64;
                    p * ejected_live + (1.0 - p) * self.expected_value(rest, live, total - 1)
                } else {
                    ejected_live
                }
            }
            Some((&ItemKind::Saw, rest)) => 2.0 * self.expected_value(rest, live, total),
            Some((&ItemKind::Handcuffs, rest)) => self.expected_value(rest, live, total),
            // Kinds outside the shot-shaping set do not alter the scalar.
            Some((_, rest)) => self.expected_value(rest, live, total),
        };

        self.memo.insert(key, value);
        value
    }

    /// Number of memoized entries (diagnostics).
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}
