//! # Statistics
//!
//! Pair-frequency bookkeeping: a map from [`Pair`] to [`PairEntry`] (global
//! count plus the reverse index of tokens containing it), and the
//! adaptive-threshold search set used to find the current maximum pair
//! without scanning the whole map.

use std::collections::BTreeSet;

use compact_str::CompactString;

use crate::types::{CommonHashMap, Pair};
use crate::vocab::Vocabulary;

/// Target size for the search set. Tuned constant: smaller is cheaper to
/// scan per `max_pair` call, larger means fewer full-map rebuilds.
pub const SEARCH_SET_TARGET: usize = 100;

/// Per-pair bookkeeping: global frequency, the tokens currently
/// contributing to it, and whether it is in the search set.
///
/// Invariant in normal operation: `freq == sum(per_token.values())` and
/// every value in `per_token` is `> 0`. A run of three or more identical
/// merged symbols can leave one entry with a negative residual (see
/// [`Vocabulary::replace_pair`]); such an entry never reaches the
/// threshold and is never selected by [`Statistics::max_pair`].
#[derive(Debug, Clone, Default)]
pub struct PairEntry {
    /// Sum over all tokens of (weight x adjacent occurrences) for this pair.
    pub freq: i64,
    /// Per-token contribution to `freq`. Entries are removed once their
    /// value reaches zero.
    pub per_token: CommonHashMap<CompactString, i64>,
    /// Whether this pair is currently held in the search set.
    pub in_search_set: bool,
}

impl PairEntry {
    fn new() -> Self {
        Self::default()
    }
}

/// Pair-frequency statistics over a [`Vocabulary`]: the full pair map plus
/// the adaptive search set used to answer "what is the current maximum
/// pair" cheaply.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pairs: CommonHashMap<Pair, PairEntry>,
    // `BTreeSet`, not a hash set: `max_pair`'s early exit returns the
    // first entry reaching the frequency bound, so an ascending key
    // order makes that the deterministic lexicographically-smallest
    // pair among any ties rather than an arbitrary hash-bucket order.
    search_set: BTreeSet<Pair>,
    threshold: Option<i64>,
    max_freq: i64,
    adaptation_parameter: i32,
}

impl Statistics {
    /// An empty, unseeded statistics table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build statistics from scratch by scanning every word's symbol
    /// sequence, then seed the threshold from the observed maximum
    /// frequency and build the initial search set.
    pub fn from_vocabulary(vocab: &Vocabulary) -> Self {
        let mut stats = Statistics::new();

        for (token, word) in vocab.iter() {
            if word.weight == 0 || word.symbols.len() < 2 {
                continue;
            }
            let weight = word.weight as i64;
            for window in word.symbols.windows(2) {
                let pair = (window[0].clone(), window[1].clone());
                let entry = stats.pairs.entry(pair).or_insert_with(PairEntry::new);
                *entry.per_token.entry(CompactString::new(token)).or_insert(0) += weight;
                entry.freq += weight;
                if entry.freq > stats.max_freq {
                    stats.max_freq = entry.freq;
                }
            }
        }

        stats.set_threshold(Some(stats.max_freq));
        stats.build_search_set();
        stats
    }

    /// Number of distinct pairs currently tracked.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the pair map is empty (every word has collapsed to a
    /// single symbol).
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Look up a pair's entry.
    pub fn get(&self, pair: &Pair) -> Option<&PairEntry> {
        self.pairs.get(pair)
    }

    /// Current search set contents, in ascending pair order.
    pub fn search_set(&self) -> &BTreeSet<Pair> {
        &self.search_set
    }

    /// Current threshold, if one has been set.
    pub fn threshold(&self) -> Option<i64> {
        self.threshold
    }

    /// Current adaptation parameter.
    pub fn adaptation_parameter(&self) -> i32 {
        self.adaptation_parameter
    }

    /// Whether `pair` is absent from the pair map.
    pub fn missing(&self, pair: &Pair) -> bool {
        !self.pairs.contains_key(pair)
    }

    /// Remove a pair entirely: from the pair map and, if present, from
    /// the search set. Used by the trainer to explicitly retire the pair
    /// it just merged, rather than relying on delta bookkeeping to zero
    /// it out.
    pub fn remove_pair(&mut self, pair: &Pair) {
        if let Some(entry) = self.pairs.remove(pair) {
            debug_assert_eq!(
                entry.in_search_set,
                self.search_set.contains(pair),
                "search_set membership diverged from in_search_set flag for {pair:?}"
            );
            if entry.in_search_set {
                self.search_set.remove(pair);
            }
        }
    }

    /// Set a new frequency threshold.
    ///
    /// `reduction = 1 + 2^adaptation_parameter` (computed in `f64` so a
    /// negative `adaptation_parameter` yields a fractional reduction);
    /// `threshold = min(ceil(prev / reduction), prev - 1)`, guaranteeing a
    /// strict decrease. `seed`, when given (the initial build from a
    /// fresh vocabulary), is used as `prev` in place of the stored
    /// threshold.
    pub fn set_threshold(&mut self, seed: Option<i64>) {
        let prev = seed
            .or(self.threshold)
            .expect("threshold must be seeded before its first unseeded update");
        let reduction = 1.0 + 2f64.powi(self.adaptation_parameter);
        let candidate = (prev as f64 / reduction).ceil() as i64;
        self.threshold = Some(candidate.min(prev - 1));
    }

    /// Scan the whole pair map and insert every entry meeting the current
    /// threshold into the search set, then adapt `adaptation_parameter`
    /// toward the target search-set size (asymmetric: +1 when too small,
    /// -2 when too large, since an oversized search set is quadratically
    /// more expensive to scan than an undersized one is to rebuild from).
    pub fn build_search_set(&mut self) {
        let threshold = self
            .threshold
            .expect("threshold must be set before building the search set");

        for (pair, entry) in self.pairs.iter_mut() {
            if entry.freq >= threshold && !entry.in_search_set {
                entry.in_search_set = true;
                self.search_set.insert(pair.clone());
            }
        }

        debug_assert!(
            self.pairs.iter().all(|(p, e)| e.in_search_set == self.search_set.contains(p)),
            "search_set membership diverged from in_search_set flags after rebuild"
        );
        debug_assert!(
            self.pairs.iter().all(|(_, e)| e.freq < threshold || e.in_search_set),
            "an entry meeting the threshold was left out of the search set"
        );

        let size = self.search_set.len();
        if size < SEARCH_SET_TARGET {
            self.adaptation_parameter += 1;
        } else if size > SEARCH_SET_TARGET {
            self.adaptation_parameter -= 2;
        }
        log::debug!(
            "search set rebuilt: size={size} threshold={threshold} adaptation_parameter={}",
            self.adaptation_parameter
        );
    }

    /// Apply the nested `Pair -> token -> delta` map produced by
    /// [`Vocabulary::replace_pair`]: for each pair, fold its token deltas
    /// into the entry's `per_token` map and `freq`, then update search-set
    /// membership against the current threshold, creating or deleting the
    /// entry as needed.
    pub fn apply_bigram_updates(&mut self, deltas: CommonHashMap<Pair, CommonHashMap<CompactString, i64>>) {
        let threshold = self.threshold.unwrap_or(i64::MAX);

        for (pair, token_deltas) in deltas {
            let (freq, was_in_search_set, now_in_search_set) = {
                let entry = self.pairs.entry(pair.clone()).or_insert_with(PairEntry::new);
                for (token, delta) in token_deltas {
                    if delta == 0 {
                        continue;
                    }
                    let slot = entry.per_token.entry(token).or_insert(0);
                    *slot += delta;
                    entry.freq += delta;
                }
                entry.per_token.retain(|_, v| *v != 0);

                debug_assert_eq!(
                    entry.freq,
                    entry.per_token.values().sum::<i64>(),
                    "freq diverged from per_token sum for {pair:?}"
                );

                let was = entry.in_search_set;
                let now = entry.freq >= threshold;
                entry.in_search_set = now;
                (entry.freq, was, now)
            };

            match (was_in_search_set, now_in_search_set) {
                (false, true) => {
                    self.search_set.insert(pair.clone());
                }
                (true, false) => {
                    self.search_set.remove(&pair);
                }
                _ => {}
            }

            if freq == 0 {
                self.pairs.remove(&pair);
                self.search_set.remove(&pair);
            } else {
                debug_assert_eq!(
                    now_in_search_set,
                    self.search_set.contains(&pair),
                    "search_set membership diverged from in_search_set flag for {pair:?}"
                );
            }
        }
    }

    /// Find the current maximum-frequency pair.
    ///
    /// `None` if the pair map is empty. If the search set is empty, the
    /// threshold is lowered and the search set rebuilt before recursing.
    /// Otherwise, linear-scans the search set in ascending order, exiting
    /// early once the running best matches the previous round's
    /// `max_freq` (the new maximum can never exceed the old one, so that
    /// pair cannot be beaten). Ties are broken toward the
    /// lexicographically smallest pair, since the scan only replaces
    /// `best` on a strict improvement and visits pairs in ascending
    /// order.
    pub fn max_pair(&mut self) -> Option<Pair> {
        if self.pairs.is_empty() {
            return None;
        }

        if self.search_set.is_empty() {
            self.set_threshold(None);
            self.build_search_set();
            return self.max_pair();
        }

        let mut best: Option<(&Pair, i64)> = None;
        for pair in self.search_set.iter() {
            let freq = self.pairs.get(pair).expect("search set entries exist in pairs").freq;
            let is_new_best = match best {
                None => true,
                Some((_, best_freq)) => freq > best_freq,
            };
            if is_new_best {
                best = Some((pair, freq));
            }
            if let Some((_, best_freq)) = best
                && best_freq == self.max_freq
            {
                break;
            }
        }

        let (pair, freq) = best.expect("search set is non-empty");
        let pair = pair.clone();
        self.max_freq = freq;
        Some(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build(corpus: &str) -> (Vocabulary, Statistics) {
        let mut vocab = Vocabulary::new();
        vocab.ingest_text(Cursor::new(corpus)).unwrap();
        let stats = Statistics::from_vocabulary(&vocab);
        (vocab, stats)
    }

    #[test]
    fn test_from_vocabulary_counts_weighted_pairs() {
        let (_, stats) = build("low low\n");
        // "LOW_" -> pairs (L,O) (O,W) (W,_), each weight 2.
        let pair = (CompactString::new("L"), CompactString::new("O"));
        assert_eq!(stats.get(&pair).unwrap().freq, 2);
    }

    #[test]
    fn test_set_threshold_strictly_decreasing() {
        let mut stats = Statistics::new();
        stats.set_threshold(Some(100));
        let first = stats.threshold().unwrap();
        assert!(first < 100);
        stats.set_threshold(None);
        let second = stats.threshold().unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_max_pair_none_when_empty() {
        let mut stats = Statistics::new();
        assert_eq!(stats.max_pair(), None);
    }

    #[test]
    fn test_max_pair_returns_highest_frequency() {
        let (_, mut stats) = build("low low low low low lower lower newest newest newest newest newest newest widest widest widest\n");
        let top = stats.max_pair().unwrap();
        let entry = stats.get(&top).unwrap();
        assert_eq!(entry.freq, 9);
    }

    #[test]
    fn test_remove_pair_drops_from_search_set() {
        let (_, mut stats) = build("low low\n");
        let pair = (CompactString::new("L"), CompactString::new("O"));
        assert!(stats.get(&pair).unwrap().in_search_set);
        stats.remove_pair(&pair);
        assert!(stats.get(&pair).is_none());
        assert!(!stats.search_set().contains(&pair));
    }

    #[test]
    fn test_apply_bigram_updates_creates_and_deletes() {
        let mut stats = Statistics::new();
        stats.set_threshold(Some(10));
        stats.build_search_set();

        let pair = (CompactString::new("A"), CompactString::new("B"));
        let mut deltas = CommonHashMap::new();
        let mut token_deltas = CommonHashMap::new();
        token_deltas.insert(CompactString::new("AB"), 5i64);
        deltas.insert(pair.clone(), token_deltas);
        stats.apply_bigram_updates(deltas);
        assert_eq!(stats.get(&pair).unwrap().freq, 5);

        let mut deltas = CommonHashMap::new();
        let mut token_deltas = CommonHashMap::new();
        token_deltas.insert(CompactString::new("AB"), -5i64);
        deltas.insert(pair.clone(), token_deltas);
        stats.apply_bigram_updates(deltas);
        assert!(stats.get(&pair).is_none());
    }
}
