//! # Vocabulary
//!
//! The weighted token table: one [`Word`] per distinct token, keyed by the
//! token string, plus the alphabet of single-character symbols seen across
//! all tokens.

use std::io::{BufRead, Write};

use compact_str::CompactString;

use crate::errors::{BpeError, BpeResult};
use crate::types::{CommonHashMap, CommonHashSet, Pair, Symbol, TERMINAL_MARKER};

/// Normalize a line the way every textual ingestion path in this crate
/// does: uppercase, then replace every character outside `[A-Z']` with a
/// single space.
pub fn normalize_line(line: &str) -> String {
    line.chars()
        .map(|c| c.to_ascii_uppercase())
        .map(|c| if c == '\'' || c.is_ascii_uppercase() { c } else { ' ' })
        .collect()
}

/// Uppercase a line without otherwise touching it. Used for vocabulary-file
/// ingestion, where the weight field's digits must survive (unlike
/// [`normalize_line`]'s `[^A-Z']` -> space scrub, which is only correct for
/// free-text ingestion).
fn uppercase_ascii(line: &str) -> String {
    line.chars().map(|c| c.to_ascii_uppercase()).collect()
}

/// A whole-token word: its weight (occurrence count) and its current,
/// mutable subword segmentation.
///
/// Invariant: the concatenation of `symbols` equals the owning token
/// string followed by [`TERMINAL_MARKER`]. The token string itself is not
/// duplicated here; it lives as the [`Vocabulary`] map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Number of occurrences of this token in the source corpus.
    pub weight: u64,
    /// Current ordered subword segmentation.
    pub symbols: Vec<Symbol>,
}

impl Word {
    fn from_token(token: &str) -> Self {
        Word {
            weight: 0,
            symbols: initial_symbols(token),
        }
    }
}

fn initial_symbols(token: &str) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = token.chars().map(|c| CompactString::new(c.to_string())).collect();
    symbols.push(CompactString::new(TERMINAL_MARKER.to_string()));
    symbols
}

/// Mapping from token-string to [`Word`], plus the set of single-character
/// symbols seen across all tokens (the alphabet).
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: CommonHashMap<CompactString, Word>,
    alphabet: CommonHashSet<Symbol>,
}

impl Vocabulary {
    /// An empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether there are no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over `(token, word)` pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Word)> {
        self.words.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a single word by token.
    pub fn get(&self, token: &str) -> Option<&Word> {
        self.words.get(token)
    }

    /// Size of the alphabet: the number of distinct single-character
    /// symbols (including the terminal marker) appearing across all
    /// tokens.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet.len()
    }

    /// The alphabet itself.
    pub fn alphabet(&self) -> &CommonHashSet<Symbol> {
        &self.alphabet
    }

    fn ensure_word(&mut self, token: &str) -> &mut Word {
        if !self.words.contains_key(token) {
            let word = Word::from_token(token);
            self.alphabet.extend(word.symbols.iter().cloned());
            self.words.insert(CompactString::new(token), word);
        }
        self.words.get_mut(token).expect("just inserted")
    }

    /// Ingest free text: normalize each line (uppercase,
    /// `[^A-Z']` -> space), split on whitespace runs, and increment the
    /// weight of each resulting token by one, creating new [`Word`]s as
    /// needed.
    pub fn ingest_text<R: BufRead>(&mut self, reader: R) -> BpeResult<()> {
        for line in reader.lines() {
            let line = line?;
            let normalized = normalize_line(&line);
            for token in normalized.split_whitespace() {
                self.ensure_word(token).weight += 1;
            }
        }
        Ok(())
    }

    /// Ingest a vocabulary file: one `<TOKEN> <WEIGHT>` record per line
    /// (uppercased before parsing; unlike [`Vocabulary::ingest_text`], the
    /// `[^A-Z']` -> space scrub does not apply here, since it would strip
    /// the digits out of the weight field). A malformed line (wrong field
    /// count, non-integer weight) or a token repeated across lines is a
    /// fatal [`BpeError`].
    pub fn ingest_vocab_file<R: BufRead>(&mut self, reader: R) -> BpeResult<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let uppercased = uppercase_ascii(&line);
            let mut fields = uppercased.split_whitespace();
            let token = fields.next().ok_or_else(|| BpeError::InputFormat {
                line: line_no,
                detail: "missing token field".to_string(),
            })?;
            let weight_field = fields.next().ok_or_else(|| BpeError::InputFormat {
                line: line_no,
                detail: "missing weight field".to_string(),
            })?;
            if fields.next().is_some() {
                return Err(BpeError::InputFormat {
                    line: line_no,
                    detail: "too many fields".to_string(),
                });
            }
            let weight: u64 = weight_field.parse().map_err(|_| BpeError::InputFormat {
                line: line_no,
                detail: format!("non-integer weight {weight_field:?}"),
            })?;

            if self.words.contains_key(token) {
                return Err(BpeError::DuplicateKey {
                    line: line_no,
                    key: token.to_string(),
                });
            }
            self.ensure_word(token).weight += weight;
        }
        Ok(())
    }

    /// Write the vocabulary file: one `<TOKEN> <WEIGHT>` line per word,
    /// sorted by `(-WEIGHT, TOKEN)`.
    pub fn write_vocab_file<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut entries: Vec<(&str, u64)> = self.words.iter().map(|(k, v)| (k.as_str(), v.weight)).collect();
        entries.sort_by(|(tok_a, w_a), (tok_b, w_b)| w_b.cmp(w_a).then_with(|| tok_a.cmp(tok_b)));
        for (token, weight) in entries {
            writeln!(writer, "{token} {weight}")?;
        }
        Ok(())
    }

    /// Restore every word's `symbols` to its per-character + terminal
    /// marker decomposition, discarding any merges applied so far.
    pub fn reset_symbols(&mut self) {
        for (token, word) in self.words.iter_mut() {
            word.symbols = initial_symbols(token);
        }
    }

    /// Space-joined subword string for a token, or `None` if the token is
    /// unknown.
    pub fn token_to_subword_string(&self, token: &str) -> Option<String> {
        self.words.get(token).map(|word| join_symbols(&word.symbols))
    }

    /// Insert a token with a given initial weight (used by the encoder's
    /// memoization vocabulary, where "weight" has no training meaning and
    /// is always zero).
    pub fn insert_new(&mut self, token: &str) -> &mut Word {
        self.ensure_word(token)
    }

    /// Replace every occurrence of `pair` across the given tokens' symbol
    /// sequences with their concatenation.
    ///
    /// For every token, scans `symbols` left-to-right with a cursor;
    /// non-overlapping matches are merged greedily (a run `a b a b` yields
    /// two merges; `a a a` with `pair = (a, a)` yields one). Returns a
    /// nested `Pair -> token -> delta` map of the four neighbor-pair
    /// deltas produced per merge. The merged pair itself is not recorded
    /// here: its removal is the caller's job (see
    /// [`crate::stats::Statistics::remove_pair`]).
    ///
    /// A run of three or more identical symbols being merged can, via
    /// this neighbor bookkeeping, emit a delta keyed by the merged pair
    /// itself (when a neighbor symbol happens to equal one side of the
    /// pair). That entry is recreated after the caller's explicit removal
    /// and is left inert: negative frequency, never selected as a
    /// maximum.
    pub fn replace_pair<'a, I>(&mut self, pair: &Pair, tokens: I) -> CommonHashMap<Pair, CommonHashMap<CompactString, i64>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (a, b) = pair;
        let replacement: Symbol = CompactString::new(format!("{a}{b}"));
        let mut deltas: CommonHashMap<Pair, CommonHashMap<CompactString, i64>> = CommonHashMap::new();

        for token in tokens {
            let Some(word) = self.words.get_mut(token) else {
                continue;
            };
            let weight = word.weight as i64;
            let symbols = &word.symbols;
            let n = symbols.len();
            if n < 2 {
                continue;
            }

            let mut new_symbols: Vec<Symbol> = Vec::with_capacity(n);
            let mut i = 0;
            while i < n {
                if i + 1 < n && symbols[i] == *a && symbols[i + 1] == *b {
                    if let Some(prev) = new_symbols.last().cloned() {
                        bump(&mut deltas, (prev.clone(), a.clone()), token, -weight);
                        bump(&mut deltas, (prev, replacement.clone()), token, weight);
                    }
                    if i + 2 < n {
                        let next = symbols[i + 2].clone();
                        bump(&mut deltas, (b.clone(), next.clone()), token, -weight);
                        bump(&mut deltas, (replacement.clone(), next), token, weight);
                    }
                    new_symbols.push(replacement.clone());
                    i += 2;
                } else {
                    new_symbols.push(symbols[i].clone());
                    i += 1;
                }
            }
            self.words.get_mut(token).expect("looked up above").symbols = new_symbols;
        }

        deltas
    }
}

fn bump(
    deltas: &mut CommonHashMap<Pair, CommonHashMap<CompactString, i64>>,
    pair: Pair,
    token: &str,
    delta: i64,
) {
    *deltas.entry(pair).or_default().entry(CompactString::new(token)).or_insert(0) += delta;
}

fn join_symbols(symbols: &[Symbol]) -> String {
    let mut out = String::new();
    for (idx, symbol) in symbols.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(symbol.as_str());
    }
    out
}
