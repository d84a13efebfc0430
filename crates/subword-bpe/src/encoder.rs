//! # Encoder
//!
//! Applies a trained [`Model`] to arbitrary text, memoizing across
//! repeated tokens within the encoder's lifetime.

use crate::model::Model;
use crate::vocab::{Vocabulary, normalize_line};

/// Applies a [`Model`] to lines of text.
///
/// Normalizes each line the same way vocabulary ingestion does
/// (uppercase, `[^A-Z']` -> space, split on whitespace), then for each
/// token applies the model once (on first sighting) and emits its
/// space-joined subwords. Word boundaries are recoverable from the
/// terminal marker; line boundaries are preserved one-to-one by the
/// caller (`subword-bpe-cli` writes one output line per input line).
pub struct Encoder<'m> {
    model: &'m Model,
    seen: Vocabulary,
}

impl<'m> Encoder<'m> {
    /// Build an encoder over a given model, with an empty memoization
    /// table.
    pub fn new(model: &'m Model) -> Self {
        Encoder {
            model,
            seen: Vocabulary::new(),
        }
    }

    /// Encode one line of text, returning the space-joined subword
    /// stream (tokens space-joined, each token itself a space-separated
    /// sequence of symbols).
    pub fn encode_line(&mut self, line: &str) -> String {
        let normalized = normalize_line(line);
        let mut mapped: Vec<String> = Vec::new();
        for token in normalized.split_whitespace() {
            if self.seen.get(token).is_none() {
                let word = self.seen.insert_new(token);
                self.model.apply(&mut word.symbols);
            }
            mapped.push(
                self.seen
                    .token_to_subword_string(token)
                    .expect("token was just inserted or already present"),
            );
        }
        mapped.join(" ")
    }
}
