//! # Trainer
//!
//! The merge-and-update loop: repeatedly pick the current top pair, merge
//! it everywhere, emit it as the next model operation, and update the
//! pair statistics to match.

use compact_str::CompactString;

use crate::model::Model;
use crate::stats::Statistics;
use crate::vocab::Vocabulary;

/// Training configuration.
#[derive(Debug, Clone, Copy)]
pub struct TrainerOptions {
    /// Target subword vocabulary size: alphabet plus merge operations.
    pub max_subwords: usize,
}

impl TrainerOptions {
    /// A new options value with the given subword budget.
    pub fn new(max_subwords: usize) -> Self {
        TrainerOptions { max_subwords }
    }

    /// Build a [`Trainer`] from these options.
    pub fn init(self) -> Trainer {
        Trainer { options: self }
    }
}

/// The incremental BPE training engine.
pub struct Trainer {
    options: TrainerOptions,
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// The ordered merge operations produced.
    pub model: Model,
    /// How many operations were actually emitted (may be less than
    /// `max_subwords - alphabet_size` if the pair map emptied first).
    pub operations_emitted: usize,
    /// Whether training stopped because the pair map emptied before the
    /// operation budget was exhausted.
    pub stopped_early: bool,
}

impl Trainer {
    /// Train a model over `vocabulary`.
    ///
    /// Resets the vocabulary's symbol sequences to their per-character
    /// decomposition, builds statistics from scratch, then repeats:
    /// pick the top pair, append it to the model, replace it everywhere
    /// in the vocabulary, remove it from statistics, and fold in the
    /// resulting neighbor-pair deltas. Stops at `max_subwords -
    /// alphabet_size` operations or when no pairs remain, whichever
    /// comes first.
    pub fn train(&self, vocabulary: &mut Vocabulary) -> TrainingReport {
        vocabulary.reset_symbols();
        let mut stats = Statistics::from_vocabulary(vocabulary);
        let mut model = Model::new();

        let alphabet_size = vocabulary.alphabet_size();
        let max_operations = self.options.max_subwords.saturating_sub(alphabet_size);
        let milestone = (max_operations / 10).max(1);

        let mut emitted = 0usize;
        let mut stopped_early = false;

        for i in 0..max_operations {
            let Some(top) = stats.max_pair() else {
                stopped_early = true;
                break;
            };

            model.push(top.clone());

            let tokens: Vec<CompactString> = stats
                .get(&top)
                .map(|entry| entry.per_token.keys().cloned().collect())
                .unwrap_or_default();
            let deltas = vocabulary.replace_pair(&top, tokens.iter().map(CompactString::as_str));

            stats.remove_pair(&top);
            stats.apply_bigram_updates(deltas);

            emitted += 1;
            if i % milestone == 0 {
                log::debug!("training: {emitted}/{max_operations} merges, last = {top:?}");
            }
        }

        if stopped_early {
            log::info!("Stopped early with {emitted} operations");
        }

        TrainingReport {
            model,
            operations_emitted: emitted,
            stopped_early,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn vocab_from(corpus: &str) -> Vocabulary {
        let mut vocab = Vocabulary::new();
        vocab.ingest_text(Cursor::new(corpus)).unwrap();
        vocab
    }

    #[test]
    fn test_empty_corpus_trains_empty_model() {
        let mut vocab = Vocabulary::new();
        let report = TrainerOptions::new(20).init().train(&mut vocab);
        assert!(report.model.is_empty());
        assert_eq!(report.operations_emitted, 0);
        assert!(report.stopped_early);
    }

    #[test]
    fn test_single_character_token_merges_once() {
        let mut vocab = vocab_from("a\n");
        // Alphabet: {A, _} = 2. max_subwords 3 leaves exactly 1 operation.
        let report = TrainerOptions::new(3).init().train(&mut vocab);
        assert_eq!(report.model.len(), 1);
        assert_eq!(report.model.operations()[0], (CompactString::new("A"), CompactString::new("_")));
    }

    #[test]
    fn test_aaaa_corpus_three_merges() {
        let mut vocab = vocab_from("aaaa\n");
        let report = TrainerOptions::new(20).init().train(&mut vocab);
        assert_eq!(report.model.len(), 3);
        let ops = report.model.operations();
        assert_eq!(ops[0], (CompactString::new("A"), CompactString::new("A")));
        assert_eq!(ops[1], (CompactString::new("AA"), CompactString::new("AA")));
        assert_eq!(ops[2], (CompactString::new("AAAA"), CompactString::new("_")));
        assert!(!report.stopped_early);
    }

    #[test]
    fn test_max_operations_respects_alphabet_budget() {
        let mut vocab = vocab_from("hello\n");
        // Alphabet: H E L O _ = 5. Budget of 5 leaves zero operations.
        let report = TrainerOptions::new(5).init().train(&mut vocab);
        assert_eq!(report.model.len(), 0);
    }

    #[test]
    fn test_low_lower_newest_widest_first_merge_frequency() {
        let corpus = "low low low low low lower lower newest newest newest newest newest newest widest widest widest\n";
        let mut vocab = vocab_from(corpus);
        let report = TrainerOptions::new(20).init().train(&mut vocab);
        assert!(report.model.len() <= 20);
        let expected_early_pairs: Vec<(CompactString, CompactString)> = vec![
            (CompactString::new("E"), CompactString::new("S")),
            (CompactString::new("ES"), CompactString::new("T")),
            (CompactString::new("EST"), CompactString::new("_")),
            (CompactString::new("L"), CompactString::new("O")),
            (CompactString::new("LO"), CompactString::new("W")),
        ];
        for pair in &expected_early_pairs {
            assert!(
                report.model.operations().contains(pair),
                "expected {pair:?} among the first operations, got {:?}",
                report.model.operations()
            );
        }
    }

    #[test]
    fn test_hello_model_reproduces_trained_segmentation() {
        let mut vocab = vocab_from("hello\n");
        let report = TrainerOptions::new(10).init().train(&mut vocab);
        assert!(report.model.len() <= 5);

        let trained_symbols = vocab.get("HELLO").unwrap().symbols.clone();

        let mut fresh_symbols: Vec<CompactString> = "HELLO"
            .chars()
            .map(|c| CompactString::new(c.to_string()))
            .collect();
        fresh_symbols.push(CompactString::new("_"));
        report.model.apply(&mut fresh_symbols);

        assert_eq!(fresh_symbols, trained_symbols);
    }
}
