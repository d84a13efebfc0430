//! `train-model`: train a BPE model from a vocabulary file.

use anyhow::Context;
use subword_bpe::{TrainerOptions, Vocabulary};

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the train-model command.
#[derive(clap::Args, Debug)]
pub struct TrainModelArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// Vocabulary file to train from; "-" reads from stdin.
    #[arg(long)]
    vocabulary: String,

    /// Target subword vocabulary size: alphabet plus merge operations.
    #[arg(long, default_value = "1000")]
    max_subwords: usize,

    #[command(flatten)]
    output: OutputArgs,
}

impl TrainModelArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.logging.setup_logging(3)?;

        let reader = crate::input_output::open_reader(&self.vocabulary)?;
        let mut vocab = Vocabulary::new();
        vocab
            .ingest_vocab_file(reader)
            .with_context(|| format!("reading {}", self.vocabulary))?;

        log::info!("Training: {} distinct tokens, max_subwords={}", vocab.len(), self.max_subwords);

        let report = TrainerOptions::new(self.max_subwords).init().train(&mut vocab);
        if report.stopped_early {
            log::info!("Stopped early with {} operations", report.operations_emitted);
        }
        log::info!("Model has {} operations.", report.model.len());

        let mut writer = self.output.open_writer()?;
        report.model.write(&mut writer)?;

        Ok(())
    }
}
