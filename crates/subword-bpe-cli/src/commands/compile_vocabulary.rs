//! `compile-vocabulary`: count token frequencies in free text into a
//! vocabulary file.

use anyhow::Context;
use subword_bpe::Vocabulary;

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the compile-vocabulary command.
#[derive(clap::Args, Debug)]
pub struct CompileVocabularyArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// Free text to count tokens from; "-" reads from stdin.
    #[arg(long)]
    text: String,

    #[command(flatten)]
    output: OutputArgs,
}

impl CompileVocabularyArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.logging.setup_logging(3)?;

        let reader = crate::input_output::open_reader(&self.text)?;
        let mut vocab = Vocabulary::new();
        vocab.ingest_text(reader).with_context(|| format!("reading {}", self.text))?;

        log::info!("Compiled {} distinct tokens.", vocab.len());

        let mut writer = self.output.open_writer()?;
        vocab.write_vocab_file(&mut writer)?;

        Ok(())
    }
}
