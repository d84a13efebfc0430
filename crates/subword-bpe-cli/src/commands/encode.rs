//! `encode`: apply a trained model to free text, one subword stream per
//! input line.

use std::io::{BufRead, Write};

use anyhow::Context;
use subword_bpe::{Encoder, Model};

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the encode command.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// Trained model file.
    #[arg(long = "bpe-model")]
    bpe_model: String,

    /// Free text to encode; "-" reads from stdin.
    #[arg(long)]
    text: String,

    #[command(flatten)]
    output: OutputArgs,
}

impl EncodeArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.logging.setup_logging(3)?;

        let model_reader = crate::input_output::open_reader(&self.bpe_model)?;
        let model = Model::load(model_reader).with_context(|| format!("reading {}", self.bpe_model))?;
        log::info!("Loaded model with {} operations.", model.len());

        let text_reader = crate::input_output::open_reader(&self.text)?;
        let mut writer = self.output.open_writer()?;
        let mut encoder = Encoder::new(&model);

        for line in text_reader.lines() {
            let line = line?;
            writeln!(writer, "{}", encoder.encode_line(&line))?;
        }

        Ok(())
    }
}
