use crate::commands::{
    compile_vocabulary::CompileVocabularyArgs, decode::DecodeArgs, encode::EncodeArgs, train_model::TrainModelArgs,
};

pub mod compile_vocabulary;
pub mod decode;
pub mod encode;
pub mod train_model;

/// Subcommands for subword-bpe-cli.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Count token frequencies in free text into a vocabulary file.
    CompileVocabulary(CompileVocabularyArgs),

    /// Train a BPE model from a vocabulary file.
    TrainModel(TrainModelArgs),

    /// Apply a trained model to free text.
    Encode(EncodeArgs),

    /// Undo an encoding: collapse subwords back into words.
    Decode(DecodeArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Commands::CompileVocabulary(cmd) => cmd.run(),
            Commands::TrainModel(cmd) => cmd.run(),
            Commands::Encode(cmd) => cmd.run(),
            Commands::Decode(cmd) => cmd.run(),
        }
    }
}
