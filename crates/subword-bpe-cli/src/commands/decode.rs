//! `decode`: the trivial inverse of encoding. Not part of the core crate
//! (it has no state and no invariants worth a library): delete the spaces
//! between symbols, turn the terminal marker back into a word-separating
//! space, trim the trailing one.

use std::io::{BufRead, Write};

use subword_bpe::TERMINAL_MARKER;

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the decode command.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// Subword text to decode; "-" reads from stdin.
    #[arg(long)]
    subwords: String,

    #[command(flatten)]
    output: OutputArgs,
}

fn decode_line(line: &str) -> String {
    line.chars()
        .filter(|&c| c != ' ')
        .map(|c| if c == TERMINAL_MARKER { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

impl DecodeArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.logging.setup_logging(3)?;

        let reader = crate::input_output::open_reader(&self.subwords)?;
        let mut writer = self.output.open_writer()?;

        for line in reader.lines() {
            let line = line?;
            writeln!(writer, "{}", decode_line(&line))?;
        }

        Ok(())
    }
}
