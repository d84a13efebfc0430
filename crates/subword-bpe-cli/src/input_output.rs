//! Input/output argument groups shared by every subcommand: `-` selects
//! stdin/stdout, anything else is a file path.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter},
};

use anyhow::Context;

fn squash_standard_io(path: &str) -> Option<&str> {
    if path == "-" { None } else { Some(path) }
}

/// Open a buffered reader for `path`, treating `-` as stdin. Shared by the
/// subcommands whose input has a name other than `--input` (`--text`,
/// `--vocabulary`, `--bpe-model`, `--subwords`).
pub fn open_reader(path: &str) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match squash_standard_io(path) {
        None => Box::new(BufReader::new(std::io::stdin().lock())),
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| format!("opening {path}"))?)),
    })
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output file path; "-" writes to stdout.
    #[clap(long)]
    pub output: String,
}

impl OutputArgs {
    /// Open a buffered writer for the output.
    pub fn open_writer(&self) -> anyhow::Result<Box<dyn std::io::Write>> {
        Ok(match squash_standard_io(&self.output) {
            Some(path) => {
                Box::new(BufWriter::new(File::create(path).with_context(|| format!("creating {path}"))?))
            }
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        })
    }
}
