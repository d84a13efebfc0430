//! # Model
//!
//! The ordered list of merge operations produced by training. Order is
//! significant: both training and encoding replay it front-to-back.

use std::io::{BufRead, Write};

use compact_str::CompactString;

use crate::errors::{BpeError, BpeResult};
use crate::types::{CommonHashSet, Pair, Symbol};

/// An ordered sequence of merge operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    operations: Vec<Pair>,
}

impl Model {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// The operations, in replay order.
    pub fn operations(&self) -> &[Pair] {
        &self.operations
    }

    /// Number of merge operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the model has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Append a merge operation. Used by the trainer as it emits each
    /// chosen pair.
    pub fn push(&mut self, pair: Pair) {
        self.operations.push(pair);
    }

    /// Load a model file: one `<SYMBOL_A> <SYMBOL_B>` record per line,
    /// uppercased before parsing. A malformed line (wrong field count) or
    /// a pair repeated across lines is a fatal [`BpeError`].
    pub fn load<R: BufRead>(reader: R) -> BpeResult<Self> {
        let mut model = Model::new();
        let mut seen: CommonHashSet<Pair> = CommonHashSet::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let uppercased = uppercase_ascii(&line);
            let mut fields = uppercased.split_whitespace();
            let a = fields.next().ok_or_else(|| BpeError::InputFormat {
                line: line_no,
                detail: "missing first symbol".to_string(),
            })?;
            let b = fields.next().ok_or_else(|| BpeError::InputFormat {
                line: line_no,
                detail: "missing second symbol".to_string(),
            })?;
            if fields.next().is_some() {
                return Err(BpeError::InputFormat {
                    line: line_no,
                    detail: "too many fields".to_string(),
                });
            }

            let pair: Pair = (CompactString::new(a), CompactString::new(b));
            if !seen.insert(pair.clone()) {
                return Err(BpeError::DuplicateKey {
                    line: line_no,
                    key: format!("{a} {b}"),
                });
            }
            model.operations.push(pair);
        }

        Ok(model)
    }

    /// Write the model file: one `<SYMBOL_A> <SYMBOL_B>` line per
    /// operation, in order.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (a, b) in &self.operations {
            writeln!(writer, "{a} {b}")?;
        }
        Ok(())
    }

    /// Apply every operation, in order, to a symbol sequence: for each
    /// `(a, b)`, a left-to-right, non-overlapping merge of `(a, b)` into
    /// `a+b`, using the same cursor rule as training. Applying a model
    /// twice is a no-op the second time (no operation's pair can still be
    /// adjacent after the first pass, since it was just the previous
    /// model's output).
    pub fn apply(&self, symbols: &mut Vec<Symbol>) {
        for (a, b) in &self.operations {
            merge_once(symbols, a, b);
        }
    }
}

fn uppercase_ascii(line: &str) -> String {
    line.chars().map(|c| c.to_ascii_uppercase()).collect()
}

fn merge_once(symbols: &mut Vec<Symbol>, a: &Symbol, b: &Symbol) {
    let n = symbols.len();
    if n < 2 {
        return;
    }
    let replacement: Symbol = CompactString::new(format!("{a}{b}"));
    let mut out: Vec<Symbol> = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        if i + 1 < n && symbols[i] == *a && symbols[i + 1] == *b {
            out.push(replacement.clone());
            i += 2;
        } else {
            out.push(symbols[i].clone());
            i += 1;
        }
    }
    *symbols = out;
}
