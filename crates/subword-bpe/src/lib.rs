#![warn(missing_docs, unused)]
//! # `subword-bpe`
//!
//! A byte-pair-encoding (BPE) subword vocabulary trainer and applier for
//! ASCII text, following Sennrich et al. (2016).
//!
//! ## Pipeline
//!
//! ```text
//! raw text -> Vocabulary (weighted tokens, alphabet)
//!          -> Statistics (pair counts + reverse index + search set)
//!          -> Trainer loop -> Model (ordered merge operations)
//!          -> Encoder (Model + raw text -> subword stream)
//! ```
//!
//! The trivial decoder (undo the space-joining, turn `_` back into a space)
//! is not part of this crate: it is a two-line transform that belongs to
//! whatever driver consumes the encoded text. See `subword-bpe-cli` for one.
//!
//! ## Core Types
//! * [`Symbol`] and [`Pair`] - the alphabet of subword units and adjacent pairs.
//! * [`vocab::Vocabulary`] and [`vocab::Word`] - the weighted token table.
//! * [`stats::Statistics`] and [`stats::PairEntry`] - pair-frequency bookkeeping.
//! * [`training::Trainer`] and [`training::TrainerOptions`] - the merge loop.
//! * [`model::Model`] - the ordered list of merge operations.
//! * [`encoder::Encoder`] - applies a [`model::Model`] to arbitrary text.

pub mod encoder;
pub mod errors;
pub mod model;
pub mod stats;
pub mod training;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use encoder::Encoder;
#[doc(inline)]
pub use errors::{BpeError, BpeResult};
#[doc(inline)]
pub use model::Model;
#[doc(inline)]
pub use stats::{PairEntry, Statistics};
#[doc(inline)]
pub use training::{Trainer, TrainerOptions, TrainingReport};
#[doc(inline)]
pub use types::{Pair, Symbol, TERMINAL_MARKER};
#[doc(inline)]
pub use vocab::{Vocabulary, Word};
