//! # Core Types

use std::collections::{HashMap, HashSet};

use compact_str::CompactString;

/// A subword unit.
///
/// Initially a single alphabet character or the [`TERMINAL_MARKER`];
/// extended by merges to arbitrary concatenations of those. Symbols are
/// compared by string equality.
pub type Symbol = CompactString;

/// The reserved end-of-token marker appended to every word's initial
/// symbol sequence. Not a separator: the decoder treats it as "emit a
/// space here", recovering the original word boundary.
pub const TERMINAL_MARKER: char = '_';

/// An ordered pair of adjacent [`Symbol`]s.
pub type Pair = (Symbol, Symbol);

/// Type alias for the hash maps used throughout this crate.
pub type CommonHashMap<K, V> = HashMap<K, V>;

/// Type alias for the hash sets used throughout this crate.
pub type CommonHashSet<V> = HashSet<V>;
