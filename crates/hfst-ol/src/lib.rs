//! Runtime for HFST optimized-lookup transducers.
//!
//! This crate loads the compact binary format produced by
//! `hfst-fst2fst --optimized-lookup` (weighted `HFST_OLW` and unweighted
//! `HFST_OL`) and looks words up in it, returning every output string the
//! transducer accepts the word with, in search order.
//!
//! # Architecture
//!
//! - [`reader`] -- Little-endian byte decoder with section-aware errors
//! - [`format`] -- HFST3 container header and the 56-byte transducer header
//! - [`symbols`] -- Alphabet: symbol strings and flag diacritic registration
//! - [`flags`] -- Flag diacritic operations and the path-scoped state stack
//! - [`trie`] -- Longest-match tokenizer over the alphabet
//! - [`transition`] -- Index/transition records and the [`Weight`] abstraction
//! - [`tables`] -- The two automaton tables
//! - [`config`] -- Load options and per-lookup working state
//! - [`lookup`] -- Loading and the depth-first search
//! - [`weighted`] / [`unweighted`] -- The two weight specializations
//!
//! # Example
//!
//! ```no_run
//! use hfst_ol::LoadOptions;
//!
//! let data = std::fs::read("analyser.hfstol")?;
//! let transducer = hfst_ol::load(&data, LoadOptions::default())?;
//! for analysis in transducer.analyze("cats")? {
//!     println!("{analysis}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod config;
pub mod flags;
pub mod format;
pub mod lookup;
pub mod reader;
pub mod symbols;
pub mod tables;
pub mod transition;
pub mod trie;
pub mod unweighted;
pub mod weighted;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_utils;

pub use analysis::Analysis;
pub use config::{LoadOptions, LookupConfig};
pub use format::{ContainerHeader, TransducerHeader};
pub use lookup::OlTransducer;
pub use reader::Section;
pub use symbols::Alphabet;
pub use transition::Weight;
pub use unweighted::{Unweighted, UnweightedTransducer};
pub use weighted::WeightedTransducer;

use reader::ByteReader;

/// Symbol number meaning "no symbol". Marks empty index records, finality
/// markers and the end of a state's arcs.
pub const NO_SYMBOL: u16 = u16::MAX;

/// Target values at or above this address the transition table.
pub const TRANSITION_TARGET_TABLE_START: u32 = 1 << 31;

/// Target value meaning "no table index".
pub const NO_TABLE_INDEX: u32 = u32::MAX;

/// Weight of a non-final weighted state: 2^32 as a float.
pub const INFINITE_WEIGHT: f32 = u32::MAX as f32;

/// Error type for malformed transducer images.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(
        "{section} truncated at byte {offset}: read of {needed} bytes, {available} available"
    )]
    Truncated {
        section: Section,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("symbol at byte {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("invalid container header: {0}")]
    InvalidContainer(String),
    #[error("{table} record {index} out of range ({len} records)")]
    IndexOutOfRange {
        table: Section,
        index: usize,
        len: usize,
    },
    #[error("index record {index} has target {target:#x} outside the transition table")]
    InvalidIndexTarget { index: usize, target: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error type for a single lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The word is empty or contains text that spells no symbol. Other words
    /// can still be looked up.
    #[error("cannot tokenize {word:?}")]
    Tokenization { word: String },
    /// The tables turned out to be inconsistent during the search.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Word lookup, abstracting over weighted/unweighted variants.
///
/// `analyze_with` reuses caller-owned working state; lookups sharing one
/// transducer need only separate configs.
pub trait Transducer {
    type Config;

    /// Create working state sized for this transducer.
    fn new_config(&self) -> Self::Config;

    /// Look `word` up, returning every accepted output in search order.
    fn analyze_with(
        &self,
        config: &mut Self::Config,
        word: &str,
    ) -> Result<Vec<Analysis>, LookupError>;

    /// Look `word` up with fresh working state.
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>, LookupError> {
        let mut config = self.new_config();
        self.analyze_with(&mut config, word)
    }
}

/// A transducer whose kind was read from the file.
#[derive(Debug)]
pub enum LoadedTransducer {
    Weighted(WeightedTransducer),
    Unweighted(UnweightedTransducer),
}

impl LoadedTransducer {
    pub fn is_weighted(&self) -> bool {
        matches!(self, LoadedTransducer::Weighted(_))
    }

    pub fn header(&self) -> &TransducerHeader {
        match self {
            LoadedTransducer::Weighted(t) => t.header(),
            LoadedTransducer::Unweighted(t) => t.header(),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        match self {
            LoadedTransducer::Weighted(t) => t.alphabet(),
            LoadedTransducer::Unweighted(t) => t.alphabet(),
        }
    }

    pub fn bytes_consumed(&self) -> usize {
        match self {
            LoadedTransducer::Weighted(t) => t.bytes_consumed(),
            LoadedTransducer::Unweighted(t) => t.bytes_consumed(),
        }
    }

    /// Look `word` up with fresh working state.
    pub fn analyze(&self, word: &str) -> Result<Vec<Analysis>, LookupError> {
        match self {
            LoadedTransducer::Weighted(t) => t.analyze(word),
            LoadedTransducer::Unweighted(t) => t.analyze(word),
        }
    }
}

/// Load a weighted or unweighted transducer, as the header declares.
pub fn load(data: &[u8], options: LoadOptions) -> Result<LoadedTransducer, FormatError> {
    let mut reader = ByteReader::new(data);
    let (container, header) = lookup::read_headers(&mut reader)?;
    Ok(if header.weighted {
        LoadedTransducer::Weighted(OlTransducer::read_body(reader, container, header, options)?)
    } else {
        LoadedTransducer::Unweighted(OlTransducer::read_body(reader, container, header, options)?)
    })
}

/// Read the whole stream and [`load`] it.
pub fn load_from_reader<R: std::io::Read>(
    mut reader: R,
    options: LoadOptions,
) -> Result<LoadedTransducer, FormatError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    load(&data, options)
}
