// Load-time options and the per-lookup working state.

use crate::analysis::Analysis;
use crate::flags::FlagStack;
use crate::symbols::DEFAULT_FLAG_PLACEHOLDER;
use crate::transition::Weight;

/// Options fixed when a transducer is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Display string substituted for flag diacritics in outputs.
    pub flag_placeholder: String,
    /// Maximum number of arcs on one search path. Deeper branches are pruned.
    /// `None` searches without limit.
    pub max_depth: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            flag_placeholder: DEFAULT_FLAG_PLACEHOLDER.to_string(),
            max_depth: None,
        }
    }
}

impl LoadOptions {
    pub fn flag_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.flag_placeholder = placeholder.into();
        self
    }

    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Working state of one lookup.
///
/// Owned by the caller and passed by exclusive reference through the search,
/// so one transducer can serve any number of concurrent lookups, each with
/// its own config. Buffers keep their capacity between lookups.
///
/// Every push made while exploring a path is undone before the search
/// returns: after a lookup the input cursor is 0, the output buffer is
/// empty, the weight is zero and the flag stack holds only its base frame.
#[derive(Debug, Clone)]
pub struct LookupConfig<W> {
    /// Characters of the word being looked up.
    pub(crate) chars: Vec<char>,
    /// Tokenized input symbols.
    pub(crate) input: Vec<u16>,
    /// Position of the next input symbol to consume.
    pub(crate) cursor: usize,
    /// Output symbols along the current path.
    pub(crate) output: Vec<u16>,
    /// Weight accumulated along the current path.
    pub(crate) weight: W,
    pub(crate) flags: FlagStack,
    /// Arcs taken along the current path.
    pub(crate) depth: usize,
    pub(crate) results: Vec<Analysis>,
}

impl<W: Weight> LookupConfig<W> {
    /// `flag_feature_count`: number of distinct flag diacritic features.
    pub fn new(flag_feature_count: usize) -> Self {
        Self {
            chars: Vec::new(),
            input: Vec::new(),
            cursor: 0,
            output: Vec::new(),
            weight: W::default(),
            flags: FlagStack::new(flag_feature_count),
            depth: 0,
            results: Vec::new(),
        }
    }

    /// Clear everything left over from a previous lookup.
    #[inline]
    pub fn reset(&mut self) {
        self.chars.clear();
        self.input.clear();
        self.cursor = 0;
        self.output.clear();
        self.weight = W::default();
        self.flags.reset();
        self.depth = 0;
        self.results.clear();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn output(&self) -> &[u16] {
        &self.output
    }

    pub fn weight(&self) -> W {
        self.weight
    }

    pub fn flags(&self) -> &FlagStack {
        &self.flags
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Input symbols of the last tokenized word.
    pub fn input(&self) -> &[u16] {
        &self.input
    }

    /// Whether every path-scoped buffer is back at its initial state.
    pub fn is_balanced(&self) -> bool {
        self.cursor == 0
            && self.output.is_empty()
            && self.weight == W::default()
            && self.flags.depth() == 1
            && self.depth == 0
    }
}
