// Transducer loading and the depth-first lookup search.

use std::fmt;
use std::io::Read;

use tracing::{debug, trace, warn};

use crate::analysis::Analysis;
use crate::config::{LoadOptions, LookupConfig};
use crate::format::{ContainerHeader, TransducerHeader};
use crate::reader::ByteReader;
use crate::symbols::Alphabet;
use crate::tables::AutomatonTables;
use crate::transition::{TableAddress, Transition, Weight};
use crate::trie::LetterTrie;
use crate::{FormatError, LookupError, TRANSITION_TARGET_TABLE_START, Transducer};

/// An optimized-lookup transducer, generic over its weight type.
///
/// Use the [`WeightedTransducer`](crate::WeightedTransducer) and
/// [`UnweightedTransducer`](crate::UnweightedTransducer) aliases, or
/// [`load`](crate::load) when the kind is only known from the file.
///
/// Everything here is immutable after loading; per-lookup state lives in a
/// [`LookupConfig`].
pub struct OlTransducer<W> {
    container: Option<ContainerHeader>,
    header: TransducerHeader,
    alphabet: Alphabet,
    trie: LetterTrie,
    tables: AutomatonTables<W>,
    options: LoadOptions,
    bytes_consumed: usize,
}

impl<W: Weight> fmt::Debug for OlTransducer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OlTransducer")
            .field("weighted", &W::WEIGHTED)
            .field("symbol_count", &self.alphabet.len())
            .field("flag_count", &self.alphabet.flag_symbols().len())
            .field("index_table_size", &self.tables.index_len())
            .field("transition_table_size", &self.tables.transition_len())
            .finish()
    }
}

/// Read the optional container header and the transducer header, checking
/// that both agree on whether the transducer is weighted.
pub(crate) fn read_headers(
    reader: &mut ByteReader<'_>,
) -> Result<(Option<ContainerHeader>, TransducerHeader), FormatError> {
    let container = ContainerHeader::read_optional(reader)?;
    let header = TransducerHeader::read(reader)?;

    if let Some(declared) = container.as_ref().and_then(ContainerHeader::weighted) {
        if declared != header.weighted {
            return Err(FormatError::InvalidContainer(format!(
                "container declares weighted={declared} but header says weighted={}",
                header.weighted
            )));
        }
    }

    debug!(
        input_symbols = header.input_symbol_count,
        symbols = header.symbol_count,
        index_table = header.index_table_size,
        transition_table = header.transition_table_size,
        weighted = header.weighted,
        container = container.is_some(),
        "read transducer header"
    );
    Ok((container, header))
}

impl<W: Weight> OlTransducer<W> {
    /// Load a transducer from its binary image with default options.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        Self::from_bytes_with(data, LoadOptions::default())
    }

    /// Load a transducer from its binary image.
    ///
    /// Fails if the image is of the other kind (weighted vs unweighted).
    pub fn from_bytes_with(data: &[u8], options: LoadOptions) -> Result<Self, FormatError> {
        let mut reader = ByteReader::new(data);
        let (container, header) = read_headers(&mut reader)?;
        if header.weighted != W::WEIGHTED {
            return Err(FormatError::InvalidHeader(format!(
                "expected a {} transducer, found a {} one",
                kind(W::WEIGHTED),
                kind(header.weighted)
            )));
        }
        Self::read_body(reader, container, header, options)
    }

    /// Read the whole stream and load it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FormatError> {
        Self::from_reader_with(reader, LoadOptions::default())
    }

    pub fn from_reader_with<R: Read>(
        mut reader: R,
        options: LoadOptions,
    ) -> Result<Self, FormatError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with(&data, options)
    }

    /// Read the alphabet and tables following already-read headers.
    pub(crate) fn read_body(
        mut reader: ByteReader<'_>,
        container: Option<ContainerHeader>,
        header: TransducerHeader,
        options: LoadOptions,
    ) -> Result<Self, FormatError> {
        let alphabet = Alphabet::read(&mut reader, header.symbol_count, &options.flag_placeholder)?;
        debug!(
            symbols = alphabet.len(),
            flags = alphabet.flag_symbols().len(),
            features = alphabet.feature_count(),
            "read alphabet"
        );

        let tables = AutomatonTables::read(&mut reader, &header)?;
        let bytes_consumed = reader.position();
        debug!(
            index_records = tables.index_len(),
            transition_records = tables.transition_len(),
            bytes = bytes_consumed,
            "read tables"
        );

        if reader.remaining() > 0 {
            warn!(
                trailing = reader.remaining(),
                "bytes left over after the transition table"
            );
        }
        if header.has_unweighted_input_epsilon_cycles && options.max_depth.is_none() {
            warn!("unweighted input-epsilon cycles declared and no search depth limit set");
        }

        let trie = alphabet.letter_trie();
        Ok(Self {
            container,
            header,
            alphabet,
            trie,
            tables,
            options,
            bytes_consumed,
        })
    }

    pub fn header(&self) -> &TransducerHeader {
        &self.header
    }

    /// The HFST3 container header, if the image had one.
    pub fn container(&self) -> Option<&ContainerHeader> {
        self.container.as_ref()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn tables(&self) -> &AutomatonTables<W> {
        &self.tables
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Bytes occupied by the container header, header, alphabet and tables.
    pub fn bytes_consumed(&self) -> usize {
        self.bytes_consumed
    }

    /// Split `word` into input symbols, or `None` if it cannot be tokenized.
    pub fn tokenize(&self, word: &str) -> Option<Vec<u16>> {
        let chars: Vec<char> = word.chars().collect();
        self.trie.tokenize(&chars)
    }

    fn explore(&self, config: &mut LookupConfig<W>, state: u32) -> Result<(), FormatError> {
        match TableAddress::resolve(state) {
            TableAddress::Index(i) => self.explore_index_state(config, i),
            TableAddress::Transition(i) => self.explore_transition_state(config, i),
        }
    }

    /// A state stored in the index table at `i`: record `i` holds finality,
    /// record `i + 1 + s` the arcs on symbol `s` (0 = epsilon and flags).
    fn explore_index_state(
        &self,
        config: &mut LookupConfig<W>,
        i: usize,
    ) -> Result<(), FormatError> {
        let epsilon_slot = i + 1;
        if let Some(target) = self.tables.index_entry(epsilon_slot)?.transitions_for(0) {
            let start = transition_offset(epsilon_slot, target)?;
            self.take_epsilons(config, start)?;
        }

        if config.cursor == config.input.len() {
            if let Some(weight) = self.tables.final_weight_index(i)? {
                self.record(config, weight);
            }
            return Ok(());
        }

        let symbol = config.input[config.cursor];
        // Output-only symbols have no slot in an index-table state.
        if symbol >= self.header.input_symbol_count {
            return Ok(());
        }
        let slot = epsilon_slot + symbol as usize;
        if let Some(target) = self.tables.index_entry(slot)?.transitions_for(symbol) {
            let mut t = transition_offset(slot, target)?;
            while let Some(arc) = self.tables.get_transition(t) {
                if arc.input != symbol {
                    break;
                }
                self.take(config, arc, true)?;
                t += 1;
            }
        }
        Ok(())
    }

    /// A state stored in the transition table at `i`: record `i` holds
    /// finality, its arcs follow.
    fn explore_transition_state(
        &self,
        config: &mut LookupConfig<W>,
        i: usize,
    ) -> Result<(), FormatError> {
        self.take_epsilons(config, i + 1)?;

        if config.cursor == config.input.len() {
            if let Some(weight) = self.tables.final_weight_transition(i)? {
                self.record(config, weight);
            }
            return Ok(());
        }

        let symbol = config.input[config.cursor];
        let mut matched = false;
        let mut t = i + 1;
        while let Some(arc) = self.tables.get_transition(t) {
            if arc.is_sentinel() {
                break;
            }
            if arc.input == symbol {
                matched = true;
                self.take(config, arc, true)?;
            } else if matched {
                break;
            }
            t += 1;
        }
        Ok(())
    }

    /// Follow the run of epsilon and flag diacritic arcs starting at `t`.
    fn take_epsilons(&self, config: &mut LookupConfig<W>, mut t: usize) -> Result<(), FormatError> {
        while let Some(arc) = self.tables.get_transition(t) {
            if arc.input == 0 {
                self.take(config, arc, false)?;
            } else if let Some(op) = self.alphabet.flag(arc.input) {
                if config.flags.apply(op) {
                    let result = self.take(config, arc, false);
                    config.flags.pop();
                    result?;
                }
            } else {
                break;
            }
            t += 1;
        }
        Ok(())
    }

    /// Extend the path by `arc`, explore its target, then undo the extension.
    fn take(
        &self,
        config: &mut LookupConfig<W>,
        arc: &Transition<W>,
        consume: bool,
    ) -> Result<(), FormatError> {
        if let Some(max_depth) = self.options.max_depth {
            if config.depth >= max_depth {
                trace!(depth = config.depth, "search depth limit reached, pruning");
                return Ok(());
            }
        }

        let saved_weight = config.weight;
        config.output.push(arc.output);
        config.weight = saved_weight + arc.weight;
        config.depth += 1;
        if consume {
            config.cursor += 1;
        }

        let result = self.explore(config, arc.target);

        if consume {
            config.cursor -= 1;
        }
        config.depth -= 1;
        config.weight = saved_weight;
        config.output.pop();
        result
    }

    fn record(&self, config: &mut LookupConfig<W>, final_weight: W) {
        let output: String = config
            .output
            .iter()
            .map(|&symbol| self.alphabet.display(symbol))
            .collect();
        let weight = (config.weight + final_weight).reported();
        config.results.push(Analysis::new(output, weight));
    }
}

impl<W: Weight> Transducer for OlTransducer<W> {
    type Config = LookupConfig<W>;

    fn new_config(&self) -> LookupConfig<W> {
        LookupConfig::new(self.alphabet.feature_count())
    }

    fn analyze_with(
        &self,
        config: &mut LookupConfig<W>,
        word: &str,
    ) -> Result<Vec<Analysis>, LookupError> {
        config.reset();
        config.chars.extend(word.chars());
        if !self.trie.tokenize_into(&config.chars, &mut config.input) {
            trace!(word, "no tokenization");
            return Err(LookupError::Tokenization {
                word: word.to_string(),
            });
        }

        match self.explore(config, 0) {
            Ok(()) => Ok(std::mem::take(&mut config.results)),
            Err(err) => {
                config.reset();
                Err(err.into())
            }
        }
    }
}

/// Transition table position addressed by the index record at `slot`.
fn transition_offset(slot: usize, target: u32) -> Result<usize, FormatError> {
    if target < TRANSITION_TARGET_TABLE_START {
        return Err(FormatError::InvalidIndexTarget {
            index: slot,
            target,
        });
    }
    Ok((target - TRANSITION_TARGET_TABLE_START) as usize)
}

fn kind(weighted: bool) -> &'static str {
    if weighted { "weighted" } else { "unweighted" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Section;
    use crate::test_utils::{self, FixtureBuilder, NO, NT, S, Tr};
    use crate::{UnweightedTransducer, WeightedTransducer};

    #[test]
    fn repeated_lookups_are_identical() {
        let t = UnweightedTransducer::from_bytes(&test_utils::unweighted_require_disallow().build())
            .unwrap();
        let mut config = t.new_config();
        let first = t.analyze_with(&mut config, "ab").unwrap();
        for _ in 0..3 {
            assert_eq!(t.analyze_with(&mut config, "ab").unwrap(), first);
        }
    }

    #[test]
    fn config_is_balanced_after_lookup() {
        let t = UnweightedTransducer::from_bytes(&test_utils::unweighted_require_disallow().build())
            .unwrap();
        let mut config = t.new_config();
        t.analyze_with(&mut config, "ab").unwrap();
        assert!(config.is_balanced());
        assert_eq!(config.flags().depth(), 1);
        assert!(config.flags().current().iter().all(Option::is_none));
        assert_eq!(config.input(), [1, 2]);

        let t = WeightedTransducer::from_bytes(&test_utils::weighted_cat().build()).unwrap();
        let mut config = t.new_config();
        t.analyze_with(&mut config, "cat").unwrap();
        assert!(config.is_balanced());
        assert!(t.analyze_with(&mut config, "cx").is_err());
        assert!(config.is_balanced());
    }

    #[test]
    fn empty_word_is_a_tokenization_failure() {
        let t = WeightedTransducer::from_bytes(&test_utils::weighted_cat().build()).unwrap();
        assert!(matches!(
            t.analyze(""),
            Err(LookupError::Tokenization { .. })
        ));
    }

    #[test]
    fn output_only_symbol_has_no_arcs() {
        let t = WeightedTransducer::from_bytes(&test_utils::weighted_cat().build()).unwrap();
        assert!(t.analyze("+N").unwrap().is_empty());
    }

    #[test]
    fn tokenize() {
        let t = WeightedTransducer::from_bytes(&test_utils::weighted_cat().build()).unwrap();
        assert_eq!(t.tokenize("tac"), Some(vec![3, 2, 1]));
        assert_eq!(t.tokenize("+N"), Some(vec![4]));
        assert_eq!(t.tokenize("cab"), None);
    }

    #[test]
    fn bytes_consumed_covers_all_sections() {
        let image = test_utils::weighted_cat().build();
        let t = WeightedTransducer::from_bytes(&image).unwrap();
        assert_eq!(t.bytes_consumed(), image.len());

        let padded = test_utils::weighted_cat().trailing(&[0xAA; 7]).build();
        let t = WeightedTransducer::from_bytes(&padded).unwrap();
        assert_eq!(t.bytes_consumed(), image.len());
    }

    #[test]
    fn container_header_is_skipped() {
        let image = test_utils::weighted_cat()
            .container(&[("version", "3.3"), ("type", "HFST_OLW")])
            .build();
        let t = WeightedTransducer::from_bytes(&image).unwrap();
        assert_eq!(t.container().and_then(|c| c.get("version")), Some("3.3"));
        assert_eq!(t.bytes_consumed(), image.len());
        assert_eq!(t.analyze("cat").unwrap()[0].output, "cat+N");
    }

    #[test]
    fn container_type_must_match_header() {
        let image = test_utils::weighted_cat()
            .container(&[("type", "HFST_OL")])
            .build();
        assert!(matches!(
            WeightedTransducer::from_bytes(&image),
            Err(FormatError::InvalidContainer(_))
        ));
    }

    #[test]
    fn from_reader() {
        let image = test_utils::weighted_cat().build();
        let t = WeightedTransducer::from_reader(image.as_slice()).unwrap();
        assert_eq!(t.analyze("cat").unwrap().len(), 1);
    }

    #[test]
    fn index_table_too_small_for_lookup() {
        // Start state's slot for `a` (index 2) lies past the end of the table.
        let image = FixtureBuilder::weighted(&["", "a"], 2)
            .empty_indices(2)
            .transition(Tr::terminator())
            .build();
        let t = WeightedTransducer::from_bytes(&image).unwrap();
        assert!(matches!(
            t.analyze("a"),
            Err(LookupError::Format(FormatError::IndexOutOfRange {
                table: Section::IndexTable,
                index: 2,
                len: 2
            }))
        ));
    }

    #[test]
    fn index_record_pointing_into_index_table() {
        let image = FixtureBuilder::weighted(&["", "a"], 2)
            .empty_indices(2)
            .index(1, 0)
            .transition(Tr::terminator())
            .build();
        let t = WeightedTransducer::from_bytes(&image).unwrap();
        assert!(matches!(
            t.analyze("a"),
            Err(LookupError::Format(FormatError::InvalidIndexTarget { index: 2, target: 0 }))
        ));
    }

    #[test]
    fn scan_stops_at_end_of_table() {
        // No terminator after the start state's arcs.
        let image = FixtureBuilder::unweighted(&["", "a"], 2)
            .index(NO, 1)
            .empty_indices(1)
            .index(1, S)
            .transition(Tr::arc(1, 1, 0, 0.0))
            .build();
        let t = UnweightedTransducer::from_bytes(&image).unwrap();
        let results = t.analyze("aaa").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].output, "aaa");
    }

    fn epsilon_loop() -> FixtureBuilder {
        // Start state: final, epsilon arc writing `x` back to itself.
        FixtureBuilder::unweighted(&["", "a", "x"], 2)
            .index(NO, 1)
            .index(0, S)
            .index(NO, NT)
            .transition(Tr::arc(0, 2, 0, 0.0))
            .transition(Tr::terminator())
            .unweighted_epsilon_cycles()
    }

    #[test]
    fn depth_limit_prunes_epsilon_cycle() {
        let options = LoadOptions::default().max_depth(Some(3));
        let t = UnweightedTransducer::from_bytes_with(&epsilon_loop().build(), options).unwrap();
        assert_eq!(t.tokenize("x"), Some(vec![2]));

        // `a` has no arc, so the search ends once the loop is cut.
        let mut config = t.new_config();
        assert!(t.analyze_with(&mut config, "a").unwrap().is_empty());
        assert!(config.is_balanced());
    }

    #[test]
    fn depth_limit_bounds_results() {
        // Consuming `a` leads to the looping state.
        let image = FixtureBuilder::unweighted(&["", "a", "x"], 2)
            .empty_indices(2)
            .index(1, S)
            .transition(Tr::arc(1, 1, S + 1, 0.0))
            .transition(Tr::final_marker(0.0))
            .transition(Tr::arc(0, 2, S + 1, 0.0))
            .transition(Tr::terminator())
            .unweighted_epsilon_cycles()
            .build();
        let options = LoadOptions::default().max_depth(Some(4));
        let t = UnweightedTransducer::from_bytes_with(&image, options).unwrap();
        let outputs: Vec<String> = t
            .analyze("a")
            .unwrap()
            .into_iter()
            .map(|a| a.output)
            .collect();
        assert_eq!(outputs, ["axxx", "axx", "ax", "a"]);
    }
}
