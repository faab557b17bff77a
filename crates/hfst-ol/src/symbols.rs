// Alphabet: the symbol table following the header.

use crate::FormatError;
use crate::flags::{FlagDiacriticOperation, FlagDiacriticParser};
use crate::reader::{ByteReader, Section};
use crate::trie::LetterTrie;

/// Display string used for flag diacritics unless configured otherwise.
pub const DEFAULT_FLAG_PLACEHOLDER: &str = "#";

/// Parsed symbol table.
///
/// Symbol numbers are positions in the file. Symbol 0 is epsilon and always
/// displays as the empty string, whatever the file stores for it.
#[derive(Debug)]
pub struct Alphabet {
    /// Display string per symbol number. Flag diacritics show the placeholder.
    symbol_strings: Vec<String>,
    /// Parsed operation per symbol number, `None` for ordinary symbols.
    flags: Vec<Option<FlagDiacriticOperation>>,
    /// Flag diacritic symbols as stored in the file, with their numbers.
    flag_symbols: Vec<(u16, String)>,
    feature_names: Vec<String>,
    value_names: Vec<String>,
}

impl Alphabet {
    /// Read `symbol_count` null-terminated strings.
    pub fn read(
        reader: &mut ByteReader<'_>,
        symbol_count: u16,
        flag_placeholder: &str,
    ) -> Result<Self, FormatError> {
        reader.enter(Section::Alphabet);
        let count = symbol_count as usize;
        let mut symbol_strings = Vec::with_capacity(count);
        let mut flags = Vec::with_capacity(count);
        let mut flag_symbols = Vec::new();
        let mut parser = FlagDiacriticParser::new();

        for number in 0..symbol_count {
            let symbol = reader.read_cstr()?;
            if number == 0 {
                symbol_strings.push(String::new());
                flags.push(None);
                continue;
            }
            match parser.parse(symbol) {
                Some(op) => {
                    symbol_strings.push(flag_placeholder.to_string());
                    flags.push(Some(op));
                    flag_symbols.push((number, symbol.to_string()));
                }
                None => {
                    symbol_strings.push(symbol.to_string());
                    flags.push(None);
                }
            }
        }

        let (feature_names, value_names) = parser.into_names();
        Ok(Self {
            symbol_strings,
            flags,
            flag_symbols,
            feature_names,
            value_names,
        })
    }

    pub fn len(&self) -> usize {
        self.symbol_strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_strings.is_empty()
    }

    /// Display string of `symbol`; unknown numbers display as nothing.
    #[inline]
    pub fn display(&self, symbol: u16) -> &str {
        self.symbol_strings
            .get(symbol as usize)
            .map_or("", String::as_str)
    }

    pub fn symbol_strings(&self) -> &[String] {
        &self.symbol_strings
    }

    /// The flag diacritic operation registered for `symbol`, if any.
    #[inline]
    pub fn flag(&self, symbol: u16) -> Option<&FlagDiacriticOperation> {
        self.flags.get(symbol as usize)?.as_ref()
    }

    pub fn is_flag(&self, symbol: u16) -> bool {
        self.flag(symbol).is_some()
    }

    /// Flag diacritic symbols as written in the file, with their numbers.
    pub fn flag_symbols(&self) -> &[(u16, String)] {
        &self.flag_symbols
    }

    /// Number of distinct flag features.
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_name(&self, feature: u16) -> Option<&str> {
        self.feature_names.get(feature as usize).map(String::as_str)
    }

    pub fn value_name(&self, value: u16) -> Option<&str> {
        self.value_names.get(value as usize).map(String::as_str)
    }

    /// Build the tokenizer over every ordinary, non-empty symbol.
    pub fn letter_trie(&self) -> LetterTrie {
        let mut trie = LetterTrie::new();
        for (number, string) in self.symbol_strings.iter().enumerate().skip(1) {
            if self.flags[number].is_none() && !string.is_empty() {
                trie.insert(string, number as u16);
            }
        }
        trie
    }
}
