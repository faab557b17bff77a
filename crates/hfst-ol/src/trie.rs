// Letter trie: tokenizes input text into symbol numbers by longest match.

use hashbrown::HashMap;

use crate::NO_SYMBOL;

/// A node of the trie. `symbols` binds a character to the symbol whose
/// string ends with that character at this depth; `children` continues
/// longer strings.
#[derive(Debug, Default)]
struct TrieNode {
    symbols: HashMap<char, u16>,
    children: HashMap<char, u32>,
}

/// Prefix tree over the alphabet's symbol strings, stored as an arena of
/// nodes with node 0 as the root.
#[derive(Debug)]
pub struct LetterTrie {
    nodes: Vec<TrieNode>,
}

impl Default for LetterTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Bind `string` to `symbol`. Empty strings are ignored.
    pub fn insert(&mut self, string: &str, symbol: u16) {
        let mut chars = string.chars().peekable();
        let mut node = 0usize;
        while let Some(ch) = chars.next() {
            if chars.peek().is_none() {
                self.nodes[node].symbols.insert(ch, symbol);
                return;
            }
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child as usize,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(ch, child as u32);
                    child
                }
            };
        }
    }

    /// Match the longest symbol starting at `*cursor`.
    ///
    /// On success the cursor is moved past the matched characters. If no
    /// symbol starts at the cursor, [`NO_SYMBOL`] is returned and the cursor
    /// is left unchanged.
    pub fn longest_match(&self, input: &[char], cursor: &mut usize) -> u16 {
        let mut node = &self.nodes[0];
        let mut pos = *cursor;
        let mut best = None;

        while let Some(ch) = input.get(pos) {
            pos += 1;
            if let Some(&symbol) = node.symbols.get(ch) {
                best = Some((symbol, pos));
            }
            match node.children.get(ch) {
                Some(&child) => node = &self.nodes[child as usize],
                None => break,
            }
        }

        match best {
            Some((symbol, end)) => {
                *cursor = end;
                symbol
            }
            None => NO_SYMBOL,
        }
    }

    /// Split `input` into symbols. Returns `None` if some position starts no
    /// symbol or the input is empty.
    pub fn tokenize(&self, input: &[char]) -> Option<Vec<u16>> {
        let mut symbols = Vec::with_capacity(input.len() + 1);
        self.tokenize_into(input, &mut symbols).then_some(symbols)
    }

    /// Like [`tokenize`](Self::tokenize) but appends to a caller-owned
    /// buffer. On failure the buffer holds the symbols matched so far.
    pub fn tokenize_into(&self, input: &[char], out: &mut Vec<u16>) -> bool {
        let mut cursor = 0;
        while cursor < input.len() {
            let symbol = self.longest_match(input, &mut cursor);
            if symbol == NO_SYMBOL {
                return false;
            }
            out.push(symbol);
        }
        !input.is_empty()
    }
}
