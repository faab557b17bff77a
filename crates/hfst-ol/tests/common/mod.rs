// Binary image encoder for test transducers.
//
// Tables are written out record by record by each test; this only takes care
// of the header, alphabet and byte layout.
#![allow(dead_code)]

pub const NO: u16 = u16::MAX;
pub const NT: u32 = u32::MAX;
pub const S: u32 = 1 << 31;
pub const INF: f32 = u32::MAX as f32;

/// One transition table record.
#[derive(Debug, Clone, Copy)]
pub struct Tr {
    pub input: u16,
    pub output: u16,
    pub target: u32,
    pub weight: f32,
}

impl Tr {
    pub fn arc(input: u16, output: u16, target: u32, weight: f32) -> Self {
        Self {
            input,
            output,
            target,
            weight,
        }
    }

    /// Finality marker of a final state. Unweighted images drop the weight.
    pub fn final_marker(weight: f32) -> Self {
        Self::arc(NO, NO, 1, weight)
    }

    /// Finality marker of a non-final state.
    pub fn marker() -> Self {
        Self::arc(NO, NO, NT, INF)
    }

    /// End of the transition table.
    pub fn terminator() -> Self {
        Self::marker()
    }
}

pub struct FixtureBuilder {
    weighted: bool,
    symbols: Vec<String>,
    input_symbol_count: u16,
    indices: Vec<(u16, u32)>,
    transitions: Vec<Tr>,
    index_table_size: Option<u32>,
    transition_table_size: Option<u32>,
    unweighted_epsilon_cycles: bool,
    container: Option<Vec<(String, String)>>,
    trailing: Vec<u8>,
}

impl FixtureBuilder {
    fn new(weighted: bool, symbols: &[&str], input_symbol_count: u16) -> Self {
        Self {
            weighted,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            input_symbol_count,
            indices: Vec::new(),
            transitions: Vec::new(),
            index_table_size: None,
            transition_table_size: None,
            unweighted_epsilon_cycles: false,
            container: None,
            trailing: Vec::new(),
        }
    }

    pub fn weighted(symbols: &[&str], input_symbol_count: u16) -> Self {
        Self::new(true, symbols, input_symbol_count)
    }

    pub fn unweighted(symbols: &[&str], input_symbol_count: u16) -> Self {
        Self::new(false, symbols, input_symbol_count)
    }

    pub fn index(mut self, input: u16, target: u32) -> Self {
        self.indices.push((input, target));
        self
    }

    /// `count` empty index records.
    pub fn empty_indices(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.indices.push((NO, NT));
        }
        self
    }

    pub fn transition(mut self, tr: Tr) -> Self {
        self.transitions.push(tr);
        self
    }

    /// Declare an index table size other than the number of records written.
    pub fn index_table_size(mut self, size: u32) -> Self {
        self.index_table_size = Some(size);
        self
    }

    /// Declare a transition table size other than the number of records written.
    pub fn transition_table_size(mut self, size: u32) -> Self {
        self.transition_table_size = Some(size);
        self
    }

    pub fn unweighted_epsilon_cycles(mut self) -> Self {
        self.unweighted_epsilon_cycles = true;
        self
    }

    /// Prefix the image with an HFST3 container header.
    pub fn container(mut self, properties: &[(&str, &str)]) -> Self {
        self.container = Some(
            properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        if let Some(properties) = &self.container {
            let mut body = Vec::new();
            for (k, v) in properties {
                body.extend_from_slice(k.as_bytes());
                body.push(0);
                body.extend_from_slice(v.as_bytes());
                body.push(0);
            }
            buf.extend_from_slice(b"HFST\0");
            buf.extend_from_slice(&(body.len() as u16).to_le_bytes());
            buf.push(0);
            buf.extend_from_slice(&body);
        }

        buf.extend_from_slice(&self.input_symbol_count.to_le_bytes());
        buf.extend_from_slice(&(self.symbols.len() as u16).to_le_bytes());
        let index_size = self.index_table_size.unwrap_or(self.indices.len() as u32);
        let transition_size = self
            .transition_table_size
            .unwrap_or(self.transitions.len() as u32);
        buf.extend_from_slice(&index_size.to_le_bytes());
        buf.extend_from_slice(&transition_size.to_le_bytes());
        // State and transition counts are informational.
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&(self.transitions.len() as u32).to_le_bytes());

        let flags = [
            self.weighted,
            false,
            false,
            false,
            self.unweighted_epsilon_cycles,
            false,
            true,
            self.unweighted_epsilon_cycles,
            self.unweighted_epsilon_cycles,
        ];
        for flag in flags {
            buf.extend_from_slice(&u32::from(flag).to_le_bytes());
        }

        for symbol in &self.symbols {
            buf.extend_from_slice(symbol.as_bytes());
            buf.push(0);
        }

        for &(input, target) in &self.indices {
            buf.extend_from_slice(&input.to_le_bytes());
            buf.extend_from_slice(&target.to_le_bytes());
        }

        for tr in &self.transitions {
            buf.extend_from_slice(&tr.input.to_le_bytes());
            buf.extend_from_slice(&tr.output.to_le_bytes());
            buf.extend_from_slice(&tr.target.to_le_bytes());
            if self.weighted {
                buf.extend_from_slice(&tr.weight.to_le_bytes());
            }
        }

        buf.extend_from_slice(&self.trailing);
        buf
    }
}

/// Weighted `cat` lexicon: `cat` -> `cat+N` with weight 1.5.
pub fn weighted_cat() -> FixtureBuilder {
    FixtureBuilder::weighted(&["", "c", "a", "t", "+N"], 4)
        .empty_indices(2)
        .index(1, S)
        .empty_indices(2)
        .transition(Tr::arc(1, 1, S + 1, 0.0))
        .transition(Tr::marker())
        .transition(Tr::arc(2, 2, S + 3, 0.5))
        .transition(Tr::marker())
        .transition(Tr::arc(3, 3, S + 5, 0.0))
        .transition(Tr::marker())
        .transition(Tr::arc(0, 4, S + 7, 1.0))
        .transition(Tr::final_marker(0.0))
        .transition(Tr::terminator())
}

/// Unweighted epsilon loop guarded by `@D.SEEN.1@` then `@P.SEEN.1@`:
/// `a` -> `a#x`.
pub fn unweighted_flag_loop() -> FixtureBuilder {
    FixtureBuilder::unweighted(&["", "a", "@P.SEEN.1@", "@D.SEEN.1@", "x"], 4)
        .empty_indices(2)
        .index(1, S)
        .empty_indices(2)
        .transition(Tr::arc(1, 1, S + 1, 0.0))
        .transition(Tr::marker())
        .transition(Tr::arc(3, 3, S + 3, 0.0))
        .transition(Tr::marker())
        .transition(Tr::arc(2, 2, S + 1, 0.0))
        .transition(Tr::arc(0, 4, S + 6, 0.0))
        .transition(Tr::final_marker(0.0))
        .transition(Tr::terminator())
}

/// Unweighted `ab` where the case set after `a` decides the tag after `b`:
/// `ab` -> `a+Nomb+Req`, `a+Genb+Dis`.
pub fn unweighted_require_disallow() -> FixtureBuilder {
    FixtureBuilder::unweighted(
        &[
            "",
            "a",
            "b",
            "@P.CASE.NOM@",
            "@P.CASE.GEN@",
            "@R.CASE.NOM@",
            "@D.CASE.NOM@",
            "+Nom",
            "+Gen",
            "+Req",
            "+Dis",
        ],
        7,
    )
    .empty_indices(2)
    .index(1, S)
    .empty_indices(5)
    .transition(Tr::arc(1, 1, S + 1, 0.0))
    .transition(Tr::marker())
    .transition(Tr::arc(3, 7, S + 4, 0.0))
    .transition(Tr::arc(4, 8, S + 4, 0.0))
    .transition(Tr::marker())
    .transition(Tr::arc(2, 2, S + 6, 0.0))
    .transition(Tr::marker())
    .transition(Tr::arc(5, 9, S + 9, 0.0))
    .transition(Tr::arc(6, 10, S + 9, 0.0))
    .transition(Tr::final_marker(0.0))
    .transition(Tr::terminator())
}

/// Weighted start state held in the index table with an epsilon slot:
/// `a` -> `+Xa` (0.875), `a` (1.125).
pub fn weighted_index_epsilon() -> FixtureBuilder {
    FixtureBuilder::weighted(&["", "a", "+X"], 2)
        .empty_indices(1)
        .index(0, S)
        .index(1, S + 6)
        .transition(Tr::arc(0, 2, S + 2, 0.5))
        .transition(Tr::terminator())
        .transition(Tr::marker())
        .transition(Tr::arc(1, 1, S + 4, 0.25))
        .transition(Tr::final_marker(0.125))
        .transition(Tr::terminator())
        .transition(Tr::arc(1, 1, S + 4, 1.0))
        .transition(Tr::terminator())
}

/// Unweighted `a` through Negative-set, Unify and Clear on one feature:
/// `a` -> `a+Neg+Y##+X`. Each `+Bad` arc is blocked by a failing unify.
pub fn unweighted_unify_clear() -> FixtureBuilder {
    FixtureBuilder::unweighted(
        &[
            "",
            "a",
            "@N.FF.X@",
            "@U.FF.X@",
            "@U.FF.Y@",
            "@C.FF@",
            "@P.FF.X@",
            "+Neg",
            "+Y",
            "+X",
            "+Bad",
        ],
        7,
    )
    .empty_indices(2)
    .index(1, S)
    .empty_indices(5)
    .transition(Tr::arc(1, 1, S + 1, 0.0))
    .transition(Tr::marker())
    .transition(Tr::arc(2, 7, S + 3, 0.0))
    // t3: FF is negatively bound to X.
    .transition(Tr::marker())
    .transition(Tr::arc(3, 10, S + 6, 0.0))
    .transition(Tr::arc(4, 8, S + 6, 0.0))
    // t6: FF is positively bound to Y.
    .transition(Tr::marker())
    .transition(Tr::arc(5, 5, S + 8, 0.0))
    .transition(Tr::marker())
    .transition(Tr::arc(6, 6, S + 10, 0.0))
    // t10: FF is positively bound to X.
    .transition(Tr::marker())
    .transition(Tr::arc(3, 9, S + 13, 0.0))
    .transition(Tr::arc(4, 10, S + 13, 0.0))
    .transition(Tr::final_marker(0.0))
    .transition(Tr::terminator())
}
