// Flag diacritics: parsing `@OP.FEATURE[.VALUE]@` symbols, the per-operation
// check, and the copy-on-push state stack consulted during traversal.

use hashbrown::HashMap;

/// The six flag diacritic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagOp {
    /// `P`: set feature to value with positive polarity.
    PositiveSet,
    /// `N`: set feature to value with negative polarity.
    NegativeSet,
    /// `R`: require feature to be set (to value, if one is given).
    Require,
    /// `D`: disallow feature being set (to value, if one is given).
    Disallow,
    /// `C`: unset feature.
    Clear,
    /// `U`: unify feature with value.
    Unify,
}

impl FlagOp {
    pub fn from_letter(letter: &str) -> Option<Self> {
        Some(match letter {
            "P" => FlagOp::PositiveSet,
            "N" => FlagOp::NegativeSet,
            "R" => FlagOp::Require,
            "D" => FlagOp::Disallow,
            "C" => FlagOp::Clear,
            "U" => FlagOp::Unify,
            _ => return None,
        })
    }
}

/// Interned value id meaning "no value".
pub const EMPTY_VALUE: u16 = 0;

/// A parsed flag diacritic.
///
/// Feature and value names are interned per alphabet, so two operations refer
/// to the same value exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDiacriticOperation {
    pub op: FlagOp,
    pub feature: u16,
    pub value: u16,
}

/// The binding of one feature on the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagState {
    pub value: u16,
    pub positive: bool,
}

/// Outcome of checking one operation against the current binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCheckResult {
    /// The arc may not be taken.
    Reject,
    /// The arc may be taken; the binding is unchanged.
    Keep,
    /// The arc may be taken; the feature is rebound.
    Set(FlagState),
    /// The arc may be taken; the feature is unbound.
    Unset,
}

/// Check `op` against the feature's current binding (`None` = unbound).
///
/// An unbound feature counts as having the empty value.
pub fn check_flag(op: &FlagDiacriticOperation, current: Option<FlagState>) -> FlagCheckResult {
    let bound_value = current.map_or(EMPTY_VALUE, |s| s.value);
    let bound_positive_to = |value: u16| current == Some(FlagState { value, positive: true });

    match op.op {
        FlagOp::PositiveSet => FlagCheckResult::Set(FlagState {
            value: op.value,
            positive: true,
        }),
        FlagOp::NegativeSet => FlagCheckResult::Set(FlagState {
            value: op.value,
            positive: false,
        }),
        FlagOp::Require => {
            let ok = if op.value == EMPTY_VALUE {
                bound_value != EMPTY_VALUE
            } else {
                bound_positive_to(op.value)
            };
            if ok { FlagCheckResult::Keep } else { FlagCheckResult::Reject }
        }
        FlagOp::Disallow => {
            let ok = if op.value == EMPTY_VALUE {
                bound_value == EMPTY_VALUE
            } else {
                !bound_positive_to(op.value)
            };
            if ok { FlagCheckResult::Keep } else { FlagCheckResult::Reject }
        }
        FlagOp::Clear => FlagCheckResult::Unset,
        FlagOp::Unify => {
            let ok = match current {
                None => true,
                Some(s) if s.positive => s.value == op.value,
                Some(s) => s.value != op.value,
            };
            if ok {
                FlagCheckResult::Set(FlagState {
                    value: op.value,
                    positive: true,
                })
            } else {
                FlagCheckResult::Reject
            }
        }
    }
}

/// Stack of flag bindings, one frame per flag scope on the current path.
///
/// Frames are stored back to back in one vector (`feature_count` slots each);
/// entering a scope copies the top frame forward, leaving it truncates.
#[derive(Debug, Clone)]
pub struct FlagStack {
    feature_count: usize,
    frames: Vec<Option<FlagState>>,
}

impl FlagStack {
    pub fn new(feature_count: usize) -> Self {
        Self {
            feature_count,
            frames: vec![None; feature_count],
        }
    }

    /// Back to a single frame with every feature unbound.
    pub fn reset(&mut self) {
        self.frames.truncate(self.feature_count);
        self.frames.fill(None);
    }

    /// Number of frames, including the base frame.
    pub fn depth(&self) -> usize {
        if self.feature_count == 0 {
            // Frames carry no data; depth is tracked by the caller's balance.
            return 1;
        }
        self.frames.len() / self.feature_count
    }

    /// Bindings of the top frame, indexed by feature id.
    pub fn current(&self) -> &[Option<FlagState>] {
        &self.frames[self.frames.len() - self.feature_count..]
    }

    pub fn get(&self, feature: u16) -> Option<FlagState> {
        self.current().get(feature as usize).copied().flatten()
    }

    /// Apply `op`. On success a new frame is pushed and `true` returned; on
    /// failure the stack is left untouched.
    pub fn apply(&mut self, op: &FlagDiacriticOperation) -> bool {
        let result = check_flag(op, self.get(op.feature));
        if result == FlagCheckResult::Reject {
            return false;
        }
        let top = self.frames.len() - self.feature_count;
        self.frames.extend_from_within(top..);
        let slot = self.frames.len() - self.feature_count + op.feature as usize;
        match result {
            FlagCheckResult::Set(state) => self.frames[slot] = Some(state),
            FlagCheckResult::Unset => self.frames[slot] = None,
            FlagCheckResult::Keep | FlagCheckResult::Reject => {}
        }
        true
    }

    /// Leave the innermost scope entered by a successful [`apply`](Self::apply).
    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > self.feature_count, "popped base frame");
        self.frames.truncate(self.frames.len() - self.feature_count);
    }
}

/// Assigns feature and value ids while the alphabet is read.
///
/// Value id 0 is reserved for the empty value.
pub struct FlagDiacriticParser {
    features: HashMap<String, u16>,
    values: HashMap<String, u16>,
    feature_names: Vec<String>,
    value_names: Vec<String>,
}

impl Default for FlagDiacriticParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagDiacriticParser {
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(String::new(), EMPTY_VALUE);
        Self {
            features: HashMap::new(),
            values,
            feature_names: Vec::new(),
            value_names: vec![String::new()],
        }
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Parse `symbol` if it is a flag diacritic.
    ///
    /// A flag diacritic is longer than five characters, starts and ends with
    /// `@`, and has `.` as its third character. The inner text is split on the
    /// first two dots into operator, feature and (optional) value. Symbols
    /// that fit the outline but name an unknown operator are not flags.
    pub fn parse(&mut self, symbol: &str) -> Option<FlagDiacriticOperation> {
        if symbol.chars().count() <= 5
            || !symbol.starts_with('@')
            || !symbol.ends_with('@')
            || symbol.chars().nth(2) != Some('.')
        {
            return None;
        }

        let inner = &symbol[1..symbol.len() - 1];
        let mut parts = inner.splitn(3, '.');
        let op = FlagOp::from_letter(parts.next()?)?;
        let feature = parts.next()?;
        let value = parts.next().unwrap_or("");

        let feature = intern(&mut self.features, &mut self.feature_names, feature);
        let value = intern(&mut self.values, &mut self.value_names, value);
        Some(FlagDiacriticOperation { op, feature, value })
    }

    /// Feature and value name tables, indexed by id.
    pub fn into_names(self) -> (Vec<String>, Vec<String>) {
        (self.feature_names, self.value_names)
    }
}

fn intern(ids: &mut HashMap<String, u16>, names: &mut Vec<String>, name: &str) -> u16 {
    if let Some(&id) = ids.get(name) {
        return id;
    }
    let id = names.len() as u16;
    ids.insert(name.to_string(), id);
    names.push(name.to_string());
    id
}
