// Index and transition table records, their weight column, and the
// dual-addressing rule shared by both tables.

use std::fmt::Debug;
use std::ops::Add;

use crate::reader::ByteReader;
use crate::{FormatError, NO_SYMBOL, TRANSITION_TARGET_TABLE_START};

/// Size of an index table record: u16 input + u32 target.
pub const INDEX_RECORD_SIZE: usize = 6;

/// The weight capability the tables and traversal are generic over.
///
/// Implemented by `f32` for weighted transducers and by the zero-sized
/// [`Unweighted`](crate::unweighted::Unweighted) for unweighted ones.
pub trait Weight: Copy + Default + PartialEq + Debug + Add<Output = Self> + Send + Sync + 'static {
    /// Whether lookup results carry a weight.
    const WEIGHTED: bool;

    /// Size of one transition record in bytes.
    const TRANSITION_RECORD_SIZE: usize;

    /// Read the weight column of a transition record.
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, FormatError>;

    /// Interpret the target field of an index record whose input symbol is
    /// [`NO_SYMBOL`]. `Some(weight)` means the state is final.
    fn index_final_weight(target: u32) -> Option<Self>;

    /// Interpret a transition record whose input and output are
    /// [`NO_SYMBOL`]. `Some(weight)` means the state is final.
    fn transition_final_weight(target: u32, weight: Self) -> Option<Self>;

    /// The weight as reported to callers; `None` when unweighted.
    fn reported(self) -> Option<f32>;
}

/// A target field resolved to the table it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAddress {
    Index(usize),
    Transition(usize),
}

impl TableAddress {
    /// Values below 2^31 address the index table; values at or above it
    /// address the transition table after subtracting 2^31.
    #[inline]
    pub fn resolve(target: u32) -> Self {
        if target >= TRANSITION_TARGET_TABLE_START {
            TableAddress::Transition((target - TRANSITION_TARGET_TABLE_START) as usize)
        } else {
            TableAddress::Index(target as usize)
        }
    }
}

/// Decoded meaning of an index record's 32-bit target field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexTarget<W> {
    /// Raw address of the first matching transition.
    Transitions(u32),
    /// The state this slot belongs to is final with this weight.
    Final(W),
    /// No entry.
    Empty,
}

/// One index table record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionIndex<W> {
    pub input: u16,
    pub target: IndexTarget<W>,
}

impl<W: Weight> TransitionIndex<W> {
    pub fn decode(input: u16, target: u32) -> Self {
        let target = if input == NO_SYMBOL {
            match W::index_final_weight(target) {
                Some(weight) => IndexTarget::Final(weight),
                None => IndexTarget::Empty,
            }
        } else {
            IndexTarget::Transitions(target)
        };
        Self { input, target }
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let input = reader.read_u16()?;
        let target = reader.read_u32()?;
        Ok(Self::decode(input, target))
    }

    /// The transition table address for `symbol`, if this slot holds one.
    #[inline]
    pub fn transitions_for(&self, symbol: u16) -> Option<u32> {
        match self.target {
            IndexTarget::Transitions(target) if self.input == symbol => Some(target),
            _ => None,
        }
    }

    #[inline]
    pub fn final_weight(&self) -> Option<W> {
        match self.target {
            IndexTarget::Final(weight) => Some(weight),
            _ => None,
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.final_weight().is_some()
    }
}

/// One transition table record.
///
/// The first record of a state stored in the transition table is its finality
/// marker; the state's arcs follow and end at the next record whose input is
/// [`NO_SYMBOL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<W> {
    pub input: u16,
    pub output: u16,
    pub target: u32,
    pub weight: W,
}

impl<W: Weight> Transition<W> {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            input: reader.read_u16()?,
            output: reader.read_u16()?,
            target: reader.read_u32()?,
            weight: W::read(reader)?,
        })
    }

    #[inline]
    pub fn final_weight(&self) -> Option<W> {
        if self.input != NO_SYMBOL || self.output != NO_SYMBOL {
            return None;
        }
        W::transition_final_weight(self.target, self.weight)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.final_weight().is_some()
    }

    /// Whether this record ends the arcs of a state.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.input == NO_SYMBOL
    }
}
