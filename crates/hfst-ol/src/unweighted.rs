// Unweighted transducers: finality is a flag, paths carry no weight.

use std::ops::Add;

use crate::FormatError;
use crate::lookup::OlTransducer;
use crate::reader::ByteReader;
use crate::transition::Weight;

/// Unweighted optimized-lookup transducer (`HFST_OL`).
pub type UnweightedTransducer = OlTransducer<Unweighted>;

/// The weight of an unweighted transducer: carries nothing, adds to itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unweighted;

impl Add for Unweighted {
    type Output = Self;

    #[inline]
    fn add(self, _rhs: Self) -> Self {
        Unweighted
    }
}

impl Weight for Unweighted {
    const WEIGHTED: bool = false;
    const TRANSITION_RECORD_SIZE: usize = 8;

    #[inline]
    fn read(_reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        Ok(Unweighted)
    }

    #[inline]
    fn index_final_weight(target: u32) -> Option<Self> {
        (target == 1).then_some(Unweighted)
    }

    #[inline]
    fn transition_final_weight(target: u32, _weight: Self) -> Option<Self> {
        (target == 1).then_some(Unweighted)
    }

    #[inline]
    fn reported(self) -> Option<f32> {
        None
    }
}
