// Weighted transducers: f32 arc weights summed along the path.

use crate::FormatError;
use crate::INFINITE_WEIGHT;
use crate::lookup::OlTransducer;
use crate::reader::ByteReader;
use crate::transition::Weight;

/// Weighted optimized-lookup transducer (`HFST_OLW`).
pub type WeightedTransducer = OlTransducer<f32>;

/// Whether `weight` is the "infinite weight" sentinel.
///
/// The sentinel is written as the bit pattern `0xFFFFFFFF`, which some
/// writers instead store as the float value 2^32; true infinities count too.
#[inline]
pub fn is_infinite_weight(weight: f32) -> bool {
    weight.to_bits() == u32::MAX || weight == INFINITE_WEIGHT || weight.is_infinite()
}

impl Weight for f32 {
    const WEIGHTED: bool = true;
    const TRANSITION_RECORD_SIZE: usize = 12;

    #[inline]
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        reader.read_f32()
    }

    /// The target field holds the final weight's bit pattern.
    #[inline]
    fn index_final_weight(target: u32) -> Option<Self> {
        let weight = f32::from_bits(target);
        (!is_infinite_weight(weight)).then_some(weight)
    }

    #[inline]
    fn transition_final_weight(_target: u32, weight: Self) -> Option<Self> {
        (!is_infinite_weight(weight)).then_some(weight)
    }

    #[inline]
    fn reported(self) -> Option<f32> {
        Some(self)
    }
}
