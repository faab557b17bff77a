// The index and transition tables, decoded into contiguous vectors.

use crate::FormatError;
use crate::format::TransducerHeader;
use crate::reader::{ByteReader, Section};
use crate::transition::{INDEX_RECORD_SIZE, Transition, TransitionIndex, Weight};

/// Both tables of a transducer, addressed by record position.
#[derive(Debug)]
pub struct AutomatonTables<W> {
    indices: Vec<TransitionIndex<W>>,
    transitions: Vec<Transition<W>>,
}

impl<W: Weight> AutomatonTables<W> {
    /// Read `index_table_size` index records followed by
    /// `transition_table_size` transition records.
    pub fn read(
        reader: &mut ByteReader<'_>,
        header: &TransducerHeader,
    ) -> Result<Self, FormatError> {
        reader.enter(Section::IndexTable);
        let index_count = header.index_table_size as usize;
        // Never trust the declared size for the allocation.
        let mut indices =
            Vec::with_capacity(index_count.min(reader.remaining() / INDEX_RECORD_SIZE));
        for _ in 0..index_count {
            indices.push(TransitionIndex::read(reader)?);
        }

        reader.enter(Section::TransitionTable);
        let transition_count = header.transition_table_size as usize;
        let record_size = W::TRANSITION_RECORD_SIZE;
        let mut transitions =
            Vec::with_capacity(transition_count.min(reader.remaining() / record_size));
        for _ in 0..transition_count {
            transitions.push(Transition::read(reader)?);
        }

        Ok(Self {
            indices,
            transitions,
        })
    }

    pub fn index_len(&self) -> usize {
        self.indices.len()
    }

    pub fn transition_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn index_entry(&self, i: usize) -> Result<&TransitionIndex<W>, FormatError> {
        self.indices.get(i).ok_or(FormatError::IndexOutOfRange {
            table: Section::IndexTable,
            index: i,
            len: self.indices.len(),
        })
    }

    pub fn transition_entry(&self, i: usize) -> Result<&Transition<W>, FormatError> {
        self.transitions.get(i).ok_or(FormatError::IndexOutOfRange {
            table: Section::TransitionTable,
            index: i,
            len: self.transitions.len(),
        })
    }

    /// Transition record `i`, or `None` past the end of the table. Scans over
    /// a state's arcs stop there.
    #[inline]
    pub fn get_transition(&self, i: usize) -> Option<&Transition<W>> {
        self.transitions.get(i)
    }

    pub fn is_final_index(&self, i: usize) -> Result<bool, FormatError> {
        Ok(self.index_entry(i)?.is_final())
    }

    pub fn is_final_transition(&self, i: usize) -> Result<bool, FormatError> {
        Ok(self.transition_entry(i)?.is_final())
    }

    /// Final weight of the index-table state whose finality slot is `i`.
    pub fn final_weight_index(&self, i: usize) -> Result<Option<W>, FormatError> {
        Ok(self.index_entry(i)?.final_weight())
    }

    /// Final weight of the transition-table state whose marker record is `i`.
    pub fn final_weight_transition(&self, i: usize) -> Result<Option<W>, FormatError> {
        Ok(self.transition_entry(i)?.final_weight())
    }
}
