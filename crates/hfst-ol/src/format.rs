// Transducer header parsing: the optional HFST3 container prefix and the
// fixed 56-byte optimized-lookup header.

use crate::FormatError;
use crate::reader::{ByteReader, Section};

/// Size of the optimized-lookup header in bytes.
pub const HEADER_SIZE: usize = 56;

/// Magic prefix of an HFST3 container header.
const CONTAINER_MAGIC: &[u8] = b"HFST\0";

/// Parsed optimized-lookup header.
///
/// Layout (little-endian):
/// - u16 input symbol count, u16 total symbol count
/// - u32 index table size, u32 transition table size
/// - u32 state count, u32 transition count
/// - nine property flags, each stored in a 32-bit slot (nonzero = true)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransducerHeader {
    pub input_symbol_count: u16,
    pub symbol_count: u16,
    pub index_table_size: u32,
    pub transition_table_size: u32,
    pub state_count: u32,
    pub transition_count: u32,
    pub weighted: bool,
    pub deterministic: bool,
    pub input_deterministic: bool,
    pub minimized: bool,
    pub cyclic: bool,
    pub has_epsilon_epsilon_transitions: bool,
    pub has_input_epsilon_transitions: bool,
    pub has_input_epsilon_cycles: bool,
    pub has_unweighted_input_epsilon_cycles: bool,
}

impl TransducerHeader {
    /// Read and validate the 56-byte header at the reader's position.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        reader.enter(Section::Header);
        if reader.remaining() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                section: Section::Header,
                offset: reader.position(),
                needed: HEADER_SIZE,
                available: reader.remaining(),
            });
        }

        let input_symbol_count = reader.read_u16()?;
        let symbol_count = reader.read_u16()?;
        let index_table_size = reader.read_u32()?;
        let transition_table_size = reader.read_u32()?;
        let state_count = reader.read_u32()?;
        let transition_count = reader.read_u32()?;

        let mut flag = || reader.read_u32().map(|v| v != 0);
        let header = Self {
            input_symbol_count,
            symbol_count,
            index_table_size,
            transition_table_size,
            state_count,
            transition_count,
            weighted: flag()?,
            deterministic: flag()?,
            input_deterministic: flag()?,
            minimized: flag()?,
            cyclic: flag()?,
            has_epsilon_epsilon_transitions: flag()?,
            has_input_epsilon_transitions: flag()?,
            has_input_epsilon_cycles: flag()?,
            has_unweighted_input_epsilon_cycles: flag()?,
        };

        if header.input_symbol_count > header.symbol_count {
            return Err(FormatError::InvalidHeader(format!(
                "{} input symbols declared but only {} symbols in total",
                header.input_symbol_count, header.symbol_count
            )));
        }

        Ok(header)
    }
}

/// Key/value properties of an HFST3 container header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerHeader {
    pub properties: Vec<(String, String)>,
}

impl ContainerHeader {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `Some(true)` for `HFST_OLW`, `Some(false)` for `HFST_OL`, `None` if
    /// the container does not declare an optimized-lookup type.
    pub fn weighted(&self) -> Option<bool> {
        match self.get("type")? {
            "HFST_OLW" => Some(true),
            "HFST_OL" => Some(false),
            _ => None,
        }
    }

    /// Consume the container header if the data starts with one.
    ///
    /// Format: `HFST\0`, u16 length, `\0`, then `length` bytes of
    /// null-terminated key/value pairs.
    pub fn read_optional(reader: &mut ByteReader<'_>) -> Result<Option<Self>, FormatError> {
        if reader.peek(CONTAINER_MAGIC.len()) != Some(CONTAINER_MAGIC) {
            return Ok(None);
        }
        reader.enter(Section::Container);
        reader.take(CONTAINER_MAGIC.len())?;
        let length = reader.read_u16()? as usize;
        if reader.read_u8()? != 0 {
            return Err(FormatError::InvalidContainer(
                "missing separator after header length".to_string(),
            ));
        }

        let body = reader.take(length)?;
        let mut fields = body.split(|&b| b == 0);
        let mut properties = Vec::new();
        loop {
            let Some(key) = fields.next() else { break };
            if key.is_empty() {
                // Trailing terminator of the last value.
                continue;
            }
            let value = fields.next().ok_or_else(|| {
                FormatError::InvalidContainer(format!(
                    "property {:?} has no value",
                    String::from_utf8_lossy(key)
                ))
            })?;
            properties.push((
                String::from_utf8_lossy(key).into_owned(),
                String::from_utf8_lossy(value).into_owned(),
            ));
        }

        if let Some(kind) = properties.iter().find(|(k, _)| k == "type").map(|(_, v)| v) {
            if kind != "HFST_OL" && kind != "HFST_OLW" {
                return Err(FormatError::InvalidContainer(format!(
                    "unsupported transducer type {kind:?}"
                )));
            }
        }

        Ok(Some(Self { properties }))
    }
}
