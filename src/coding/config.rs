//! Coder configuration shared by encoders and decoders

use crate::coding::field::{Field, FieldArithmetic};
use crate::coding::traits::CodingError;

/// Field and block geometry of a coder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoderConfig {
    /// Field the coefficients and symbol elements live in
    pub field: Field,
    /// Number of source symbols in the block
    pub symbols: usize,
    /// Size of each symbol in bytes
    pub symbol_size: usize,
}

impl CoderConfig {
    /// Create a configuration, unchecked until [`CoderConfig::validate`]
    pub fn new(field: Field, symbols: usize, symbol_size: usize) -> Self {
        Self {
            field,
            symbols,
            symbol_size,
        }
    }

    /// Check that the block geometry is usable with the field
    pub fn validate(&self) -> Result<(), CodingError> {
        if self.symbols == 0 || self.symbol_size == 0 {
            return Err(CodingError::InvalidParameters);
        }

        // Systematic payloads tag the index as a u32
        if u32::try_from(self.symbols).is_err() {
            return Err(CodingError::InvalidParameters);
        }

        if self.symbol_size % self.field.element_size() != 0 {
            return Err(CodingError::InvalidSymbolSize);
        }

        Ok(())
    }

    /// Total bytes covered by one block
    pub fn block_size(&self) -> usize {
        self.symbols * self.symbol_size
    }
}
