use crate::coding::rlnc::Contribution;
use thiserror::Error;

/// Error type for encoding and decoding operations
#[derive(Error, Debug, PartialEq)]
pub enum CodingError {
    #[error("Invalid parameters provided")]
    InvalidParameters,

    #[error("Symbol index {index} out of range for {symbols} symbols")]
    InvalidIndex { index: usize, symbols: usize },

    #[error("Density {0} outside (0, 1]")]
    InvalidDensity(f64),

    #[error("Not all source symbols have been set")]
    MissingSymbols,

    #[error("Truncated payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("Invalid symbol size")]
    InvalidSymbolSize,

    #[error("Invalid data size")]
    InvalidDataSize,

    #[error("Invalid packet format")]
    InvalidPacketFormat,

    #[error("Invalid coefficients")]
    InvalidCoefficients,

    #[error("Insufficient data for decoding")]
    InsufficientData,

    #[error("Buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Decoding failed")]
    DecodingFailed,
}

/// Trait for network encoders
pub trait Encoder {
    /// Get the number of source symbols
    fn symbols(&self) -> usize;

    /// Get the symbol size in bytes
    fn symbol_size(&self) -> usize;

    /// Bind source symbol `index` to a copy of `data`
    fn set_symbol(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError>;

    /// Set the probability that a generated coefficient is nonzero
    fn set_density(&mut self, density: f64) -> Result<(), CodingError>;

    /// Current coefficient density
    fn density(&self) -> f64;

    /// Generate the next serialized payload
    fn generate_payload(&mut self) -> Result<Vec<u8>, CodingError>;

    /// Upper bound on the size of a generated payload
    fn payload_size(&self) -> usize;

    /// Whether this encoder implements [`SystematicEncoder`]
    fn has_systematic_capability(&self) -> bool {
        false
    }
}

/// Trait for encoders that can send the source symbols unmixed first
pub trait SystematicEncoder: Encoder {
    /// Enable or disable the systematic phase
    fn set_systematic(&mut self, enabled: bool);

    /// Whether systematic mode is enabled
    fn is_systematic_on(&self) -> bool;

    /// Whether the next payload will be an uncoded source symbol
    fn in_systematic_phase(&self) -> bool;
}

/// Trait for network decoders
pub trait Decoder {
    /// Get the number of source symbols
    fn symbols(&self) -> usize;

    /// Get the symbol size in bytes
    fn symbol_size(&self) -> usize;

    /// Hand over the buffer that stores symbol `index`
    fn set_output_buffer(&mut self, index: usize, buffer: Vec<u8>) -> Result<(), CodingError>;

    /// Insert an original symbol received outside the coded channel
    fn read_uncoded_symbol(
        &mut self,
        data: &[u8],
        index: usize,
    ) -> Result<Contribution, CodingError>;

    /// Process one serialized payload
    fn read_payload(&mut self, payload: &[u8]) -> Result<Contribution, CodingError>;

    /// Get the current rank of the decoding matrix
    fn rank(&self) -> u32;

    /// Check if every source symbol has been recovered
    fn is_complete(&self) -> bool;

    /// Get the current decoding progress as a fraction
    fn progress(&self) -> f64 {
        if self.symbols() == 0 {
            0.0
        } else {
            self.rank() as f64 / self.symbols() as f64
        }
    }
}
