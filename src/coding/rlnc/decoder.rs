use crate::coding::config::CoderConfig;
use crate::coding::field::Field;
use crate::coding::payload::{Payload, PayloadCodec};
use crate::coding::rlnc::matrix::{Contribution, DecodingMatrix};
use crate::coding::traits::{CodingError, Decoder};
use crate::storage::{CodingVector, Symbol};
use log::{debug, trace};

/// Random Linear Network Coding Decoder
pub struct RlncDecoder {
    config: CoderConfig,
    matrix: DecodingMatrix,
    codec: PayloadCodec,
}

impl RlncDecoder {
    /// Create a new RLNC decoder
    pub fn new(config: CoderConfig) -> Result<Self, CodingError> {
        config.validate()?;

        Ok(Self {
            config,
            matrix: DecodingMatrix::new(config.field, config.symbols, config.symbol_size),
            codec: PayloadCodec::new(config.field, config.symbols, config.symbol_size),
        })
    }

    /// Field the decoder operates over
    pub fn field(&self) -> Field {
        self.config.field
    }

    /// Geometry of the decoder
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Upper bound on the size of an accepted payload
    pub fn payload_size(&self) -> usize {
        self.codec.max_payload_size()
    }

    /// Process a coding vector and its data received out of band
    pub fn read_coded(
        &mut self,
        vector: CodingVector,
        data: &[u8],
    ) -> Result<Contribution, CodingError> {
        let was_complete = self.matrix.is_full_rank();
        let contribution = self.matrix.process_row(vector, Symbol::from_slice(data))?;
        self.log_completion(was_complete);
        Ok(contribution)
    }

    /// Check if a coding vector would increase the rank
    pub fn is_innovative(&self, vector: &CodingVector) -> bool {
        self.matrix.is_innovative(vector)
    }

    /// Whether symbol `index` has a pivot row
    pub fn is_symbol_pivot(&self, index: usize) -> bool {
        self.matrix.is_pivot(index)
    }

    /// Whether symbol `index` is fully decoded
    pub fn is_symbol_decoded(&self, index: usize) -> bool {
        self.matrix.is_decoded(index)
    }

    /// Number of fully decoded symbols
    pub fn symbols_decoded(&self) -> usize {
        self.matrix.decoded()
    }

    /// Data of symbol `index` once it is decoded
    pub fn symbol(&self, index: usize) -> Option<&[u8]> {
        self.matrix
            .row(index)
            .filter(|row| row.is_decoded())
            .map(|row| row.data())
    }

    /// All symbols as one contiguous buffer
    pub fn copy_from_symbols(&self) -> Result<Vec<u8>, CodingError> {
        if !self.matrix.is_full_rank() {
            return Err(CodingError::InsufficientData);
        }

        let mut result = Vec::with_capacity(self.config.block_size());
        for index in 0..self.config.symbols {
            let data = self.symbol(index).ok_or(CodingError::DecodingFailed)?;
            result.extend_from_slice(data);
        }
        Ok(result)
    }

    /// Give back the output buffers, one per symbol.
    ///
    /// Only decoded symbols are returned; a symbol that is missing or still
    /// part of a coded combination is `None`.
    pub fn into_output_buffers(self) -> Vec<Option<Vec<u8>>> {
        self.matrix.into_symbols()
    }

    fn log_completion(&self, was_complete: bool) {
        if !was_complete && self.matrix.is_full_rank() {
            debug!(
                "decoding complete: {} symbols over {}",
                self.config.symbols, self.config.field
            );
        }
    }
}

impl Decoder for RlncDecoder {
    fn symbols(&self) -> usize {
        self.config.symbols
    }

    fn symbol_size(&self) -> usize {
        self.config.symbol_size
    }

    fn set_output_buffer(&mut self, index: usize, buffer: Vec<u8>) -> Result<(), CodingError> {
        self.matrix.set_storage(index, buffer)
    }

    fn read_uncoded_symbol(
        &mut self,
        data: &[u8],
        index: usize,
    ) -> Result<Contribution, CodingError> {
        let was_complete = self.matrix.is_full_rank();
        let contribution = self.matrix.insert_uncoded(index, data)?;
        self.log_completion(was_complete);
        Ok(contribution)
    }

    fn read_payload(&mut self, payload: &[u8]) -> Result<Contribution, CodingError> {
        match self.codec.from_bytes(payload)? {
            Payload::Coded { vector, data } => {
                trace!("coded payload with {} nonzero coefficients", vector.non_zeros());
                self.read_coded(vector, &data)
            }
            Payload::Systematic { index, data } => {
                trace!("systematic payload for symbol {}", index);
                self.read_uncoded_symbol(&data, index)
            }
        }
    }

    fn rank(&self) -> u32 {
        // The configured symbol count fits in a u32
        self.matrix.rank() as u32
    }

    fn is_complete(&self) -> bool {
        self.matrix.is_full_rank()
    }
}
