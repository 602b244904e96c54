//! Random Linear Network Coding (RLNC) implementation

mod decoder;
mod encoder;
mod matrix;

pub use decoder::RlncDecoder;
pub use encoder::RlncEncoder;
pub use matrix::{Contribution, DecodingMatrix, PivotRow};

use crate::coding::config::CoderConfig;
use crate::coding::field::Field;
use crate::coding::traits::CodingError;

/// Build an encoder for `symbols` symbols of `symbol_size` bytes over `field`
pub fn encoder(
    field: Field,
    symbols: usize,
    symbol_size: usize,
) -> Result<RlncEncoder, CodingError> {
    RlncEncoder::new(CoderConfig::new(field, symbols, symbol_size))
}

/// Build a decoder for `symbols` symbols of `symbol_size` bytes over `field`
pub fn decoder(
    field: Field,
    symbols: usize,
    symbol_size: usize,
) -> Result<RlncDecoder, CodingError> {
    RlncDecoder::new(CoderConfig::new(field, symbols, symbol_size))
}
