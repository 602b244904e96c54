//! Network coding implementations

/// Coding vector generation
pub mod coeff_generator;
/// Coder geometry
pub mod config;
/// Finite field arithmetic
pub mod field;
/// Payload serialization
pub mod payload;
/// Random Linear Network Coding implementation
pub mod rlnc;
/// Core coding traits and error types
pub mod traits;

pub use coeff_generator::{CoeffGenerator, Density};
pub use config::CoderConfig;
pub use field::{Element, Field, FieldArithmetic};
pub use payload::{Payload, PayloadCodec};
pub use rlnc::{decoder, encoder, Contribution, RlncDecoder, RlncEncoder};
pub use traits::{CodingError, Decoder, Encoder, SystematicEncoder};
