#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::needless_range_loop)]

pub mod coding;
pub mod storage;
pub mod utils;

pub use coding::{
    decoder, encoder, CoderConfig, CodingError, Contribution, Decoder, Encoder, Field,
    SystematicEncoder,
};
