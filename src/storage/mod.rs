//! Symbol and coding vector storage

mod coding_vector;
mod symbol;

pub use coding_vector::CodingVector;
pub use symbol::Symbol;
