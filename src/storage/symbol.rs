use crate::coding::field::{Element, Field, FieldArithmetic};
use std::ops::{Index, IndexMut};

/// A symbol is a fixed-size chunk of data in a network coding context
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol {
    data: Vec<u8>,
}

impl Symbol {
    /// Create a zero symbol of the given size
    pub fn zero(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    /// Create a new symbol from existing data
    pub fn from_data(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Create a new symbol by copying a slice
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            data: slice.to_vec(),
        }
    }

    /// Get the size of the symbol in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the symbol holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the underlying data as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the underlying data
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Overwrite the contents with `src`, keeping this allocation
    pub fn copy_from(&mut self, src: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(src);
    }

    /// Add another symbol to this one (element-wise XOR in characteristic 2)
    pub fn add_assign(&mut self, other: &Self) {
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a ^= *b;
        }
    }

    /// `self += factor * other` over `field`
    pub fn add_scaled(&mut self, field: Field, other: &Self, factor: Element) {
        field.multiply_add(&mut self.data, &other.data, factor);
    }

    /// Scale this symbol by a field element
    pub fn scale(&mut self, field: Field, factor: Element) {
        field.scale(&mut self.data, factor);
    }

    /// Create a copy of this symbol scaled by a field element
    pub fn scaled(&self, field: Field, factor: Element) -> Self {
        let mut result = self.clone();
        result.scale(field, factor);
        result
    }
}

impl Index<usize> for Symbol {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for Symbol {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl From<Vec<u8>> for Symbol {
    fn from(data: Vec<u8>) -> Self {
        Self::from_data(data)
    }
}

impl From<Symbol> for Vec<u8> {
    fn from(symbol: Symbol) -> Self {
        symbol.into_inner()
    }
}

impl AsRef<[u8]> for Symbol {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for Symbol {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
