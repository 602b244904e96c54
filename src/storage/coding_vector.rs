use crate::coding::field::{Element, Field, FieldArithmetic};
use std::ops::Index;

/// Coefficients describing how the source symbols are mixed into one payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodingVector {
    coefficients: Vec<Element>,
}

impl CodingVector {
    /// The all-zero vector over `len` symbols
    pub fn zero(len: usize) -> Self {
        Self {
            coefficients: vec![0; len],
        }
    }

    /// The unit vector selecting symbol `index`
    pub fn unit(len: usize, index: usize) -> Self {
        let mut vector = Self::zero(len);
        vector.coefficients[index] = 1;
        vector
    }

    /// Wrap an explicit coefficient list
    pub fn from_coefficients(coefficients: Vec<Element>) -> Self {
        Self { coefficients }
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether the vector covers no symbols at all
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Coefficient for symbol `index`
    #[inline]
    pub fn get(&self, index: usize) -> Element {
        self.coefficients[index]
    }

    /// Overwrite the coefficient for symbol `index`
    #[inline]
    pub fn set(&mut self, index: usize, value: Element) {
        self.coefficients[index] = value;
    }

    /// Coefficients in symbol order
    pub fn as_slice(&self) -> &[Element] {
        &self.coefficients
    }

    /// Consume into the raw coefficients
    pub fn into_inner(self) -> Vec<Element> {
        self.coefficients
    }

    /// True when every coefficient is zero
    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0)
    }

    /// Index of the lowest nonzero coefficient
    pub fn first_nonzero(&self) -> Option<usize> {
        self.coefficients.iter().position(|&c| c != 0)
    }

    /// Number of nonzero coefficients
    pub fn non_zeros(&self) -> usize {
        self.coefficients.iter().filter(|&&c| c != 0).count()
    }

    /// If this is the unit vector `e_i`, returns `i`
    pub fn unit_index(&self) -> Option<usize> {
        let index = self.first_nonzero()?;
        let rest_zero = self.coefficients[index + 1..].iter().all(|&c| c == 0);
        (self.coefficients[index] == 1 && rest_zero).then_some(index)
    }

    /// `self += factor * other` over `field`
    pub fn add_scaled(&mut self, field: Field, other: &Self, factor: Element) {
        if factor == 0 {
            return;
        }
        for (a, &b) in self.coefficients.iter_mut().zip(other.coefficients.iter()) {
            if b != 0 {
                *a = field.add(*a, field.multiply(b, factor));
            }
        }
    }

    /// Multiply every coefficient by `factor`
    pub fn scale(&mut self, field: Field, factor: Element) {
        for c in self.coefficients.iter_mut() {
            *c = field.multiply(*c, factor);
        }
    }
}

impl Index<usize> for CodingVector {
    type Output = Element;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coefficients[index]
    }
}

impl From<Vec<Element>> for CodingVector {
    fn from(coefficients: Vec<Element>) -> Self {
        Self::from_coefficients(coefficients)
    }
}

impl AsRef<[Element]> for CodingVector {
    fn as_ref(&self) -> &[Element] {
        &self.coefficients
    }
}
