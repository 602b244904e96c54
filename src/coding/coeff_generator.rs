//! Coding vector generation with configurable density

use crate::coding::field::{Element, Field, FieldArithmetic};
use crate::coding::traits::CodingError;
use crate::storage::CodingVector;
use rand::Rng;

/// Probability that a generated coefficient is nonzero, in `(0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Density(f64);

impl Density {
    /// Every coefficient nonzero
    pub const FULL: Density = Density(1.0);

    /// Validate a raw density
    pub fn new(density: f64) -> Result<Self, CodingError> {
        if density > 0.0 && density <= 1.0 {
            Ok(Self(density))
        } else {
            Err(CodingError::InvalidDensity(density))
        }
    }

    /// Default density for a field.
    ///
    /// Over GF(2) the only nonzero element is 1, so full density would emit the
    /// all-ones vector every time.
    pub fn default_for(field: Field) -> Self {
        match field {
            Field::Binary(_) => Density(0.5),
            _ => Self::FULL,
        }
    }

    /// Raw probability
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Coefficient generator for RLNC coding vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoeffGenerator {
    field: Field,
    density: Density,
}

impl CoeffGenerator {
    /// Create a generator with the field's default density
    pub fn new(field: Field) -> Self {
        Self {
            field,
            density: Density::default_for(field),
        }
    }

    /// Create a generator with an explicit density
    pub fn with_density(field: Field, density: Density) -> Self {
        Self { field, density }
    }

    /// Field the coefficients are drawn from
    pub fn field(&self) -> Field {
        self.field
    }

    /// Get the current density
    pub fn density(&self) -> Density {
        self.density
    }

    /// Update the density for future vectors
    pub fn set_density(&mut self, density: Density) {
        self.density = density;
    }

    /// Draw a uniformly random nonzero element
    pub fn nonzero_coefficient<R: Rng + ?Sized>(&self, rng: &mut R) -> Element {
        rng.gen_range(1..=self.field.max_element())
    }

    /// Generate a coding vector over `symbols` symbols.
    ///
    /// Each coefficient is nonzero with probability `density`, drawn uniformly
    /// from the nonzero elements. The all-zero vector is never returned.
    pub fn generate_coefficients<R: Rng + ?Sized>(
        &self,
        symbols: usize,
        rng: &mut R,
    ) -> CodingVector {
        self.generate_masked(symbols, |_| true, rng)
    }

    /// Generate a coding vector that is zero wherever `active` is false.
    ///
    /// Returns the all-zero vector only when no position is active.
    pub fn generate_masked<R, F>(&self, symbols: usize, active: F, rng: &mut R) -> CodingVector
    where
        R: Rng + ?Sized,
        F: Fn(usize) -> bool,
    {
        let density = self.density.get();
        if !(0..symbols).any(&active) {
            return CodingVector::zero(symbols);
        }

        loop {
            let coefficients: Vec<Element> = (0..symbols)
                .map(|i| {
                    if active(i) && (density >= 1.0 || rng.gen_bool(density)) {
                        self.nonzero_coefficient(rng)
                    } else {
                        0
                    }
                })
                .collect();

            let vector = CodingVector::from_coefficients(coefficients);
            if !vector.is_zero() {
                return vector;
            }
        }
    }
}
