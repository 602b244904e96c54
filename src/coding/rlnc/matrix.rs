//! Incremental Gaussian elimination with RREF maintenance
//!
//! The matrix is an arena of one slot per source symbol, addressed by pivot
//! column. A filled slot holds a row whose pivot coefficient is 1 and which is
//! zero at every other pivot column, so a full-rank matrix is the identity and
//! every row's data is the corresponding source symbol.

use crate::coding::field::{Field, FieldArithmetic};
use crate::coding::traits::CodingError;
use crate::storage::{CodingVector, Symbol};
use log::trace;

/// Outcome of feeding one row into the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// The row became the pivot for this symbol index
    Pivot(usize),
    /// The row was linearly dependent on what is already known
    Redundant,
}

impl Contribution {
    /// Whether the row increased the rank
    pub fn is_innovative(self) -> bool {
        matches!(self, Contribution::Pivot(_))
    }
}

/// A reduced row of the decoding matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    vector: CodingVector,
    data: Symbol,
}

impl PivotRow {
    /// Coefficients of the row
    pub fn vector(&self) -> &CodingVector {
        &self.vector
    }

    /// Data of the row
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Whether the row is a fully decoded source symbol
    pub fn is_decoded(&self) -> bool {
        self.vector.unit_index().is_some()
    }
}

/// Decoding matrix kept in reduced row echelon form
#[derive(Debug, Clone)]
pub struct DecodingMatrix {
    field: Field,
    symbol_size: usize,
    /// Pivot rows indexed by pivot column
    slots: Vec<Option<PivotRow>>,
    /// Caller-supplied storage, adopted when the slot is filled
    storage: Vec<Option<Symbol>>,
    rank: usize,
}

impl DecodingMatrix {
    /// Create an empty matrix for `symbols` symbols of `symbol_size` bytes
    pub fn new(field: Field, symbols: usize, symbol_size: usize) -> Self {
        Self {
            field,
            symbol_size,
            slots: vec![None; symbols],
            storage: vec![None; symbols],
            rank: 0,
        }
    }

    /// Field the matrix is reduced over
    pub fn field(&self) -> Field {
        self.field
    }

    /// Number of columns (source symbols)
    #[inline]
    pub fn symbols(&self) -> usize {
        self.slots.len()
    }

    /// Get the current rank of the matrix
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Check if the matrix is full rank
    #[inline]
    pub fn is_full_rank(&self) -> bool {
        self.rank == self.slots.len()
    }

    /// Pivot row for a column, if any
    pub fn row(&self, index: usize) -> Option<&PivotRow> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Whether `index` is a pivot column
    pub fn is_pivot(&self, index: usize) -> bool {
        self.row(index).is_some()
    }

    /// Whether source symbol `index` is fully decoded
    pub fn is_decoded(&self, index: usize) -> bool {
        self.row(index).is_some_and(PivotRow::is_decoded)
    }

    /// Number of fully decoded source symbols
    pub fn decoded(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|row| row.is_decoded())
            .count()
    }

    /// Check if a coding vector would increase the rank
    pub fn is_innovative(&self, vector: &CodingVector) -> bool {
        if vector.len() != self.symbols() || self.is_full_rank() {
            return false;
        }

        let mut reduced = vector.clone();
        for (col, slot) in self.slots.iter().enumerate() {
            if let Some(row) = slot {
                let factor = reduced.get(col);
                reduced.add_scaled(self.field, &row.vector, factor);
            }
        }
        !reduced.is_zero()
    }

    /// Provide the buffer that will hold the row for `index`.
    ///
    /// If the slot is already filled its data is moved into `buffer`.
    pub fn set_storage(&mut self, index: usize, buffer: Vec<u8>) -> Result<(), CodingError> {
        self.check_index(index)?;
        if buffer.len() != self.symbol_size {
            return Err(CodingError::InvalidSymbolSize);
        }

        let mut buffer = Symbol::from_data(buffer);
        match self.slots[index].as_mut() {
            Some(row) => {
                buffer.copy_from(row.data.as_slice());
                row.data = buffer;
            }
            None => self.storage[index] = Some(buffer),
        }
        Ok(())
    }

    /// Reduce a coded row against the matrix and store it if innovative
    pub fn process_row(
        &mut self,
        mut vector: CodingVector,
        mut data: Symbol,
    ) -> Result<Contribution, CodingError> {
        self.check_row(&vector, data.as_slice())?;

        // Forward elimination against existing pivots
        let field = self.field;
        for (col, slot) in self.slots.iter().enumerate() {
            let Some(row) = slot else { continue };
            let factor = vector.get(col);
            if factor == 0 {
                continue;
            }
            vector.add_scaled(field, &row.vector, factor);
            data.add_scaled(field, &row.data, factor);
        }

        let Some(pivot) = vector.first_nonzero() else {
            trace!("dropping redundant row at rank {}", self.rank);
            return Ok(Contribution::Redundant);
        };

        let inverse = field
            .invert(vector.get(pivot))
            .ok_or(CodingError::DecodingFailed)?;
        vector.scale(field, inverse);
        data.scale(field, inverse);

        self.back_substitute(pivot, &vector, &data);
        self.install(pivot, vector, data);
        trace!("new pivot {} at rank {}", pivot, self.rank);

        Ok(Contribution::Pivot(pivot))
    }

    /// Install an original symbol directly as the pivot for `index`
    pub fn insert_uncoded(
        &mut self,
        index: usize,
        data: &[u8],
    ) -> Result<Contribution, CodingError> {
        self.check_index(index)?;
        if data.len() != self.symbol_size {
            return Err(CodingError::InvalidSymbolSize);
        }

        let vector = CodingVector::unit(self.symbols(), index);
        let data = Symbol::from_slice(data);

        match self.slots[index].as_ref().map(PivotRow::is_decoded) {
            Some(true) => {
                trace!("symbol {} already decoded, ignoring uncoded copy", index);
                return Ok(Contribution::Redundant);
            }
            // A coded row holds this column; the unit row may still add rank
            Some(false) => return self.process_row(vector, data),
            None => {}
        }

        self.back_substitute(index, &vector, &data);
        self.install(index, vector, data);
        trace!("uncoded symbol {} at rank {}", index, self.rank);

        Ok(Contribution::Pivot(index))
    }

    /// Clear the pivot column from every existing row using the new row
    fn back_substitute(&mut self, pivot: usize, vector: &CodingVector, data: &Symbol) {
        let field = self.field;
        for row in self.slots.iter_mut().flatten() {
            let factor = row.vector.get(pivot);
            if factor == 0 {
                continue;
            }
            row.vector.add_scaled(field, vector, factor);
            row.data.add_scaled(field, data, factor);
        }
    }

    fn install(&mut self, index: usize, vector: CodingVector, data: Symbol) {
        let data = match self.storage[index].take() {
            Some(mut buffer) => {
                buffer.copy_from(data.as_slice());
                buffer
            }
            None => data,
        };
        self.slots[index] = Some(PivotRow { vector, data });
        self.rank += 1;
    }

    /// Release the decoded symbols, one entry per slot.
    ///
    /// Empty slots and slots still holding a coded combination are `None`.
    pub fn into_symbols(self) -> Vec<Option<Vec<u8>>> {
        self.slots
            .into_iter()
            .map(|slot| {
                slot.filter(PivotRow::is_decoded)
                    .map(|row| row.data.into_inner())
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), CodingError> {
        if index >= self.symbols() {
            return Err(CodingError::InvalidIndex {
                index,
                symbols: self.symbols(),
            });
        }
        Ok(())
    }

    fn check_row(&self, vector: &CodingVector, data: &[u8]) -> Result<(), CodingError> {
        if vector.len() != self.symbols()
            || !vector.as_slice().iter().all(|&c| self.field.contains(c))
        {
            return Err(CodingError::InvalidCoefficients);
        }
        if data.len() != self.symbol_size {
            return Err(CodingError::InvalidSymbolSize);
        }
        Ok(())
    }
}
