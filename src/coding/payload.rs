//! Wire format for coded and systematic payloads
//!
//! A coded body is the coding vector followed by the raw symbol data. The
//! vector uses a fixed width per field: one bit per coefficient for GF(2)
//! (packed LSB first), one byte for GF(2^8), two little-endian bytes for
//! GF(2^16).
//!
//! Framed payloads prefix a kind byte:
//!
//! ```text
//! coded:      [0x00][coefficients][data]
//! systematic: [0x01][index: u32 LE][data]
//! ```

use crate::coding::field::{Element, Field, FieldArithmetic};
use crate::coding::traits::CodingError;
use crate::storage::CodingVector;

const KIND_CODED: u8 = 0x00;
const KIND_SYSTEMATIC: u8 = 0x01;
const INDEX_SIZE: usize = 4;

/// A payload as produced by an encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A linear combination of the source symbols
    Coded {
        /// How the symbols were mixed
        vector: CodingVector,
        /// The mixed data
        data: Vec<u8>,
    },
    /// Source symbol `index`, sent unmixed
    Systematic {
        /// Index of the source symbol
        index: usize,
        /// The original symbol data
        data: Vec<u8>,
    },
}

impl Payload {
    /// Symbol data carried by the payload
    pub fn data(&self) -> &[u8] {
        match self {
            Payload::Coded { data, .. } | Payload::Systematic { data, .. } => data,
        }
    }

    /// Whether this payload carries an original symbol
    pub fn is_systematic(&self) -> bool {
        matches!(self, Payload::Systematic { .. })
    }
}

/// Serializer for payload bodies of one coder geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadCodec {
    field: Field,
    symbols: usize,
    symbol_size: usize,
}

fn ensure_len(bytes: &[u8], expected: usize) -> Result<(), CodingError> {
    if bytes.len() < expected {
        return Err(CodingError::TruncatedPayload {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

impl PayloadCodec {
    /// Create a codec for `symbols` symbols of `symbol_size` bytes over `field`
    pub fn new(field: Field, symbols: usize, symbol_size: usize) -> Self {
        Self {
            field,
            symbols,
            symbol_size,
        }
    }

    /// Bytes taken by one serialized coding vector
    pub fn vector_size(&self) -> usize {
        match self.field.bits() {
            1 => self.symbols.div_ceil(8),
            bits => self.symbols * (bits as usize / 8),
        }
    }

    /// Bytes taken by an unframed coded body
    pub fn body_size(&self) -> usize {
        self.vector_size() + self.symbol_size
    }

    /// Largest framed payload this codec produces
    pub fn max_payload_size(&self) -> usize {
        1 + self.vector_size().max(INDEX_SIZE) + self.symbol_size
    }

    /// Serialize a coding vector and its data
    pub fn encode(&self, vector: &CodingVector, data: &[u8]) -> Result<Vec<u8>, CodingError> {
        let mut out = Vec::with_capacity(self.body_size());
        self.encode_into(vector, data, &mut out)?;
        Ok(out)
    }

    /// Append the serialized body to `out`
    pub fn encode_into(
        &self,
        vector: &CodingVector,
        data: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), CodingError> {
        let in_field = vector.as_slice().iter().all(|&c| self.field.contains(c));
        if vector.len() != self.symbols || !in_field {
            return Err(CodingError::InvalidCoefficients);
        }
        if data.len() != self.symbol_size {
            return Err(CodingError::InvalidSymbolSize);
        }

        match self.field.bits() {
            1 => {
                let start = out.len();
                out.resize(start + self.vector_size(), 0);
                for (i, &c) in vector.as_slice().iter().enumerate() {
                    if c != 0 {
                        out[start + i / 8] |= 1 << (i % 8);
                    }
                }
            }
            8 => out.extend(vector.as_slice().iter().map(|&c| c as u8)),
            _ => {
                for &c in vector.as_slice() {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
        }

        out.extend_from_slice(data);
        Ok(())
    }

    /// Parse a body produced by [`PayloadCodec::encode`].
    ///
    /// The body must be exactly [`PayloadCodec::body_size`] bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<(CodingVector, Vec<u8>), CodingError> {
        ensure_len(bytes, self.body_size())?;
        if bytes.len() != self.body_size() {
            return Err(CodingError::InvalidPacketFormat);
        }

        let (head, tail) = bytes.split_at(self.vector_size());
        let coefficients: Vec<Element> = match self.field.bits() {
            1 => {
                // Padding bits past the last symbol must be clear
                let used = self.symbols % 8;
                if used != 0 && head[head.len() - 1] >> used != 0 {
                    return Err(CodingError::InvalidPacketFormat);
                }
                (0..self.symbols)
                    .map(|i| ((head[i / 8] >> (i % 8)) & 1) as Element)
                    .collect()
            }
            8 => head.iter().map(|&b| b as Element).collect(),
            _ => head
                .chunks_exact(2)
                .map(|w| u16::from_le_bytes([w[0], w[1]]))
                .collect(),
        };

        Ok((CodingVector::from_coefficients(coefficients), tail.to_vec()))
    }

    /// Serialize a framed payload
    pub fn to_bytes(&self, payload: &Payload) -> Result<Vec<u8>, CodingError> {
        let mut out = Vec::with_capacity(self.max_payload_size());
        match payload {
            Payload::Coded { vector, data } => {
                out.push(KIND_CODED);
                self.encode_into(vector, data, &mut out)?;
            }
            Payload::Systematic { index, data } => {
                if *index >= self.symbols {
                    return Err(CodingError::InvalidIndex {
                        index: *index,
                        symbols: self.symbols,
                    });
                }
                if data.len() != self.symbol_size {
                    return Err(CodingError::InvalidSymbolSize);
                }
                let tag = u32::try_from(*index).map_err(|_| CodingError::InvalidParameters)?;
                out.push(KIND_SYSTEMATIC);
                out.extend_from_slice(&tag.to_le_bytes());
                out.extend_from_slice(data);
            }
        }
        Ok(out)
    }

    /// Parse a framed payload; trailing bytes are ignored
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Payload, CodingError> {
        ensure_len(bytes, 1)?;

        match bytes[0] {
            KIND_CODED => {
                let end = 1 + self.body_size();
                ensure_len(bytes, end)?;
                let (vector, data) = self.decode(&bytes[1..end])?;
                Ok(Payload::Coded { vector, data })
            }
            KIND_SYSTEMATIC => {
                ensure_len(bytes, 1 + INDEX_SIZE + self.symbol_size)?;
                let index = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
                if index >= self.symbols {
                    return Err(CodingError::InvalidIndex {
                        index,
                        symbols: self.symbols,
                    });
                }
                let start = 1 + INDEX_SIZE;
                let data = bytes[start..start + self.symbol_size].to_vec();
                Ok(Payload::Systematic { index, data })
            }
            _ => Err(CodingError::InvalidPacketFormat),
        }
    }
}
