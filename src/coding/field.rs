//! Finite field arithmetic over GF(2), GF(2^8) and GF(2^16)
//!
//! Each field is a zero-sized variant behind the [`FieldArithmetic`] trait.
//! Elements are carried as [`Element`] regardless of the field; inside a
//! symbol buffer GF(2) packs one element per bit, GF(2^8) one per byte and
//! GF(2^16) one per little-endian 2-byte word.

use binius_field::underlier::WithUnderlier;
use binius_field::{BinaryField16b, BinaryField8b, Field as BiniusField};
use enum_dispatch::enum_dispatch;
use std::fmt;

/// A field element, wide enough for every supported field
pub type Element = u16;

/// Arithmetic shared by every supported binary extension field
#[enum_dispatch]
pub trait FieldArithmetic {
    /// Number of bits in one field element
    fn bits(&self) -> u32;

    /// Multiply two field elements
    fn multiply(&self, a: Element, b: Element) -> Element;

    /// Multiplicative inverse, `None` for zero
    fn invert(&self, a: Element) -> Option<Element>;

    /// `dst += factor * src`, elementwise over a symbol buffer
    fn multiply_add(&self, dst: &mut [u8], src: &[u8], factor: Element);

    /// `data *= factor`, elementwise over a symbol buffer
    fn scale(&self, data: &mut [u8], factor: Element);

    /// Add two field elements.
    ///
    /// All supported fields have characteristic 2, so this is also subtraction.
    fn add(&self, a: Element, b: Element) -> Element {
        a ^ b
    }

    /// Largest element of the field, i.e. `order - 1`
    fn max_element(&self) -> Element {
        ((1u32 << self.bits()) - 1) as Element
    }

    /// Whether `a` is a valid element of this field
    fn contains(&self, a: Element) -> bool {
        a <= self.max_element()
    }

    /// Byte granularity a symbol buffer must respect
    fn element_size(&self) -> usize {
        (self.bits() as usize).div_ceil(8)
    }
}

/// GF(2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binary;

/// GF(2^8), backed by `BinaryField8b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binary8;

/// GF(2^16), backed by `BinaryField16b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binary16;

#[inline]
fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= *s;
    }
}

impl FieldArithmetic for Binary {
    fn bits(&self) -> u32 {
        1
    }

    fn multiply(&self, a: Element, b: Element) -> Element {
        a & b & 1
    }

    fn invert(&self, a: Element) -> Option<Element> {
        (a & 1 == 1).then_some(1)
    }

    fn multiply_add(&self, dst: &mut [u8], src: &[u8], factor: Element) {
        if factor & 1 == 1 {
            xor_into(dst, src);
        }
    }

    fn scale(&self, data: &mut [u8], factor: Element) {
        if factor & 1 == 0 {
            data.fill(0);
        }
    }
}

#[inline]
fn gf8(a: Element) -> BinaryField8b {
    BinaryField8b::from_underlier(a as u8)
}

#[inline]
fn gf16(a: Element) -> BinaryField16b {
    BinaryField16b::from_underlier(a)
}

/// All 256 products `b * factor`, indexed by `b`
fn product_table(factor: Element) -> [u8; 256] {
    let factor = gf8(factor);
    std::array::from_fn(|b| (BinaryField8b::from_underlier(b as u8) * factor).to_underlier())
}

impl FieldArithmetic for Binary8 {
    fn bits(&self) -> u32 {
        8
    }

    fn multiply(&self, a: Element, b: Element) -> Element {
        (gf8(a) * gf8(b)).to_underlier() as Element
    }

    fn invert(&self, a: Element) -> Option<Element> {
        gf8(a).invert().map(|inv| inv.to_underlier() as Element)
    }

    fn multiply_add(&self, dst: &mut [u8], src: &[u8], factor: Element) {
        match factor {
            0 => {}
            1 => xor_into(dst, src),
            _ => {
                let table = product_table(factor);
                for (d, s) in dst.iter_mut().zip(src.iter()) {
                    *d ^= table[*s as usize];
                }
            }
        }
    }

    fn scale(&self, data: &mut [u8], factor: Element) {
        match factor {
            0 => data.fill(0),
            1 => {}
            _ => {
                let table = product_table(factor);
                for byte in data.iter_mut() {
                    *byte = table[*byte as usize];
                }
            }
        }
    }
}

impl FieldArithmetic for Binary16 {
    fn bits(&self) -> u32 {
        16
    }

    fn multiply(&self, a: Element, b: Element) -> Element {
        (gf16(a) * gf16(b)).to_underlier()
    }

    fn invert(&self, a: Element) -> Option<Element> {
        gf16(a).invert().map(|inv| inv.to_underlier())
    }

    fn multiply_add(&self, dst: &mut [u8], src: &[u8], factor: Element) {
        match factor {
            0 => {}
            1 => xor_into(dst, src),
            _ => {
                let factor = gf16(factor);
                for (d, s) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
                    let word = u16::from_le_bytes([s[0], s[1]]);
                    if word == 0 {
                        continue;
                    }
                    let product = (gf16(word) * factor).to_underlier();
                    let sum = u16::from_le_bytes([d[0], d[1]]) ^ product;
                    d.copy_from_slice(&sum.to_le_bytes());
                }
            }
        }
    }

    fn scale(&self, data: &mut [u8], factor: Element) {
        match factor {
            0 => data.fill(0),
            1 => {}
            _ => {
                let factor = gf16(factor);
                for chunk in data.chunks_exact_mut(2) {
                    let word = u16::from_le_bytes([chunk[0], chunk[1]]);
                    let product = (gf16(word) * factor).to_underlier();
                    chunk.copy_from_slice(&product.to_le_bytes());
                }
            }
        }
    }
}

/// The finite field a coder operates over, selected at construction
#[enum_dispatch(FieldArithmetic)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// GF(2)
    Binary(Binary),
    /// GF(2^8)
    Binary8(Binary8),
    /// GF(2^16)
    Binary16(Binary16),
}

impl Field {
    /// GF(2)
    pub const BINARY: Field = Field::Binary(Binary);
    /// GF(2^8)
    pub const BINARY8: Field = Field::Binary8(Binary8);
    /// GF(2^16)
    pub const BINARY16: Field = Field::Binary16(Binary16);

    /// Every supported field, smallest first
    pub const ALL: [Field; 3] = [Self::BINARY, Self::BINARY8, Self::BINARY16];

    /// Number of elements in the field
    pub fn order(&self) -> u32 {
        1u32 << self.bits()
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::BINARY8
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Binary(_) => write!(f, "binary"),
            Field::Binary8(_) => write!(f, "binary8"),
            Field::Binary16(_) => write!(f, "binary16"),
        }
    }
}
