use crate::coding::coeff_generator::{CoeffGenerator, Density};
use crate::coding::config::CoderConfig;
use crate::coding::field::Field;
use crate::coding::payload::{Payload, PayloadCodec};
use crate::coding::traits::{CodingError, Encoder, SystematicEncoder};
use crate::storage::{CodingVector, Symbol};
use crate::utils::CodingRng;
use log::debug;
use rand::RngCore;

/// Random Linear Network Coding Encoder
pub struct RlncEncoder<R = CodingRng> {
    config: CoderConfig,
    /// Source symbols, bound one by one
    data: Vec<Option<Symbol>>,
    /// Number of bound symbols
    bound: usize,
    generator: CoeffGenerator,
    codec: PayloadCodec,
    systematic: bool,
    /// Next symbol to send during the systematic phase
    systematic_index: usize,
    rng: R,
}

impl RlncEncoder<CodingRng> {
    /// Create a new RLNC encoder
    pub fn new(config: CoderConfig) -> Result<Self, CodingError> {
        Self::with_rng(config, CodingRng::new())
    }

    /// Create a new RLNC encoder with a specific seed for deterministic behavior
    pub fn with_seed(config: CoderConfig, seed: [u8; 32]) -> Result<Self, CodingError> {
        Self::with_rng(config, CodingRng::from_seed(seed))
    }
}

impl<R: RngCore> RlncEncoder<R> {
    /// Create a new RLNC encoder drawing coefficients from `rng`
    pub fn with_rng(config: CoderConfig, rng: R) -> Result<Self, CodingError> {
        config.validate()?;

        Ok(Self {
            config,
            data: vec![None; config.symbols],
            bound: 0,
            generator: CoeffGenerator::new(config.field),
            codec: PayloadCodec::new(config.field, config.symbols, config.symbol_size),
            systematic: false,
            systematic_index: 0,
            rng,
        })
    }

    /// Field the encoder operates over
    pub fn field(&self) -> Field {
        self.config.field
    }

    /// Geometry of the encoder
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Number of bound source symbols
    pub fn rank(&self) -> usize {
        self.bound
    }

    /// Bind every symbol from one contiguous buffer
    pub fn set_symbols(&mut self, data: &[u8]) -> Result<(), CodingError> {
        if data.len() != self.config.block_size() {
            return Err(CodingError::InvalidDataSize);
        }

        for (slot, chunk) in self
            .data
            .iter_mut()
            .zip(data.chunks_exact(self.config.symbol_size))
        {
            *slot = Some(Symbol::from_slice(chunk));
        }
        self.bound = self.config.symbols;

        Ok(())
    }

    /// Linear combination of the source symbols described by `vector`.
    ///
    /// Unbound symbols must carry a zero coefficient.
    pub fn encode_symbol(&self, vector: &CodingVector) -> Result<Vec<u8>, CodingError> {
        if vector.len() != self.config.symbols {
            return Err(CodingError::InvalidCoefficients);
        }

        let field = self.config.field;
        let mut encoded = Symbol::zero(self.config.symbol_size);

        for (i, slot) in self.data.iter().enumerate() {
            let coefficient = vector.get(i);
            if coefficient == 0 {
                continue;
            }
            let symbol = slot.as_ref().ok_or(CodingError::MissingSymbols)?;
            encoded.add_scaled(field, symbol, coefficient);
        }

        Ok(encoded.into_inner())
    }

    /// Generate the next payload in structured form.
    ///
    /// Coded payloads mix only the symbols bound so far, so generation can
    /// start before the block is complete. The systematic phase needs every
    /// symbol bound.
    pub fn encode_packet(&mut self) -> Result<Payload, CodingError> {
        if self.in_systematic_phase() {
            if self.bound < self.config.symbols {
                return Err(CodingError::MissingSymbols);
            }
            let index = self.systematic_index;
            let data = self.data[index]
                .as_ref()
                .ok_or(CodingError::MissingSymbols)?
                .as_slice()
                .to_vec();
            self.systematic_index += 1;
            return Ok(Payload::Systematic { index, data });
        }

        if self.bound == 0 {
            return Err(CodingError::MissingSymbols);
        }

        let data = &self.data;
        let vector = if self.bound == self.config.symbols {
            self.generator
                .generate_coefficients(self.config.symbols, &mut self.rng)
        } else {
            self.generator
                .generate_masked(self.config.symbols, |i| data[i].is_some(), &mut self.rng)
        };
        let data = self.encode_symbol(&vector)?;

        Ok(Payload::Coded { vector, data })
    }

    /// Write the next payload into `buffer`, returning the bytes used
    pub fn write_payload(&mut self, buffer: &mut [u8]) -> Result<usize, CodingError> {
        let required = self.codec.max_payload_size();
        if buffer.len() < required {
            return Err(CodingError::BufferTooSmall {
                required,
                actual: buffer.len(),
            });
        }

        let bytes = self.generate_payload()?;
        buffer[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl<R: RngCore> Encoder for RlncEncoder<R> {
    fn symbols(&self) -> usize {
        self.config.symbols
    }

    fn symbol_size(&self) -> usize {
        self.config.symbol_size
    }

    fn set_symbol(&mut self, index: usize, data: &[u8]) -> Result<(), CodingError> {
        if index >= self.config.symbols {
            return Err(CodingError::InvalidIndex {
                index,
                symbols: self.config.symbols,
            });
        }
        if data.len() != self.config.symbol_size {
            return Err(CodingError::InvalidSymbolSize);
        }

        if self.data[index].is_none() {
            self.bound += 1;
        }
        self.data[index] = Some(Symbol::from_slice(data));

        Ok(())
    }

    fn set_density(&mut self, density: f64) -> Result<(), CodingError> {
        let density = Density::new(density)?;
        debug!("encoder density set to {}", density.get());
        self.generator.set_density(density);
        Ok(())
    }

    fn density(&self) -> f64 {
        self.generator.density().get()
    }

    fn generate_payload(&mut self) -> Result<Vec<u8>, CodingError> {
        let payload = self.encode_packet()?;
        self.codec.to_bytes(&payload)
    }

    fn payload_size(&self) -> usize {
        self.codec.max_payload_size()
    }

    fn has_systematic_capability(&self) -> bool {
        true
    }
}

impl<R: RngCore> SystematicEncoder for RlncEncoder<R> {
    fn set_systematic(&mut self, enabled: bool) {
        debug!("encoder systematic mode {}", if enabled { "on" } else { "off" });
        self.systematic = enabled;
    }

    fn is_systematic_on(&self) -> bool {
        self.systematic
    }

    fn in_systematic_phase(&self) -> bool {
        self.systematic && self.systematic_index < self.config.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::field::FieldArithmetic;

    fn config(field: Field, symbols: usize, symbol_size: usize) -> CoderConfig {
        CoderConfig::new(field, symbols, symbol_size)
    }

    fn filled(field: Field, symbols: usize, symbol_size: usize) -> RlncEncoder {
        let config = config(field, symbols, symbol_size);
        let mut encoder = RlncEncoder::with_seed(config, [7; 32]).unwrap();
        let data: Vec<u8> = (0..symbols * symbol_size).map(|i| (i * 31 % 251) as u8).collect();
        encoder.set_symbols(&data).unwrap();
        encoder
    }

    #[test]
    fn test_encoder_configuration() {
        let encoder = RlncEncoder::new(config(Field::BINARY8, 4, 16)).unwrap();
        assert_eq!(encoder.symbols(), 4);
        assert_eq!(encoder.symbol_size(), 16);
        assert_eq!(encoder.rank(), 0);
        assert!(encoder.has_systematic_capability());
    }

    #[test]
    fn test_encoder_invalid_configuration() {
        assert!(RlncEncoder::new(config(Field::BINARY8, 0, 16)).is_err());
        assert!(RlncEncoder::new(config(Field::BINARY8, 4, 0)).is_err());
        assert!(RlncEncoder::new(config(Field::BINARY16, 4, 3)).is_err());
    }

    #[test]
    fn test_set_symbol_checks() {
        let mut encoder = RlncEncoder::new(config(Field::BINARY8, 2, 4)).unwrap();
        assert_eq!(
            encoder.set_symbol(2, &[0; 4]),
            Err(CodingError::InvalidIndex { index: 2, symbols: 2 })
        );
        assert_eq!(encoder.set_symbol(0, &[0; 3]), Err(CodingError::InvalidSymbolSize));

        encoder.set_symbol(1, &[1; 4]).unwrap();
        encoder.set_symbol(1, &[2; 4]).unwrap();
        assert_eq!(encoder.rank(), 1);
    }

    #[test]
    fn test_set_symbols_wrong_size() {
        let mut encoder = RlncEncoder::new(config(Field::BINARY8, 3, 4)).unwrap();
        assert_eq!(encoder.set_symbols(&[1, 2, 3]), Err(CodingError::InvalidDataSize));
        assert_eq!(encoder.rank(), 0);
    }

    #[test]
    fn test_density_setting() {
        let mut encoder = RlncEncoder::new(config(Field::BINARY, 10, 100)).unwrap();
        assert_eq!(encoder.density(), 0.5);
        encoder.set_density(0.4).unwrap();
        assert_eq!(encoder.density(), 0.4);

        assert_eq!(encoder.set_density(0.0), Err(CodingError::InvalidDensity(0.0)));
        assert_eq!(encoder.set_density(1.01), Err(CodingError::InvalidDensity(1.01)));
        assert_eq!(encoder.density(), 0.4);
    }

    #[test]
    fn test_missing_symbols() {
        let mut encoder = RlncEncoder::new(config(Field::BINARY8, 2, 4)).unwrap();
        assert_eq!(encoder.generate_payload(), Err(CodingError::MissingSymbols));

        encoder.set_symbol(0, &[1; 4]).unwrap();
        encoder.set_systematic(true);
        assert_eq!(encoder.generate_payload(), Err(CodingError::MissingSymbols));
        // A failed call must not consume the systematic phase
        assert!(encoder.in_systematic_phase());
    }

    #[test]
    fn test_coded_generation_on_the_fly() {
        let field = Field::BINARY8;
        let mut encoder = RlncEncoder::with_seed(config(field, 4, 4), [3; 32]).unwrap();
        encoder.set_symbol(2, &[9, 8, 7, 6]).unwrap();

        for _ in 0..10 {
            match encoder.encode_packet().unwrap() {
                Payload::Coded { vector, data } => {
                    assert_eq!(vector.first_nonzero(), Some(2));
                    assert_eq!(vector.non_zeros(), 1);
                    assert_eq!(encoder.encode_symbol(&vector).unwrap(), data);
                }
                other => panic!("expected coded payload, got {other:?}"),
            }
        }

        // A nonzero coefficient on an unbound symbol cannot be honoured
        let vector = CodingVector::from(vec![1, 0, 1, 0]);
        assert_eq!(encoder.encode_symbol(&vector), Err(CodingError::MissingSymbols));
    }

    #[test]
    fn test_encode_symbol() {
        let field = Field::BINARY8;
        let mut encoder = RlncEncoder::new(config(field, 2, 4)).unwrap();
        encoder.set_symbols(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let vector = CodingVector::from(vec![1, 2]);
        let encoded = encoder.encode_symbol(&vector).unwrap();

        let expected: Vec<u8> = (0..4)
            .map(|b| field.add(1 + b, field.multiply(5 + b, 2)) as u8)
            .collect();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_encode_symbol_wrong_coefficients_length() {
        let encoder = filled(Field::BINARY8, 2, 4);
        let vector = CodingVector::from(vec![1]);
        assert_eq!(encoder.encode_symbol(&vector), Err(CodingError::InvalidCoefficients));
    }

    #[test]
    fn test_systematic_phase_emits_unit_payloads() {
        let mut encoder = filled(Field::BINARY16, 3, 4);
        encoder.set_systematic(true);

        for index in 0..3 {
            assert!(encoder.in_systematic_phase());
            match encoder.encode_packet().unwrap() {
                Payload::Systematic { index: got, data } => {
                    assert_eq!(got, index);
                    assert_eq!(data, encoder.data[index].as_ref().unwrap().as_slice());
                }
                other => panic!("expected systematic payload, got {other:?}"),
            }
        }

        assert!(!encoder.in_systematic_phase());
        assert!(!encoder.encode_packet().unwrap().is_systematic());
    }

    #[test]
    fn test_systematic_toggle_resumes() {
        let mut encoder = filled(Field::BINARY8, 3, 2);
        encoder.set_systematic(true);
        assert!(encoder.encode_packet().unwrap().is_systematic());

        encoder.set_systematic(false);
        assert!(!encoder.encode_packet().unwrap().is_systematic());

        encoder.set_systematic(true);
        match encoder.encode_packet().unwrap() {
            Payload::Systematic { index, .. } => assert_eq!(index, 1),
            other => panic!("expected systematic payload, got {other:?}"),
        }
    }

    #[test]
    fn test_coded_payload_is_consistent() {
        let mut encoder = filled(Field::BINARY, 8, 16);
        encoder.set_density(0.4).unwrap();

        for _ in 0..10 {
            match encoder.encode_packet().unwrap() {
                Payload::Coded { vector, data } => {
                    assert!(!vector.is_zero());
                    assert_eq!(encoder.encode_symbol(&vector).unwrap(), data);
                }
                other => panic!("expected coded payload, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_generate_payload_size() {
        let mut encoder = filled(Field::BINARY8, 10, 100);
        let bytes = encoder.generate_payload().unwrap();
        assert_eq!(bytes.len(), 1 + 10 + 100);
        assert!(bytes.len() <= encoder.payload_size());
    }

    #[test]
    fn test_write_payload() {
        let mut encoder = filled(Field::BINARY, 10, 100);
        let mut small = vec![0u8; 10];
        assert!(matches!(
            encoder.write_payload(&mut small),
            Err(CodingError::BufferTooSmall { .. })
        ));

        let mut buffer = vec![0u8; encoder.payload_size()];
        let used = encoder.write_payload(&mut buffer).unwrap();
        assert_eq!(used, 1 + 2 + 100);
    }

    #[test]
    fn test_encoder_deterministic_with_seed() {
        let mut encoder1 = filled(Field::BINARY8, 4, 8);
        let mut encoder2 = filled(Field::BINARY8, 4, 8);

        assert_eq!(encoder1.encode_packet().unwrap(), encoder2.encode_packet().unwrap());
    }
}
