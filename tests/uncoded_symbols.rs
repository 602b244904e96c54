//! Original symbols delivered outside the coded channel, with coded payloads
//! covering the symbols that were lost.

mod common;

use common::*;
use rand::Rng;
use rlnc_codec::{decoder, encoder, Contribution, Decoder, Encoder, Field, SystematicEncoder};

#[test]
fn half_uncoded_half_coded_binary() {
    init_logging();
    let mut rng = rng(2016);

    let symbols = 10;
    let symbol_size = 100;
    let originals = random_symbols(&mut rng, symbols, symbol_size);

    let mut enc = encoder(Field::BINARY, symbols, symbol_size).unwrap();
    let mut dec = decoder(Field::BINARY, symbols, symbol_size).unwrap();

    enc.set_density(0.4).unwrap();
    assert_eq!(enc.density(), 0.4);
    if enc.has_systematic_capability() {
        enc.set_systematic(false);
    }

    for (i, symbol) in originals.iter().enumerate() {
        enc.set_symbol(i, symbol).unwrap();
        dec.set_output_buffer(i, vec![0u8; symbol_size]).unwrap();
    }

    for i in (0..symbols).step_by(2) {
        assert_eq!(
            dec.read_uncoded_symbol(&originals[i], i).unwrap(),
            Contribution::Pivot(i)
        );
    }
    assert_eq!(dec.rank(), 5);

    let mut coded = 0;
    let mut last_rank = dec.rank();
    while !dec.is_complete() {
        let payload = enc.generate_payload().unwrap();
        assert!(payload.len() <= enc.payload_size());
        dec.read_payload(&payload).unwrap();
        coded += 1;

        assert!(dec.rank() >= last_rank);
        last_rank = dec.rank();
        assert!(coded < payload_budget(symbols));
    }

    assert!(coded >= 5);
    assert_eq!(dec.rank(), 10);

    let outputs = dec.into_output_buffers();
    for (i, output) in outputs.into_iter().enumerate() {
        assert_eq!(output.as_deref(), Some(originals[i].as_slice()), "symbol {i}");
    }
}

#[test]
fn lossy_uncoded_delivery_every_field() {
    init_logging();
    let mut rng = rng(7);

    for field in Field::ALL {
        let symbols = 16;
        let symbol_size = 64;
        let originals = random_symbols(&mut rng, symbols, symbol_size);

        let mut enc = encoder(field, symbols, symbol_size).unwrap();
        let mut dec = decoder(field, symbols, symbol_size).unwrap();
        for (i, symbol) in originals.iter().enumerate() {
            enc.set_symbol(i, symbol).unwrap();
        }

        let mut lost = 0;
        for (i, symbol) in originals.iter().enumerate() {
            if rng.gen_bool(0.5) {
                lost += 1;
                continue;
            }
            dec.read_uncoded_symbol(symbol, i).unwrap();
        }
        assert_eq!(dec.rank() as usize, symbols - lost);

        let mut coded = 0;
        while !dec.is_complete() {
            let payload = enc.generate_payload().unwrap();
            dec.read_payload(&payload).unwrap();
            coded += 1;
            assert!(coded < payload_budget(symbols), "{field}");
        }

        assert!(coded >= lost, "{field}");
        for (i, symbol) in originals.iter().enumerate() {
            assert_eq!(dec.symbol(i), Some(symbol.as_slice()), "{field} symbol {i}");
        }
    }
}

#[test]
fn uncoded_after_coded_completes_earlier_rows() {
    let field = Field::BINARY8;
    let mut rng = rng(99);
    let originals = random_symbols(&mut rng, 4, 8);

    let mut enc = encoder(field, 4, 8).unwrap();
    let mut dec = decoder(field, 4, 8).unwrap();
    for (i, symbol) in originals.iter().enumerate() {
        enc.set_symbol(i, symbol).unwrap();
    }

    // Collect three innovative coded rows first
    let mut budget = payload_budget(4);
    while dec.rank() < 3 {
        let payload = enc.generate_payload().unwrap();
        dec.read_payload(&payload).unwrap();
        budget -= 1;
        assert!(budget > 0);
    }

    // Exactly one uncoded symbol supplies the missing dimension, even when
    // its slot already holds a coded pivot
    let mut innovative = 0;
    for (i, symbol) in originals.iter().enumerate() {
        if dec.read_uncoded_symbol(symbol, i).unwrap().is_innovative() {
            innovative += 1;
        }
    }

    assert_eq!(innovative, 1);
    assert!(dec.is_complete());
    assert_eq!(dec.copy_from_symbols().unwrap(), originals.concat());
}

#[test]
fn repeated_uncoded_delivery_is_idempotent() {
    let mut dec = decoder(Field::BINARY16, 3, 4).unwrap();
    let symbol = [1u8, 2, 3, 4];

    dec.read_uncoded_symbol(&symbol, 2).unwrap();
    let rank = dec.rank();
    assert_eq!(
        dec.read_uncoded_symbol(&symbol, 2).unwrap(),
        Contribution::Redundant
    );
    assert_eq!(dec.rank(), rank);
    assert_eq!(dec.symbol(2), Some(&symbol[..]));
}
