#![no_main]

use std::io::{Cursor, Read};

use libfuzzer_sys::fuzz_target;
use powerpacker::{PowerPackerReader, decompress_to_vec, decompress_with_limit};

/// Upper bound on the decrunched size so the fuzzer spends its time decoding, not allocating.
const LIMIT: usize = 1 << 20;

/// Verifies that the decruncher safely handles arbitrary, potentially malformed input.
///
/// # Invariant
/// Decrunching must return either `Ok(_)` or `Err(_)`. It must **never** panic,
/// and a successful result is exactly as long as the trailer announces.
fn verify_decrunch_robustness(data: &[u8]) {
    if let Ok(out) = decompress_with_limit(data, LIMIT) {
        assert_eq!(Some(out.len()), powerpacker::decrunched_len(data).ok());
    }
}

/// Same input forced behind a `PP20` signature, so the bit stream itself gets exercised
/// rather than only the signature check.
fn verify_forced_container(data: &[u8]) {
    let mut container = b"PP20".to_vec();
    container.extend_from_slice(data);
    verify_decrunch_robustness(&container);
}

/// Verifies the stream adapter agrees with the buffer API.
///
/// # Invariant
/// Passthrough input reads back unchanged; supported input reads back as the
/// one-shot decrunch result.
fn verify_reader_agreement(data: &[u8]) {
    if powerpacker::decrunched_len(data).is_ok_and(|len| len > LIMIT) {
        return;
    }
    let Ok(mut reader) = PowerPackerReader::new(Cursor::new(data)) else {
        return;
    };
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();

    if reader.is_decrunched() {
        assert_eq!(Ok(out), decompress_to_vec(data));
    } else {
        assert_eq!(out, data);
    }
}

fuzz_target!(|data: &[u8]| {
    verify_decrunch_robustness(data);
    verify_forced_container(data);
    verify_reader_agreement(data);
});
