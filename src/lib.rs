//! # PowerPacker Decrunching
//!
//! `powerpacker` is a safe, pure-Rust decruncher for Amiga PowerPacker
//! (`PP20`) files, as found in the data files of many Amiga and DOS games.
//! The non-standard `PACK` signature used by some floppy releases is accepted
//! too. `PPLS` and `PX20` files are recognized and rejected.
//!
//! ## Example
//!
//! ```rust
//! use powerpacker::decompress_to_vec;
//!
//! // "AAAA": one literal 'A', then a 3-byte match at offset 0.
//! let crunched = [
//!     b'P', b'P', b'2', b'0',
//!     9, 10, 11, 11,
//!     0x00, 0x28, 0x20,
//!     0x00, 0x00, 0x04, 0x01,
//! ];
//!
//! let plain = decompress_to_vec(&crunched).expect("Decrunching failed");
//! assert_eq!(plain, b"AAAA");
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod container;
pub mod decompress;
pub mod error;
pub mod signature;
#[cfg(feature = "std")]
pub mod stream;

use alloc::vec::Vec;

pub use container::Container;
pub use decompress::decrunch;
pub use error::{DecrunchError, PowerPackerError};
pub use signature::{Signature, crunch_efficiency};
#[cfg(feature = "std")]
pub use stream::PowerPackerReader;

type Result<T> = core::result::Result<T, PowerPackerError>;

/// Decrunches a whole PowerPacker file, appending the result to `output`.
///
/// On error `output` is left as it was.
///
/// # Errors
/// See [`Container::parse`] for framing errors; a malformed bit stream is
/// reported as [`PowerPackerError::Corrupt`].
pub fn decompress(input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    decompress_inner(input, output, usize::MAX)
}

/// Decrunches a whole PowerPacker file into a new vector.
///
/// # Errors
/// Same as [`decompress`].
pub fn decompress_to_vec(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_inner(input, &mut output, usize::MAX)?;
    Ok(output)
}

/// Like [`decompress_to_vec`], but refuses files whose trailer announces
/// more than `limit` decrunched bytes, before allocating anything.
///
/// # Errors
/// [`PowerPackerError::OutputTooLarge`] on top of the errors of [`decompress`].
pub fn decompress_with_limit(input: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_inner(input, &mut output, limit)?;
    Ok(output)
}

/// Reads the decrunched size from the trailer without decoding anything.
///
/// # Errors
/// The framing errors of [`Container::parse`].
pub fn decrunched_len(input: &[u8]) -> Result<usize> {
    Ok(Container::parse(input)?.decrunched_len)
}

/// Whether `input` starts with any PowerPacker signature, supported or not.
#[must_use]
pub fn is_powerpacked(input: &[u8]) -> bool {
    Signature::from_bytes(input).is_some()
}

fn decompress_inner(input: &[u8], output: &mut Vec<u8>, limit: usize) -> Result<()> {
    let container = Container::parse(input)?;
    let len = container.decrunched_len;
    if len > limit {
        return Err(PowerPackerError::OutputTooLarge { len, limit });
    }

    tracing::debug!(
        signature = %container.signature,
        crunched = input.len(),
        decrunched = len,
        "decrunching PowerPacker data"
    );

    let start = output.len();
    output.resize(start + len, 0);
    if let Err(e) = container.decrunch_into(&mut output[start..]) {
        output.truncate(start);
        tracing::debug!(error = %e, "PowerPacker decrunch failed");
        return Err(e);
    }

    Ok(())
}
