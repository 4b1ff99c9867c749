use crate::decompress::decrunch;
use crate::error::PowerPackerError;
use crate::signature::Signature;

type Result<T> = core::result::Result<T, PowerPackerError>;

/// Size of the leading signature.
pub const SIGNATURE_LEN: usize = 4;

/// Size of the offset width table that follows the signature.
pub const OFFSET_LENS_LEN: usize = 4;

/// Size of the trailing decrunched-length / skip-bits word.
pub const TRAILER_LEN: usize = 4;

/// Smallest well-formed container: signature, offset widths and trailer.
pub const MIN_CONTAINER_LEN: usize = SIGNATURE_LEN + OFFSET_LENS_LEN + TRAILER_LEN;

/// A borrowed view over a PowerPacker container.
///
/// ```text
/// 0      4            8            N-4        N
/// | magic | offset lens | payload ... | trailer |
/// ```
///
/// The trailer holds the decrunched length in its upper 24 bits and the
/// number of padding bits at the end of the payload in its low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    pub signature: Signature,
    pub offset_lens: [u8; 4],
    pub payload: &'a [u8],
    pub decrunched_len: usize,
    pub skip_bits: u8,
}

impl<'a> Container<'a> {
    /// Splits a crunched buffer into its parts.
    ///
    /// # Errors
    /// * [`PowerPackerError::NotPowerPacker`] if the buffer does not start with
    ///   a PowerPacker signature.
    /// * [`PowerPackerError::Unsupported`] for `PPLS` and `PX20` files.
    /// * [`PowerPackerError::ContainerTooShort`] if a supported signature is
    ///   followed by too few bytes to hold the offset widths and trailer.
    pub fn parse(input: &'a [u8]) -> Result<Self> {
        let signature = Signature::from_bytes(input).ok_or(PowerPackerError::NotPowerPacker)?;
        signature.ensure_supported()?;

        let too_short = PowerPackerError::ContainerTooShort { len: input.len() };
        if input.len() < MIN_CONTAINER_LEN {
            return Err(too_short);
        }
        let (decrunched_len, skip_bits) = Self::read_trailer(input).ok_or(too_short)?;

        let mut offset_lens = [0u8; 4];
        offset_lens.copy_from_slice(&input[SIGNATURE_LEN..SIGNATURE_LEN + OFFSET_LENS_LEN]);

        Ok(Self {
            signature,
            offset_lens,
            payload: &input[SIGNATURE_LEN + OFFSET_LENS_LEN..input.len() - TRAILER_LEN],
            decrunched_len,
            skip_bits,
        })
    }

    /// Decodes the trailing word of `input` into `(decrunched_len, skip_bits)`.
    #[must_use]
    pub fn read_trailer(input: &[u8]) -> Option<(usize, u8)> {
        let start = input.len().checked_sub(TRAILER_LEN)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(&input[start..]);
        Some(split_trailer(u32::from_be_bytes(word)))
    }

    /// Total size of the container in bytes.
    #[must_use]
    pub const fn crunched_len(&self) -> usize {
        MIN_CONTAINER_LEN + self.payload.len()
    }

    /// Decrunches into `output`, which must be exactly `decrunched_len` long.
    ///
    /// # Errors
    /// [`PowerPackerError::Corrupt`] when the bit stream is malformed.
    pub fn decrunch_into(&self, output: &mut [u8]) -> Result<()> {
        debug_assert_eq!(output.len(), self.decrunched_len);
        decrunch(&self.offset_lens, self.payload, self.skip_bits, output)?;
        Ok(())
    }
}

/// Splits a trailer word into the decrunched length and the skip-bit count.
#[must_use]
pub const fn split_trailer(word: u32) -> (usize, u8) {
    ((word >> 8) as usize, (word & 0xFF) as u8)
}
