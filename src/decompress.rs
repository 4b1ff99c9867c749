use crate::error::DecrunchError;

type Result<T> = core::result::Result<T, DecrunchError>;

// --- Constants ---

/// Width of a literal byte in the bit stream.
const LITERAL_BITS: u8 = 8;

/// Width of each chunk of a literal run length.
const RUN_CHUNK_BITS: u8 = 2;

/// Width of the selector that picks one of the four offset classes.
const CLASS_BITS: u8 = 2;

/// The offset class whose match length is open-ended.
const LONG_CLASS: usize = 3;

/// Offset width used by the long class when its extra flag bit is clear.
const LONG_CLASS_SHORT_OFFSET_BITS: u8 = 7;

/// Width of each chunk extending a long-class match length.
const MATCH_CHUNK_BITS: u8 = 3;

/// Shortest match. A class-`n` match copies `n + MIN_MATCH` bytes before extension.
const MIN_MATCH: usize = 2;

/// Largest number of bits pulled out of the bit buffer in one step.
const MAX_CHUNK_BITS: u32 = 16;

/// Reads a PowerPacker bit stream from the end of the payload towards its start.
///
/// Bytes are fetched one at a time going backward. Within a byte the least
/// significant bit comes out first, and the first bit read becomes the most
/// significant bit of the assembled value.
struct BackwardBitReader<'a> {
    input: &'a [u8],
    cursor: usize,
    bit_buffer: u32,
    bits_left: u32,
}

impl<'a> BackwardBitReader<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            cursor: input.len(),
            bit_buffer: 0,
            bits_left: 0,
        }
    }

    #[inline]
    fn refill(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Err(DecrunchError::TruncatedInput);
        }
        self.cursor -= 1;
        self.bit_buffer |= u32::from(self.input[self.cursor]) << self.bits_left;
        self.bits_left += 8;
        Ok(())
    }

    /// Reads `count` bits. Widths above 32 keep only the low 32 bits of the value.
    fn read_bits(&mut self, count: u8) -> Result<u32> {
        let mut remaining = u32::from(count);
        let mut value = 0u32;

        while remaining > 0 {
            let take = remaining.min(MAX_CHUNK_BITS);
            while self.bits_left < take {
                self.refill()?;
            }

            let chunk = (self.bit_buffer & ((1 << take) - 1)).reverse_bits() >> (32 - take);
            self.bit_buffer >>= take;
            self.bits_left -= take;

            value = (value << take) | chunk;
            remaining -= take;
        }

        Ok(value)
    }

    #[inline]
    fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Reads a variable-length count: `chunk_bits`-wide values are added to
    /// `base` for as long as they are all ones.
    fn read_length(&mut self, chunk_bits: u8, base: usize) -> Result<usize> {
        let all_ones = (1u32 << chunk_bits) - 1;
        let mut length = base;
        loop {
            let chunk = self.read_bits(chunk_bits)?;
            length += chunk as usize;
            if chunk != all_ones {
                return Ok(length);
            }
        }
    }
}

/// Fills the output from its end towards its start.
struct BackwardWriter<'a> {
    output: &'a mut [u8],
    pos: usize,
}

impl<'a> BackwardWriter<'a> {
    const fn new(output: &'a mut [u8]) -> Self {
        let pos = output.len();
        Self { output, pos }
    }

    #[inline]
    const fn is_full(&self) -> bool {
        self.pos == 0
    }

    #[inline]
    fn push(&mut self, byte: u8) -> Result<()> {
        if self.pos == 0 {
            return Err(DecrunchError::OutputOverflow);
        }
        self.pos -= 1;
        self.output[self.pos] = byte;
        Ok(())
    }

    /// Copies `length` bytes from `offset` bytes past the last written byte.
    ///
    /// The source and destination overlap for short offsets, so the copy has
    /// to go one byte at a time with both positions moving down together.
    fn copy_match(&mut self, offset: usize, length: usize) -> Result<()> {
        match self.pos.checked_add(offset) {
            Some(src) if src < self.output.len() => {}
            _ => return Err(DecrunchError::InvalidBackReference),
        }

        for _ in 0..length {
            let byte = self.output[self.pos + offset];
            self.push(byte)?;
        }
        Ok(())
    }
}

/// Decrunches a PowerPacker bit stream into `output`, which must be exactly
/// the decrunched size.
///
/// `offset_lens` holds the offset widths of the four match classes and
/// `skip_bits` is the number of padding bits at the tail of `payload`. On
/// error the contents of `output` are unspecified.
///
/// # Errors
/// * [`DecrunchError::TruncatedInput`] if the payload runs out of bits.
/// * [`DecrunchError::OutputOverflow`] if a literal run or match would write
///   past the start of `output`.
/// * [`DecrunchError::InvalidBackReference`] if a match reaches beyond the
///   bytes decoded so far.
pub fn decrunch(
    offset_lens: &[u8; 4],
    payload: &[u8],
    skip_bits: u8,
    output: &mut [u8],
) -> Result<()> {
    tracing::trace!(
        payload_len = payload.len(),
        output_len = output.len(),
        skip_bits,
        ?offset_lens,
        "decrunching"
    );

    let mut reader = BackwardBitReader::new(payload);
    let mut writer = BackwardWriter::new(output);

    reader.read_bits(skip_bits)?;

    while !writer.is_full() {
        // A clear flag means a literal run precedes the match.
        if !reader.read_bit()? {
            let run = reader.read_length(RUN_CHUNK_BITS, 1)?;
            for _ in 0..run {
                let byte = reader.read_bits(LITERAL_BITS)? as u8;
                writer.push(byte)?;
            }

            // The stream may end on a literal run.
            if writer.is_full() {
                break;
            }
        }

        let class = reader.read_bits(CLASS_BITS)? as usize;
        let mut offset_bits = offset_lens[class];
        let length = class + MIN_MATCH;

        let (offset, length) = if class == LONG_CLASS {
            if !reader.read_bit()? {
                offset_bits = LONG_CLASS_SHORT_OFFSET_BITS;
            }
            let offset = reader.read_bits(offset_bits)?;
            (offset, reader.read_length(MATCH_CHUNK_BITS, length)?)
        } else {
            (reader.read_bits(offset_bits)?, length)
        };

        writer.copy_match(offset as usize, length)?;
    }

    Ok(())
}
