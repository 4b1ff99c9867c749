//! Test-only writer for PowerPacker bit streams.
//!
//! Tokens are pushed in the order the decruncher reads them, which is from
//! the end of the output towards its start.
#![allow(dead_code)]

/// Offset widths used by typical PowerPacker "efficiency 4" files.
pub const OFFSET_LENS: [u8; 4] = [9, 10, 11, 11];

pub struct StreamBuilder {
    offset_lens: [u8; 4],
    bits: Vec<bool>,
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self::new(OFFSET_LENS)
    }
}

impl StreamBuilder {
    pub fn new(offset_lens: [u8; 4]) -> Self {
        Self {
            offset_lens,
            bits: Vec::new(),
        }
    }

    /// Appends `count` bits of `value`, most significant first.
    pub fn bits(&mut self, value: u32, count: u8) -> &mut Self {
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 != 0);
        }
        self
    }

    /// A literal run. `bytes` are given in output order.
    pub fn literals(&mut self, bytes: &[u8]) -> &mut Self {
        assert!(!bytes.is_empty(), "literal runs hold at least one byte");
        self.bits(0, 1);
        self.length(bytes.len() - 1, 2);
        for &b in bytes.iter().rev() {
            self.bits(u32::from(b), 8);
        }
        self
    }

    /// Opens a step that has no literal run.
    pub fn no_literals(&mut self) -> &mut Self {
        self.bits(1, 1)
    }

    /// A match using the width table. Classes 0-2 imply `length == class + 2`.
    pub fn copy(&mut self, class: u8, offset: u32, length: usize) -> &mut Self {
        self.bits(u32::from(class), 2);
        if class < 3 {
            assert_eq!(length, usize::from(class) + 2, "fixed-length class");
            self.bits(offset, self.offset_lens[usize::from(class)]);
        } else {
            self.bits(1, 1);
            self.bits(offset, self.offset_lens[3]);
            self.length(length - 5, 3);
        }
        self
    }

    /// A class-3 match with a 7-bit offset.
    pub fn copy_near(&mut self, offset: u32, length: usize) -> &mut Self {
        self.bits(3, 2);
        self.bits(0, 1);
        self.bits(offset, 7);
        self.length(length - 5, 3);
        self
    }

    fn length(&mut self, mut extra: usize, chunk_bits: u8) {
        let all_ones = (1usize << chunk_bits) - 1;
        while extra >= all_ones {
            self.bits(all_ones as u32, chunk_bits);
            extra -= all_ones;
        }
        self.bits(extra as u32, chunk_bits);
    }

    /// Packs the bits into payload bytes; returns the payload and skip-bit count.
    pub fn payload(&self) -> (Vec<u8>, u8) {
        let skip = (8 - self.bits.len() % 8) % 8;
        let mut padded = vec![false; skip];
        padded.extend_from_slice(&self.bits);

        let mut payload: Vec<u8> = padded
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << i))
            })
            .collect();
        // The decruncher starts reading at the last byte.
        payload.reverse();
        (payload, skip as u8)
    }

    /// A complete container with the given signature and decrunched size.
    pub fn container(&self, magic: &[u8; 4], decrunched_len: usize) -> Vec<u8> {
        let (payload, skip) = self.payload();
        let mut out = Vec::with_capacity(12 + payload.len());
        out.extend_from_slice(magic);
        out.extend_from_slice(&self.offset_lens);
        out.extend_from_slice(&payload);
        out.extend_from_slice(&trailer(decrunched_len, skip));
        out
    }

    pub fn pp20(&self, decrunched_len: usize) -> Vec<u8> {
        self.container(b"PP20", decrunched_len)
    }
}

/// Encodes the trailing length / skip-bits word.
pub fn trailer(decrunched_len: usize, skip_bits: u8) -> [u8; 4] {
    (((decrunched_len as u32) << 8) | u32::from(skip_bits)).to_be_bytes()
}

/// Crunches `phrase` repeated `copies` times: one literal run and then one
/// long match per extra copy.
pub fn repeated_phrase(phrase: &[u8], copies: usize) -> (Vec<u8>, Vec<u8>) {
    assert!(copies >= 1 && phrase.len() >= 5);
    let mut b = StreamBuilder::default();
    b.literals(phrase);
    for i in 1..copies {
        if i > 1 {
            b.no_literals();
        }
        b.copy(3, phrase.len() as u32 - 1, phrase.len());
    }
    let expected = phrase.repeat(copies);
    (b.pp20(expected.len()), expected)
}
