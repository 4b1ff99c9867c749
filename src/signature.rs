use core::fmt;

use crate::error::PowerPackerError;

/// Magic of the standard PowerPacker 2.0 data file.
pub const MAGIC_PP20: u32 = 0x5050_3230;

/// Non-standard magic found on some floppy releases; same encoding as `PP20`.
pub const MAGIC_PACK: u32 = 0x5041_434B;

/// PowerPacker library-format file. Recognized, never decoded.
pub const MAGIC_PPLS: u32 = 0x5050_4C53;

/// Encrypted PowerPacker file. Recognized, never decoded.
pub const MAGIC_PX20: u32 = 0x5058_3230;

/// A recognized PowerPacker container signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    Pp20,
    Pack,
    Ppls,
    Px20,
}

impl Signature {
    /// Classifies the big-endian magic read from the first four bytes of a file.
    ///
    /// Returns `None` when the value is not a PowerPacker signature at all.
    #[must_use]
    pub const fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            MAGIC_PP20 => Some(Self::Pp20),
            MAGIC_PACK => Some(Self::Pack),
            MAGIC_PPLS => Some(Self::Ppls),
            MAGIC_PX20 => Some(Self::Px20),
            _ => None,
        }
    }

    /// Classifies the leading bytes of a buffer. Needs at least four bytes.
    #[must_use]
    pub fn from_bytes(input: &[u8]) -> Option<Self> {
        let magic: [u8; 4] = input.get(..4)?.try_into().ok()?;
        Self::from_magic(u32::from_be_bytes(magic))
    }

    /// The big-endian magic this signature is stored as.
    #[must_use]
    pub const fn magic(self) -> u32 {
        match self {
            Self::Pp20 => MAGIC_PP20,
            Self::Pack => MAGIC_PACK,
            Self::Ppls => MAGIC_PPLS,
            Self::Px20 => MAGIC_PX20,
        }
    }

    /// The historical PowerPacker "efficiency" code of this variant.
    #[must_use]
    pub const fn efficiency(self) -> u8 {
        match self {
            Self::Pp20 | Self::Pack => 4,
            Self::Ppls => 8,
            Self::Px20 => 6,
        }
    }

    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Pp20 | Self::Pack)
    }

    /// Rejects the variants this crate recognizes but cannot decode.
    ///
    /// # Errors
    /// [`PowerPackerError::Unsupported`] for `PPLS` and `PX20`.
    pub fn ensure_supported(self) -> Result<(), PowerPackerError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(PowerPackerError::Unsupported(self))
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pp20 => "PP20",
            Self::Pack => "PACK",
            Self::Ppls => "PPLS",
            Self::Px20 => "PX20",
        };
        f.write_str(name)
    }
}

/// Returns the crunch efficiency for a magic value, or 0 if it is not PowerPacker.
#[must_use]
pub const fn crunch_efficiency(magic: u32) -> u8 {
    match Signature::from_magic(magic) {
        Some(sig) => sig.efficiency(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_matches_ascii() {
        assert_eq!(MAGIC_PP20, u32::from_be_bytes(*b"PP20"));
        assert_eq!(MAGIC_PACK, u32::from_be_bytes(*b"PACK"));
        assert_eq!(MAGIC_PPLS, u32::from_be_bytes(*b"PPLS"));
        assert_eq!(MAGIC_PX20, u32::from_be_bytes(*b"PX20"));
    }

    #[test]
    fn magic_round_trips() {
        for sig in [Signature::Pp20, Signature::Pack, Signature::Ppls, Signature::Px20] {
            assert_eq!(Signature::from_magic(sig.magic()), Some(sig));
            assert_eq!(Signature::from_bytes(&sig.magic().to_be_bytes()), Some(sig));
        }
    }

    #[test]
    fn efficiency_codes() {
        assert_eq!(crunch_efficiency(MAGIC_PP20), 4);
        assert_eq!(crunch_efficiency(MAGIC_PACK), 4);
        assert_eq!(crunch_efficiency(MAGIC_PPLS), 8);
        assert_eq!(crunch_efficiency(MAGIC_PX20), 6);
        assert_eq!(crunch_efficiency(0), 0);
        assert_eq!(crunch_efficiency(u32::from_be_bytes(*b"PP21")), 0);
    }

    #[test]
    fn unsupported_variants_are_named() {
        let err = Signature::Ppls.ensure_supported().unwrap_err();
        assert_eq!(err, PowerPackerError::Unsupported(Signature::Ppls));
        assert_eq!(
            alloc::format!("{err}"),
            "PPLS crunched files are not supported"
        );
        assert!(Signature::Pack.ensure_supported().is_ok());
    }

    #[test]
    fn from_bytes_needs_four_bytes() {
        assert_eq!(Signature::from_bytes(b"PP2"), None);
        assert_eq!(Signature::from_bytes(b"PP20rest"), Some(Signature::Pp20));
    }
}
