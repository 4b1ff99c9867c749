//! A `Read + Seek` adapter that transparently decrunches PowerPacker files.

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::vec::Vec;

use crate::error::PowerPackerError;
use crate::signature::Signature;

enum Source<R> {
    /// Not a PowerPacker file; reads go straight to the wrapped stream.
    Passthrough(R),
    /// Fully decrunched into memory.
    Decrunched {
        signature: Signature,
        data: Cursor<Vec<u8>>,
        inner: R,
    },
}

/// Wraps a seekable stream and exposes its decrunched contents.
///
/// Streams that do not start with a PowerPacker signature are passed through
/// untouched, rewound to their start. Supported files are read in full and
/// decrunched into memory when the reader is built, so later reads and seeks
/// never fail because of the crunched data.
pub struct PowerPackerReader<R> {
    source: Source<R>,
}

impl<R: Read + Seek> PowerPackerReader<R> {
    /// Inspects `inner` and prepares it for reading.
    ///
    /// # Errors
    /// * [`io::ErrorKind::Unsupported`] for `PPLS` and `PX20` files.
    /// * [`io::ErrorKind::InvalidData`] if the PowerPacker data is malformed.
    ///
    /// Both wrap a [`PowerPackerError`], reachable through
    /// [`io::Error::get_ref`]. Errors from `inner` are returned as is.
    pub fn new(mut inner: R) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        let mut magic = Vec::with_capacity(4);
        (&mut inner).take(4).read_to_end(&mut magic)?;

        let Some(signature) = Signature::from_bytes(&magic) else {
            inner.seek(SeekFrom::Start(0))?;
            return Ok(Self {
                source: Source::Passthrough(inner),
            });
        };

        if let Err(e) = signature.ensure_supported() {
            tracing::warn!(%signature, "refusing unsupported PowerPacker variant");
            return Err(io::Error::new(io::ErrorKind::Unsupported, e));
        }

        inner.seek(SeekFrom::Start(0))?;
        let mut crunched = Vec::new();
        inner.read_to_end(&mut crunched)?;

        let data = crate::decompress_to_vec(&crunched).map_err(|e| {
            tracing::warn!(%signature, error = %e, "PowerPacker stream is corrupt");
            io::Error::new(error_kind(&e), e)
        })?;

        Ok(Self {
            source: Source::Decrunched {
                signature,
                data: Cursor::new(data),
                inner,
            },
        })
    }
}

impl<R> PowerPackerReader<R> {
    /// Whether the wrapped stream was PowerPacker data.
    #[must_use]
    pub const fn is_decrunched(&self) -> bool {
        matches!(self.source, Source::Decrunched { .. })
    }

    /// Signature of the wrapped stream, if it was PowerPacker data.
    #[must_use]
    pub const fn signature(&self) -> Option<Signature> {
        match &self.source {
            Source::Passthrough(_) => None,
            Source::Decrunched { signature, .. } => Some(*signature),
        }
    }

    /// The decrunched bytes, if the wrapped stream was PowerPacker data.
    #[must_use]
    pub fn decrunched(&self) -> Option<&[u8]> {
        match &self.source {
            Source::Passthrough(_) => None,
            Source::Decrunched { data, .. } => Some(data.get_ref()),
        }
    }

    /// Returns the wrapped stream. Its position is unspecified.
    pub fn into_inner(self) -> R {
        match self.source {
            Source::Passthrough(inner) | Source::Decrunched { inner, .. } => inner,
        }
    }
}

fn error_kind(e: &PowerPackerError) -> io::ErrorKind {
    match e {
        PowerPackerError::Unsupported(_) => io::ErrorKind::Unsupported,
        _ => io::ErrorKind::InvalidData,
    }
}

impl<R: Read> Read for PowerPackerReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.source {
            Source::Passthrough(inner) => inner.read(buf),
            Source::Decrunched { data, .. } => data.read(buf),
        }
    }
}

impl<R: Seek> Seek for PowerPackerReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.source {
            Source::Passthrough(inner) => inner.seek(pos),
            Source::Decrunched { data, .. } => data.seek(pos),
        }
    }
}
