//! Context-triggered piecewise hashing (CTPH).
//!
//! Produces ssdeep-style `blocksize:sig1:sig2` fuzzy hashes and compares them
//! by edit distance. [`hash`] and [`hash_reader`] cover whole inputs;
//! [`FuzzyHash`] exposes the same algorithm one byte at a time for hosts that
//! only ever see a single byte per call.

pub mod digest;
pub mod engine;
pub mod error;
pub mod rolling;
pub mod signature;

pub use digest::DigestAccumulator;
pub use engine::{
    FuzzyHash, MIN_BLOCK_SIZE, SPAMSUM_LENGTH, State, StepOutcome, Triggers, initial_block_size,
    max_attempts,
};
pub use error::{CtphError, Operand, ParseSignatureError, Result};
pub use rolling::RollingChecksum;
pub use signature::{Signature, compare};

use std::io::{self, Read, Seek, SeekFrom};
use tracing::debug;

/// Output alphabet; each emitted character is `ALPHABET[value & 0x3F]`.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const BUF_SIZE: usize = 64 * 1024;

/// Reads exactly `buf.len()` bytes or until EOF, returning the number of bytes read.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Fuzzy hash of a complete buffer.
///
/// # Errors
/// Returns [`CtphError::InvalidInput`] if `data` is empty.
pub fn hash(data: &[u8]) -> Result<Signature> {
    let mut engine = FuzzyHash::new(data.len() as u64)?;
    while engine.needs_retry() {
        for &byte in data {
            engine.step(byte);
        }
    }
    Ok(engine.signature())
}

/// Fuzzy hash of everything between the start and the end of `reader`.
///
/// The stream is measured first, then replayed from offset zero once per
/// attempt.
///
/// # Errors
/// Returns [`CtphError::InvalidInput`] for an empty stream, or
/// [`CtphError::Io`] if seeking or reading fails, including when a replay ends
/// before the measured length.
pub fn hash_reader<R: Read + Seek>(mut reader: R) -> Result<Signature> {
    let declared_len = reader.seek(SeekFrom::End(0))?;
    let mut engine = FuzzyHash::new(declared_len)?;
    debug!(declared_len, block_size = engine.block_size(), "hashing reader");

    let mut buffer = vec![0u8; usize::try_from(declared_len).map_or(BUF_SIZE, |n| n.min(BUF_SIZE))];

    while engine.needs_retry() {
        reader.seek(SeekFrom::Start(0))?;
        let mut remaining = declared_len;

        while remaining > 0 {
            let want = usize::try_from(remaining).map_or(buffer.len(), |n| n.min(buffer.len()));
            let bytes_read = read_exact_or_eof(&mut reader, &mut buffer[..want])?;
            if bytes_read == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended before its measured length",
                )
                .into());
            }

            for &byte in &buffer[..bytes_read] {
                engine.step(byte);
            }
            remaining -= bytes_read as u64;
        }
    }

    Ok(engine.signature())
}
