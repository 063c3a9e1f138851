//! Streaming content-digest computation and verification
//!
//! Digests are SHA-256 over bounded-size reads; a whole-file memory
//! load is never required regardless of artifact size.

use crate::core::error::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 8192;

/// Compute the SHA-256 hex digest of a file.
///
/// Returns an empty string if the file does not exist. Callers must
/// treat an empty digest as "unverifiable", never as "matches".
pub fn digest(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check a file against an expected hex digest.
///
/// True iff `expected` is non-empty and equals the file's digest. An
/// empty `expected` means verification was skipped by manifest choice;
/// the caller decides that policy, not this function.
pub fn verify(path: &Path, expected: &str) -> Result<bool> {
    if expected.is_empty() {
        return Ok(false);
    }
    Ok(digest(path)? == expected)
}
