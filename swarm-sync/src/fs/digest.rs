//! Streaming SHA-256 digests.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read size used when hashing
pub const CHUNK_SIZE: usize = 4096;

/// Hex SHA-256 of a file, read in [`CHUNK_SIZE`] chunks
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    sha256_reader(BufReader::new(file))
}

pub fn sha256_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Case-insensitive comparison of two hex digests
pub fn digests_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
