//! Generic hash verification helpers
//!
//! Provides unified hash verification for SHA256, SHA512, and BLAKE3.

use crate::core::error::{Result, StageError};
use serde::Deserialize;
use sha2::Digest;
use std::io::Read;
use std::path::Path;

/// Chunk size for reading files during hashing (1MB)
const CHUNK_SIZE: usize = 1024 * 1024;

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
            Self::Blake3 => "BLAKE3",
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
        }
    }
}

/// Compute the hex digest of a file with the given algorithm.
pub fn hash_file(file: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let mut f = std::fs::File::open(file).map_err(StageError::io("open", file))?;
    let hash = match algorithm {
        HashAlgorithm::Sha256 => hash_reader::<sha2::Sha256>(&mut f),
        HashAlgorithm::Sha512 => hash_reader::<sha2::Sha512>(&mut f),
        HashAlgorithm::Blake3 => hash_blake3(&mut f),
    };
    hash.map_err(StageError::io("read", file))
}

/// Verify a file's hash against an expected value (case-insensitive).
pub fn verify_file_hash(file: &Path, expected: &str, algorithm: HashAlgorithm) -> Result<()> {
    let actual = hash_file(file, algorithm)?;
    let expected = expected.trim().to_lowercase();

    if actual != expected {
        return Err(StageError::ChecksumMismatch {
            path: file.to_path_buf(),
            algorithm: algorithm.name(),
            expected,
            actual,
        });
    }

    Ok(())
}

fn hash_reader<D: Digest>(reader: &mut impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// BLAKE3 has its own hasher API
fn hash_blake3(reader: &mut impl Read) -> std::io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Compute all hashes for a file at once (for `prepare hash`).
pub fn compute_all_hashes(file: &Path) -> Result<FileHashes> {
    let mut f = std::fs::File::open(file).map_err(StageError::io("open", file))?;
    let mut sha256_hasher = sha2::Sha256::new();
    let mut sha512_hasher = sha2::Sha512::new();
    let mut blake3_hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = f.read(&mut buffer).map_err(StageError::io("read", file))?;
        if n == 0 {
            break;
        }
        sha256_hasher.update(&buffer[..n]);
        sha512_hasher.update(&buffer[..n]);
        blake3_hasher.update(&buffer[..n]);
    }

    Ok(FileHashes {
        sha256: hex::encode(sha256_hasher.finalize()),
        sha512: hex::encode(sha512_hasher.finalize()),
        blake3: blake3_hasher.finalize().to_hex().to_string(),
    })
}

/// Container for computed file hashes
#[derive(Debug, Clone)]
pub struct FileHashes {
    pub sha256: String,
    pub sha512: String,
    pub blake3: String,
}
