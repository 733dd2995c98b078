//! Artifact Checksum
//!
//! SHA-256 pinning for model files.

use std::path::Path;

use sha2::{Digest, Sha256};

use super::error::LoadError;

/// Hex-encoded SHA-256 of a file
pub fn sha256_file(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a file against a pinned digest
pub fn verify_checksum(path: &Path, expected: &str) -> Result<(), LoadError> {
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(expected) {
        log::debug!("Checksum OK for {}", path.display());
        Ok(())
    } else {
        Err(LoadError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // sha256("abc")
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_sha256_known_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(sha256_file(file.path()).unwrap(), ABC_SHA256);
    }

    #[test]
    fn test_verify_checksum() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        assert!(verify_checksum(file.path(), ABC_SHA256).is_ok());
        assert!(verify_checksum(file.path(), &ABC_SHA256.to_uppercase()).is_ok());

        let err = verify_checksum(file.path(), "00").unwrap_err();
        assert!(matches!(err, LoadError::ChecksumMismatch { .. }));
    }
}
