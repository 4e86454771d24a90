//! MD5 digests as Jenkins computes them for fingerprints.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::IdError;
use crate::fingerprint::FingerprintId;

const CHUNK_SIZE: usize = 64 * 1024;

fn finish(hasher: Md5) -> FingerprintId {
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hasher.finalize());
    FingerprintId::from_digest(digest)
}

/// Fingerprint id of an in-memory buffer.
pub fn md5_hex(data: &[u8]) -> FingerprintId {
    let mut hasher = Md5::new();
    hasher.update(data);
    finish(hasher)
}

/// Fingerprint id of everything readable from `reader`.
pub fn md5_reader<R: Read>(mut reader: R) -> io::Result<FingerprintId> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(finish(hasher))
}

/// Fingerprint id of a file on disk.
pub fn fingerprint_of_file(path: &Path) -> Result<FingerprintId, IdError> {
    let file = File::open(path)?;
    Ok(md5_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_md5_known_vectors() {
        assert_eq!(md5_hex(b"").as_str(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"abc").as_str(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_reader_matches_buffer_across_chunks() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        let streamed = md5_reader(data.as_slice()).unwrap();
        assert_eq!(streamed, md5_hex(&data));
    }

    #[test]
    fn test_fingerprint_of_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.zip");
        fs::write(&path, b"abc").unwrap();

        let id = fingerprint_of_file(&path).unwrap();
        assert_eq!(id.as_str(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_fingerprint_of_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = fingerprint_of_file(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, IdError::Io(_)));
    }
}
