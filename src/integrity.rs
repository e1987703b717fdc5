//! SHA-256 integrity digests

use sha2::{Digest as _, Sha256};

use crate::error::CodecError;

pub const DIGEST_LEN: usize = 32;

pub type Digest = [u8; DIGEST_LEN];

pub fn digest(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

/// Fail with [`CodecError::Integrity`] unless `data` hashes to `expected`.
pub fn verify(data: &[u8], expected: &Digest) -> Result<(), CodecError> {
    let actual = digest(data);
    if &actual != expected {
        return Err(CodecError::Integrity {
            expected: to_hex(expected),
            actual: to_hex(&actual),
        });
    }
    Ok(())
}

pub fn to_hex(digest: &Digest) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
