//! Content identity key: SHA-1 digest plus payload length

use sha1::{Digest, Sha1};
use std::fmt;

/// Length of the SHA-1 digest in bytes
pub const DIGEST_LEN: usize = 20;

/// Content-derived identity of a blob
///
/// Rendered as `hex(sha1(content))` followed by the byte length as lowercase
/// hex zero-padded to at least eight digits. Payloads of 4 GiB or more widen
/// the length field rather than truncating it; the digest part is always 40
/// characters so the rendering stays unambiguous.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    digest: [u8; DIGEST_LEN],
    size: u64,
}

impl IdentityKey {
    /// Compute the key for arbitrary content
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        IdentityKey {
            digest: hasher.finalize().into(),
            size: data.len() as u64,
        }
    }

    /// Build a key from an already computed digest and length
    pub fn from_parts(digest: [u8; DIGEST_LEN], size: u64) -> Self {
        IdentityKey { digest, size }
    }

    /// Payload length in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hex SHA-1 digest alone
    pub fn hash_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Full key string, usable as a file name stem
    pub fn to_hex(&self) -> String {
        format!("{}{:08x}", self.hash_hex(), self.size)
    }

    /// Short prefix for log lines
    pub fn short(&self) -> String {
        self.hash_hex()[..10].to_string()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({}, {})", self.short(), self.size)
    }
}
