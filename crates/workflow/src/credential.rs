//! Salted SHA-256 credential digests
//!
//! Credentials are opaque to the workflow; only the digest and salt are stored.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Stored form of a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDigest {
    pub hash: String,
    pub salt: String,
}

impl CredentialDigest {
    /// Hash a credential with a fresh random salt
    pub fn create(credential: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let hash = digest(&salt, credential);
        Self { hash, salt }
    }

    pub fn from_parts(hash: &str, salt: &str) -> Self {
        Self {
            hash: hash.to_string(),
            salt: salt.to_string(),
        }
    }

    pub fn verify(&self, credential: &str) -> bool {
        digest(&self.salt, credential) == self.hash
    }
}

fn digest(salt: &str, credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(credential.as_bytes());
    hex::encode(hasher.finalize())
}
