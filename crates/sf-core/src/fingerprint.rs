//! Statement fingerprinting for drift detection.
//!
//! A [`Fingerprint`] accumulates the raw bytes of every statement a migration
//! issues, in call order, and reduces them to a SHA-256 hex digest. The digest
//! is what gets persisted in the history table and later recomputed to detect
//! migrations that changed after being applied.
//!
//! Statements are concatenated without separators, so `"AB"` recorded once
//! hashes the same as `"A"` followed by `"B"`.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Accumulates statements and produces a stable content hash.
#[derive(Debug, Clone, Default)]
pub struct Fingerprint {
    buffer: Vec<u8>,
    statements: usize,
}

impl Fingerprint {
    /// Create an empty fingerprint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement's bytes verbatim.
    pub fn record(&mut self, statement: &str) {
        self.buffer.extend_from_slice(statement.as_bytes());
        self.statements += 1;
    }

    /// Number of `record` calls so far.
    pub fn statements(&self) -> usize {
        self.statements
    }

    /// Lowercase hex SHA-256 of everything recorded so far.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.buffer);
        format!("{:x}", hasher.finalize())
    }
}

/// Returns true if `s` looks like a digest produced by [`Fingerprint::digest`].
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
#[path = "fingerprint_test.rs"]
mod tests;
