//! One-way identifier transforms used before sharing exported histories.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

/// Deterministic one-way mapping of account and record identifiers.
///
/// Equal inputs must map to equal outputs so that deduplication by
/// `(time, id)` keeps working on anonymised data.
pub trait IdentifierTransform: Send + Sync {
    /// Transform an account identifier.
    fn subject(&self, subject_id: &str) -> String;
    /// Transform a record identifier.
    fn record(&self, record_id: &str) -> String;
}

const SUBJECT_SALT: &str = "Py6ensh1n";
const SUBJECT_MASK: [u8; 8] = [149, 138, 169, 196, 118, 169, 129, 199];
const SUBJECT_ROUNDS: usize = 91;

/// SHA-256 based transform.
///
/// - subject: salted input hashed 91 times, folded by XOR into an 8-byte mask
///   (16 hex chars);
/// - record: one digest with adjacent bytes XOR-ed pairwise (32 hex chars).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Transform;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

impl IdentifierTransform for Sha256Transform {
    fn subject(&self, subject_id: &str) -> String {
        let mut digest: Vec<u8> = format!("{subject_id}{SUBJECT_SALT}").into_bytes();
        for _ in 0..SUBJECT_ROUNDS {
            digest = Sha256::digest(&digest).to_vec();
        }
        let mut out = SUBJECT_MASK;
        for (i, b) in digest.iter().enumerate() {
            out[i % out.len()] ^= b;
        }
        to_hex(&out)
    }

    fn record(&self, record_id: &str) -> String {
        let digest = Sha256::digest(record_id.as_bytes());
        let folded: Vec<u8> = digest.chunks_exact(2).map(|p| p[0] ^ p[1]).collect();
        to_hex(&folded)
    }
}
