use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Deterministic one-way digest of an opaque token string. Refresh and
/// verification tokens are stored as this digest only; lookups re-digest
/// the presented raw value and compare.
pub fn token_digest(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    STANDARD.encode(digest)
}
