use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// RFC 7636 unreserved characters. 66 symbols.
const UNRESERVED: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

const ALPHANUMERIC: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// RFC 7636 allows 43-128; NetSuite accepts the full range, 64 sits mid-range.
const VERIFIER_LEN: usize = 64;

const STATE_LEN: usize = 24;

/// Fresh PKCE code verifier: 64 unreserved characters from the CSPRNG.
pub fn generate_code_verifier() -> String {
    random_string(VERIFIER_LEN, UNRESERVED)
}

/// S256 challenge for a verifier: base64url(SHA-256(verifier)), no padding.
/// Deterministic; the token endpoint recomputes this at exchange time.
pub fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// CSRF state parameter, minted once per authorization attempt.
pub fn generate_state() -> String {
    random_string(STATE_LEN, ALPHANUMERIC)
}

fn random_string(len: usize, alphabet: &[u8]) -> String {
    let mut buf = vec![0u8; len];
    rand::Rng::fill_bytes(&mut rand::rng(), &mut buf);
    buf.iter()
        .map(|b| alphabet[*b as usize % alphabet.len()] as char)
        .collect()
}
