//! Password hashing and API token generation.
//!
//! Hashes are stored as `pbkdf2_sha256$<iterations>$<salt>$<hex digest>`;
//! the iteration count travels with the hash, so raising
//! [`DEFAULT_ITERATIONS`] does not invalidate existing accounts.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const DEFAULT_ITERATIONS: u32 = 260_000;

const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 20;
const DIGEST_BYTES: usize = 32;
const MISSING_USER_SALT: &str = "00000000000000000000000000000000";

pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, DEFAULT_ITERATIONS)
}

pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let iterations = iterations.max(1);
    let salt = hex::encode(random_bytes::<SALT_BYTES>());
    let digest = pbkdf2_sha256(password.as_bytes(), salt.as_bytes(), iterations);
    format!("{ALGORITHM}${iterations}${salt}${}", hex::encode(digest))
}

pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.splitn(4, '$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(expected)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if algorithm != ALGORITHM {
        log::warn!("Unsupported password hash algorithm: {}", algorithm);
        return false;
    }

    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }

    let Ok(expected) = hex::decode(expected) else {
        return false;
    };

    let digest = pbkdf2_sha256(password.as_bytes(), salt.as_bytes(), iterations);
    digest.as_slice().ct_eq(&expected).into()
}

/// Spends the same work as [`verify_password`] for a login whose username
/// does not exist, so both rejections take equally long. Always `false`.
pub fn verify_missing_user(password: &str, iterations: u32) -> bool {
    let digest = pbkdf2_sha256(
        password.as_bytes(),
        MISSING_USER_SALT.as_bytes(),
        iterations.max(1),
    );
    std::hint::black_box(digest);
    false
}

/// 40 lowercase hex characters from 20 random bytes.
pub fn generate_token_key() -> String {
    hex::encode(random_bytes::<TOKEN_BYTES>())
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; DIGEST_BYTES] {
    let mut output = [0u8; DIGEST_BYTES];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output);
    output
}
