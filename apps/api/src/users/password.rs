//! Password hashing: PBKDF2-HMAC-SHA256 with a per-password random salt.
//!
//! Stored format: `pbkdf2_sha256$<iterations>$<salt b64>$<hash b64>`. Verification
//! reads the iteration count from the stored value, so raising `ITERATIONS` later
//! keeps old hashes valid.
//!
//! Accounts created by the previous backend hold bcrypt hashes (`$2a$`/`$2b$`/`$2y$`).
//! Those still verify, including the SHA-256 pre-hash that backend applied to
//! passwords longer than bcrypt's 72-byte limit, and are upgraded on the next login.

use anyhow::anyhow;
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

pub const SCHEME: &str = "pbkdf2_sha256";
pub const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Prefixes of hashes written by the previous bcrypt-based backend.
const LEGACY_BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];
/// bcrypt ignores input past this length.
const BCRYPT_MAX_BYTES: usize = 72;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    hash_with_params(password, ITERATIONS, &salt)
}

fn hash_with_params(password: &str, iterations: u32, salt: &[u8]) -> String {
    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    format!(
        "{SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
}

/// Checks `password` against a stored PBKDF2 or legacy bcrypt hash. Anything else
/// (plaintext leftovers, unknown schemes, malformed values) never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_legacy_bcrypt(stored) {
        return verify_legacy_bcrypt(password, stored);
    }

    let mut parts = stored.splitn(4, '$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Some(iterations) = iterations.parse::<u32>().ok().filter(|n| *n > 0) else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (
        STANDARD_NO_PAD.decode(salt),
        STANDARD_NO_PAD.decode(expected),
    ) else {
        return false;
    };
    // A shorter digest would still match the PBKDF2 output prefix.
    if expected.len() != HASH_LEN {
        return false;
    }

    let mut actual = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut actual);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

/// Plain bcrypt first; passwords over 72 bytes were stored as bcrypt(sha256 hex).
fn verify_legacy_bcrypt(password: &str, stored: &str) -> bool {
    if bcrypt::verify(password, stored).unwrap_or(false) {
        return true;
    }
    if password.len() > BCRYPT_MAX_BYTES {
        return bcrypt::verify(sha256_hex(password), stored).unwrap_or(false);
    }
    false
}

fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn is_legacy_bcrypt(stored: &str) -> bool {
    LEGACY_BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p))
}

/// True when `stored` is already a hash (ours or legacy bcrypt) rather than plaintext.
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with(&format!("{SCHEME}$")) || is_legacy_bcrypt(stored)
}

/// True when a verified password should be re-hashed with the current scheme.
pub fn needs_rehash(stored: &str) -> bool {
    !stored.starts_with(&format!("{SCHEME}$"))
}

/// Hashes on the blocking pool; 100k PBKDF2 rounds must not stall the async runtime.
pub async fn hash_password_async(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow!("password hashing task failed: {e}")))
}

pub async fn verify_password_async(password: String, stored: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(anyhow!("password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cost 4 is bcrypt's minimum and keeps these fast.
    const TEST_BCRYPT_COST: u32 = 4;

    #[test]
    fn test_legacy_bcrypt_2b_hash_verifies() {
        let stored = bcrypt::hash("password", TEST_BCRYPT_COST).unwrap();
        assert!(stored.starts_with("$2b$"));
        assert!(is_hashed(&stored));
        assert!(verify_password("password", &stored));
        assert!(!verify_password("Password", &stored));
        assert!(needs_rehash(&stored));
    }

    #[test]
    fn test_legacy_bcrypt_2a_hash_verifies() {
        let stored = bcrypt::hash_with_result("s3cret", TEST_BCRYPT_COST)
            .unwrap()
            .format_for_version(bcrypt::Version::TwoA);
        assert!(stored.starts_with("$2a$"));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("s3cret!", &stored));
    }

    #[test]
    fn test_legacy_long_password_uses_sha256_prehash() {
        let long = "ตั๋ว".repeat(10); // 120 UTF-8 bytes
        assert!(long.len() > BCRYPT_MAX_BYTES);
        let stored = bcrypt::hash(sha256_hex(&long), TEST_BCRYPT_COST).unwrap();

        assert!(verify_password(&long, &stored));
        assert!(!verify_password(&format!("{long}x"), &stored));
        // The pre-hash path only applies to long inputs.
        let short = bcrypt::hash("short", TEST_BCRYPT_COST).unwrap();
        assert!(!verify_password(&sha256_hex("short"), &short));
    }

    #[test]
    fn test_sha256_hex_matches_known_digest() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_current_scheme_needs_no_rehash() {
        assert!(!needs_rehash(&hash_with_params("pw", 1, b"s")));
        assert!(needs_rehash("plaintext"));
    }

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_password("s3cret-ticket");
        assert!(stored.starts_with("pbkdf2_sha256$100000$"));
        assert!(verify_password("s3cret-ticket", &stored));
        assert!(!verify_password("s3cret-tickeT", &stored));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_stored_iteration_count_is_honoured() {
        let stored = hash_with_params("pw", 1_000, b"0123456789abcdef");
        assert!(verify_password("pw", &stored));
        assert!(!verify_password("pw2", &stored));
    }

    #[test]
    fn test_long_passwords_are_not_truncated() {
        let base = "x".repeat(100);
        let stored = hash_with_params(&format!("{base}A"), 1_000, b"salt-salt-salt!!");
        assert!(verify_password(&format!("{base}A"), &stored));
        assert!(!verify_password(&format!("{base}B"), &stored));
    }

    #[test]
    fn test_malformed_or_foreign_values_never_verify() {
        for stored in [
            "",
            "hunter2",
            "$2b$12$abcdefghijklmnopqrstuuJ0m1Q9mYH6d0f2t9Zb3o0Zk8J9Ka",
            "pbkdf2_sha256$0$c2FsdA$aGFzaA",
            "pbkdf2_sha256$abc$c2FsdA$aGFzaA",
            "pbkdf2_sha256$1000$!!!$aGFzaA",
            "pbkdf2_sha256$1000$c2FsdA$",
            "md5$1000$c2FsdA$aGFzaA",
        ] {
            assert!(!verify_password("hunter2", stored), "{stored:?} verified");
        }
    }

    #[test]
    fn test_truncated_digest_never_verifies() {
        let stored = hash_with_params("pw", 1_000, b"0123456789abcdef");
        let (prefix, digest) = stored.rsplit_once('$').unwrap();
        let digest = STANDARD_NO_PAD.decode(digest).unwrap();
        for len in [1, 16, HASH_LEN - 1] {
            let truncated = format!("{prefix}${}", STANDARD_NO_PAD.encode(&digest[..len]));
            assert!(!verify_password("pw", &truncated), "{len}-byte digest verified");
        }
        assert!(verify_password("pw", &stored));
    }

    #[test]
    fn test_is_hashed() {
        assert!(is_hashed(&hash_with_params("pw", 1, b"s")));
        assert!(is_hashed("$2b$12$somethingsomething"));
        assert!(!is_hashed("plain-password"));
        assert!(!is_hashed("pbkdf2_sha256"));
    }

    #[tokio::test]
    async fn test_async_wrappers_round_trip() {
        let stored = hash_password_async("pw".to_string()).await.unwrap();
        assert!(verify_password_async("pw".to_string(), stored).await.unwrap());
    }
}
