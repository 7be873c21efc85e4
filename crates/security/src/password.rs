//! Password hashing
//!
//! Hashes are stored as `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`.
//! The digest is PBKDF2-HMAC-SHA256 over the password and salt.
//! Verification recomputes the digest and compares in constant time.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Scheme tag at the start of every hash
pub const SCHEME: &str = "pbkdf2-sha256";
/// Iterations used for new hashes
pub const DEFAULT_ITERATIONS: u32 = 10_000;
/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// A parsed password hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: Vec<u8>,
    digest: [u8; 32],
}

impl PasswordHash {
    /// Hash `password` with a fresh random salt
    pub fn new(password: &str) -> Self {
        let mut salt = vec![0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(password, salt, DEFAULT_ITERATIONS)
    }

    /// Hash with a given salt and iteration count
    pub fn with_salt(password: &str, salt: Vec<u8>, iterations: u32) -> Self {
        let digest = derive(password.as_bytes(), &salt, iterations);
        Self {
            iterations,
            salt,
            digest,
        }
    }

    /// Whether `password` produces this hash
    pub fn verify(&self, password: &str) -> bool {
        let candidate = derive(password.as_bytes(), &self.salt, self.iterations);
        candidate.ct_eq(&self.digest).into()
    }
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut digest = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password, salt, iterations.max(1), &mut digest);
    digest
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(&self.salt),
            hex::encode(self.digest)
        )
    }
}

impl FromStr for PasswordHash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(digest), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err("malformed password hash".to_string());
        };
        if scheme != SCHEME {
            return Err(format!("unsupported hash scheme '{}'", scheme));
        }
        let iterations: u32 = iterations
            .parse()
            .map_err(|_| "invalid iteration count".to_string())?;
        if iterations == 0 {
            return Err("invalid iteration count".to_string());
        }
        let salt = hex::decode(salt).map_err(|e| format!("invalid salt: {}", e))?;
        let digest: [u8; 32] = hex::decode(digest)
            .map_err(|e| format!("invalid digest: {}", e))?
            .try_into()
            .map_err(|_| "digest must be 32 bytes".to_string())?;
        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> String {
    PasswordHash::new(password).to_string()
}

/// Check `password` against a stored hash; garbled hashes never verify
pub fn verify_password(password: &str, stored: &str) -> bool {
    stored
        .parse::<PasswordHash>()
        .map(|hash| hash.verify(password))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("admin123");
        assert!(stored.starts_with("pbkdf2-sha256$10000$"));
        assert!(verify_password("admin123", &stored));
        assert!(!verify_password("admin124", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn test_digest_matches_pbkdf2_hmac_sha256() {
        // RFC 7914 section 11 test vector
        let hash = PasswordHash::with_salt("passwd", b"salt".to_vec(), 1);
        assert!(hash
            .to_string()
            .ends_with("$55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("rahasia"), hash_password("rahasia"));
    }

    #[test]
    fn test_deterministic_with_salt() {
        let a = PasswordHash::with_salt("pw", vec![1, 2, 3], 3);
        let b = PasswordHash::with_salt("pw", vec![1, 2, 3], 3);
        assert_eq!(a, b);
        assert_eq!(a.to_string().parse::<PasswordHash>().unwrap(), a);
        assert_ne!(a, PasswordHash::with_salt("pw", vec![1, 2, 3], 4));
    }

    #[test]
    fn test_garbled_hashes_never_verify() {
        for stored in [
            "",
            "plaintext",
            "md5$1$00$00",
            "sha256$10$00$00",
            "pbkdf2-sha256$x$00$00",
            "pbkdf2-sha256$0$00$00",
            "pbkdf2-sha256$10$zz$00",
            "pbkdf2-sha256$10$00$abcd",
            "pbkdf2-sha256$10$00$00$extra",
        ] {
            assert!(!verify_password("anything", stored), "{}", stored);
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_only_the_hashed_password_verifies(pw in ".{0,24}", other in ".{0,24}") {
            let hash = PasswordHash::with_salt(&pw, vec![7; SALT_LEN], 2);
            proptest::prop_assert!(hash.verify(&pw));
            proptest::prop_assert_eq!(hash.verify(&other), pw == other);
        }
    }
}
