//! Salted SHA-256 password digests.
//!
//! Stored format: `sha256$<salt>$<hex digest of salt || password>`.

use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    hash_password_with_salt(password, &salt)
}

/// Hash `password` with the given salt.
pub fn hash_password_with_salt(password: &str, salt: &str) -> String {
    format!("{}${}${}", SCHEME, salt, digest(salt, password))
}

/// Check `password` against a stored digest. Malformed digests never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(scheme), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }

    let actual = digest(salt, password);
    actual.len() == expected.len()
        && actual
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_password("s3cret");
        assert!(stored.starts_with("sha256$"));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_known_salt_is_deterministic() {
        assert_eq!(
            hash_password_with_salt("pw", "salt"),
            hash_password_with_salt("pw", "salt")
        );
    }

    #[test]
    fn test_malformed_digest_never_matches() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "md5$salt$abc"));
        assert!(!verify_password("pw", "sha256$onlysalt"));
    }
}
