//! Password digests and session token issuance

use sha2::{Digest, Sha256};

/// Seconds a token stays valid after issuance
pub const TOKEN_LIFETIME_SECONDS: i64 = 3600;

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Hex SHA-256 of the plaintext password
pub fn hash_password(password: &str) -> String {
    sha256_hex(password)
}

/// Token string for `username` issued at `timestamp` (epoch seconds)
pub fn generate_token(username: &str, timestamp: i64) -> String {
    sha256_hex(&format!("{}{}", username, timestamp))
}

/// A token is expired once more than an hour has passed since issuance
pub fn is_expired(issued_at: i64, now: i64) -> bool {
    now - issued_at > TOKEN_LIFETIME_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_hex_sha256() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_generate_token_depends_on_user_and_time() {
        let token = generate_token("alice", 1_700_000_000);
        assert_eq!(token.len(), 64);
        assert_eq!(token, hash_password("alice1700000000"));
        assert_ne!(token, generate_token("alice", 1_700_000_001));
        assert_ne!(token, generate_token("bob", 1_700_000_000));
    }

    #[test]
    fn test_expiry_window() {
        let issued = 1_000_000;
        assert!(!is_expired(issued, issued + 3599));
        assert!(!is_expired(issued, issued + 3600));
        assert!(is_expired(issued, issued + 3601));
    }
}
