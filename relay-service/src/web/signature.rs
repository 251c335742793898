//! Telegram webhook signature verification.
//!
//! Deliveries are authenticated with an HMAC-SHA256 digest of the raw
//! request body, carried in the `X-Telegram-Bot-Api-Secret-Token` header.
//! Verification runs over the exact wire bytes, never a re-serialized
//! form, so there is no canonicalization step to disagree about.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature token on webhook deliveries.
pub const SIGNATURE_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Verify a webhook delivery against the shared secret.
///
/// Signature enforcement is opt-in: with an empty `secret` every request
/// passes. Otherwise the provided token must equal the hex-encoded
/// HMAC-SHA256 of the body under the secret.
///
/// # Arguments
///
/// * `secret` - The configured shared secret (empty disables checking)
/// * `body` - The raw request body bytes
/// * `provided` - The token from the signature header, if any
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    provided: Option<&str>,
) -> Result<(), AuthError> {
    if secret.is_empty() {
        return Ok(());
    }

    let provided = match provided {
        Some(token) => token,
        None => {
            warn!("signature_header_missing");
            return Err(AuthError::MissingSignature);
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("signature_invalid_key");
            return Err(AuthError::InvalidSignature);
        }
    };

    mac.update(body);

    let expected = hex::encode(mac.finalize().into_bytes());

    if !constant_time_compare(&expected, provided) {
        warn!(
            expected_length = expected.len(),
            actual_length = provided.len(),
            "signature_mismatch"
        );
        return Err(AuthError::InvalidSignature);
    }

    Ok(())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if signature enforcement is enabled for the given secret.
pub fn is_signature_enforced(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_skipped_when_secret_empty() {
        assert!(verify_signature("", b"anything", None).is_ok());
        assert!(verify_signature("", b"anything", Some("junk")).is_ok());
        assert!(verify_signature("", b"", None).is_ok());
    }

    #[test]
    fn test_verify_missing_token() {
        let err = verify_signature("secret", b"body", None).unwrap_err();
        assert_eq!(err, AuthError::MissingSignature);
    }

    #[test]
    fn test_verify_valid_signature() {
        let body = br#"{"update_id": 1}"#;
        let token = sign("secret", body);

        assert!(verify_signature("secret", body, Some(&token)).is_ok());
    }

    #[test]
    fn test_verify_tampered_signature() {
        let body = br#"{"update_id": 1}"#;
        let mut token = sign("secret", body);

        // Flip the last hex character.
        let flipped = if token.ends_with('0') { "1" } else { "0" };
        token.replace_range(token.len() - 1.., flipped);

        let err = verify_signature("secret", body, Some(&token)).unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn test_verify_wrong_secret() {
        let body = br#"{"update_id": 1}"#;
        let token = sign("other-secret", body);

        let err = verify_signature("secret", body, Some(&token)).unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_is_signature_enforced() {
        assert!(!is_signature_enforced(&None));
        assert!(!is_signature_enforced(&Some("".to_string())));
        assert!(!is_signature_enforced(&Some("   ".to_string())));
        assert!(is_signature_enforced(&Some("key123".to_string())));
    }
}
