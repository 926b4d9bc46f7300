//! Wallet address codec and ed25519 signature verification
//!
//! Wallet addresses are the base32 form of a 32-byte ed25519 public key
//! followed by a 4-byte checksum (the tail of SHA-512/256 over the key).

use base32::Alphabet;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha512_256};
use thiserror::Error;

/// Length of an encoded wallet address
pub const ADDRESS_LENGTH: usize = 58;

const PUBLIC_KEY_LENGTH: usize = 32;
const CHECKSUM_LENGTH: usize = 4;
const ADDRESS_ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Errors that can occur while decoding wallet addresses
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid wallet address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid address checksum")]
    InvalidChecksum,
}

/// Encode a public key as a wallet address
pub fn encode_address(public_key: &[u8; 32]) -> String {
    let mut bytes = Vec::with_capacity(PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH);
    bytes.extend_from_slice(public_key);
    bytes.extend_from_slice(&address_checksum(public_key));
    base32::encode(ADDRESS_ALPHABET, &bytes)
}

/// Recover the public key embedded in a wallet address
pub fn decode_address(address: &str) -> Result<[u8; 32], CryptoError> {
    if address.len() != ADDRESS_LENGTH {
        return Err(CryptoError::InvalidAddressFormat(format!(
            "Expected {} characters, got {}",
            ADDRESS_LENGTH,
            address.len()
        )));
    }

    let decoded = base32::decode(ADDRESS_ALPHABET, address)
        .ok_or_else(|| CryptoError::InvalidAddressFormat("Invalid base32 encoding".to_string()))?;

    if decoded.len() != PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH {
        return Err(CryptoError::InvalidAddressFormat(format!(
            "Expected {} bytes, got {}",
            PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH,
            decoded.len()
        )));
    }

    let mut public_key = [0u8; PUBLIC_KEY_LENGTH];
    public_key.copy_from_slice(&decoded[..PUBLIC_KEY_LENGTH]);

    if decoded[PUBLIC_KEY_LENGTH..] != address_checksum(&public_key) {
        return Err(CryptoError::InvalidChecksum);
    }

    Ok(public_key)
}

/// Verify an ed25519 signature over `message`
///
/// Malformed keys or signatures are reported as a failed verification.
pub fn verify_signature(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };

    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };

    verifying_key.verify(message, &signature).is_ok()
}

fn address_checksum(public_key: &[u8; 32]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha512_256::digest(public_key);
    let mut checksum = [0u8; CHECKSUM_LENGTH];
    checksum.copy_from_slice(&digest[digest.len() - CHECKSUM_LENGTH..]);
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[42u8; 32])
    }

    #[test]
    fn test_address_round_trip() {
        let public_key = signing_key().verifying_key().to_bytes();
        let address = encode_address(&public_key);

        assert_eq!(address.len(), ADDRESS_LENGTH);
        assert_eq!(decode_address(&address).unwrap(), public_key);
    }

    #[test]
    fn test_zero_key_address() {
        // Well-known address of the all-zero public key
        let address = encode_address(&[0u8; 32]);
        assert_eq!(
            address,
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ"
        );
    }

    #[test]
    fn test_invalid_address_length() {
        let result = decode_address("ADDR1");
        assert!(matches!(result, Err(CryptoError::InvalidAddressFormat(_))));
    }

    #[test]
    fn test_invalid_address_checksum() {
        let mut address = encode_address(&signing_key().verifying_key().to_bytes());
        // Flip a character inside the public key portion
        let replacement = if address.starts_with('A') { "B" } else { "A" };
        address.replace_range(0..1, replacement);

        assert_eq!(decode_address(&address), Err(CryptoError::InvalidChecksum));
    }

    #[test]
    fn test_invalid_base32() {
        let address = "1".repeat(ADDRESS_LENGTH);
        assert!(matches!(
            decode_address(&address),
            Err(CryptoError::InvalidAddressFormat(_))
        ));
    }

    #[test]
    fn test_verify_signature() {
        let key = signing_key();
        let message = b"arc14 test message";
        let signature = key.sign(message).to_bytes();
        let public_key = key.verifying_key().to_bytes();

        assert!(verify_signature(&public_key, message, &signature));
        assert!(!verify_signature(&public_key, b"other message", &signature));
        assert!(!verify_signature(&public_key, message, &signature[..10]));
    }
}
