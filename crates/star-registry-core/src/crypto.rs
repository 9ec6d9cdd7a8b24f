//! Cryptographic primitives: SHA-256 block digests and Ed25519 identities.
//!
//! A claimant's address is the hex encoding of their Ed25519 public key. A
//! proof of identity is an Ed25519 signature over the UTF-8 bytes of a
//! challenge message, transported as hex.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CoreError;

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A claimant address: a 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to the hex form used on the wire and in blocks.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from the hex form.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidAddress(format!("expected 32 bytes: {}", s)))?;
        Ok(Self(arr))
    }

    /// Verify an Ed25519 signature over a message.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> Result<(), CoreError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
        let sig = Signature::from_bytes(signature);
        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Checks that `signature` over `message` was produced by `address`.
///
/// This is the proof-of-identity capability the validation window depends
/// on. Implementations must be pure: the same inputs always give the same
/// answer.
pub trait SignatureVerifier: Send + Sync {
    /// `Ok(())` when the signature is valid; `InvalidSignature` when it is
    /// well-formed but wrong; other errors when an input cannot be parsed.
    fn verify(&self, message: &str, address: &str, signature: &str) -> Result<(), CoreError>;
}

/// Ed25519 verifier over hex addresses and hex signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> Result<(), CoreError> {
        let address = Address::from_hex(address)?;
        let bytes =
            hex::decode(signature).map_err(|e| CoreError::MalformedSignature(e.to_string()))?;
        let sig: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CoreError::MalformedSignature("expected 64 bytes".into()))?;
        address.verify(message.as_bytes(), &sig)
    }
}

/// A keypair for signing validation challenges.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The address derived from the public key.
    pub fn address(&self) -> Address {
        Address(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a challenge message, returning the hex signature.
    pub fn sign_message(&self, message: &str) -> String {
        hex::encode(self.signing_key.sign(message.as_bytes()).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            Sha256Hash::hash(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sign_and_verify_message() {
        let keypair = Keypair::generate();
        let address = keypair.address().to_hex();
        let message = format!("{}:1532296090:starRegistry", address);
        let signature = keypair.sign_message(&message);

        Ed25519Verifier
            .verify(&message, &address, &signature)
            .expect("valid signature should verify");

        let tampered = format!("{}:1532296091:starRegistry", address);
        assert!(matches!(
            Ed25519Verifier.verify(&tampered, &address, &signature),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signature_from_other_key_rejected() {
        let alice = Keypair::from_seed(&[1u8; 32]);
        let mallory = Keypair::from_seed(&[2u8; 32]);
        let message = "challenge";
        let forged = mallory.sign_message(message);

        assert!(matches!(
            Ed25519Verifier.verify(message, &alice.address().to_hex(), &forged),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_inputs() {
        let keypair = Keypair::from_seed(&[7u8; 32]);
        let address = keypair.address().to_hex();

        assert!(matches!(
            Ed25519Verifier.verify("m", &address, "not-hex"),
            Err(CoreError::MalformedSignature(_))
        ));
        assert!(matches!(
            Ed25519Verifier.verify("m", &address, "abcd"),
            Err(CoreError::MalformedSignature(_))
        ));
        assert!(matches!(
            Ed25519Verifier.verify("m", "1NotHex", &keypair.sign_message("m")),
            Err(CoreError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let address = keypair.address();
        assert_eq!(Address::from_hex(&address.to_hex()).unwrap(), address);
    }
}
