use secp256k1::recovery::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1};
use sha2::{Digest, Sha256};

pub use secp256k1::{PublicKey, SecretKey};

use crate::{Error, Result};

pub const HASH_SIZE: usize = 32;
pub const ADDRESS_SIZE: usize = 20;
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;
/// Compact signature followed by a one byte recovery id.
pub const SIGNATURE_SIZE: usize = 65;

pub type Hash = [u8; HASH_SIZE];
pub type Address = [u8; ADDRESS_SIZE];
pub type RecoverableSignatureBytes = [u8; SIGNATURE_SIZE];

pub fn hash(data: &[u8]) -> Hash {
    let mut output = [0u8; HASH_SIZE];
    output.copy_from_slice(Sha256::digest(data).as_slice());
    output
}

/// Create a fresh secp256k1 keypair, returned as (public, secret).
pub fn generate_keys() -> (PublicKey, SecretKey) {
    loop {
        // the odds of drawing an invalid scalar are negligible, but not zero
        let candidate: [u8; 32] = rand::random();
        if let Ok(secret_key) = SecretKey::from_slice(&candidate) {
            let public_key = PublicKey::from_secret_key(&SECP256K1, &secret_key);
            return (public_key, secret_key);
        }
    }
}

/// Sign a 32 byte digest so that the signer's public key can be recovered
/// from the digest and the signature alone.
pub fn sign_recoverable(
    message_hash: &Hash,
    secret_key: &SecretKey,
) -> Result<RecoverableSignatureBytes> {
    let message = Message::from_slice(message_hash)?;
    let (recovery_id, compact) = SECP256K1
        .sign_recoverable(&message, secret_key)
        .serialize_compact();

    let mut signature = [0u8; SIGNATURE_SIZE];
    signature[..64].copy_from_slice(&compact);
    signature[64] = recovery_id.to_i32() as u8;
    Ok(signature)
}

/// Recover the public key that produced `signature` over `message_hash`.
pub fn recover(message_hash: &Hash, signature: &[u8]) -> Result<PublicKey> {
    if signature.len() != SIGNATURE_SIZE {
        return Err(Error::Validation(format!(
            "expected a {} byte signature, got {}",
            SIGNATURE_SIZE,
            signature.len()
        )));
    }
    let recovery_id = RecoveryId::from_i32(i32::from(signature[64]))?;
    let signature = RecoverableSignature::from_compact(&signature[..64], recovery_id)?;
    let message = Message::from_slice(message_hash)?;
    Ok(SECP256K1.recover(&message, &signature)?)
}
