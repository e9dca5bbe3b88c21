use crate::crypto::{
    generate_keys, hash, sign_recoverable, Hash, PublicKey, RecoverableSignatureBytes, SecretKey,
};
use crate::networking::peer::PeerId;
use crate::Result;
use secp256k1::SECP256K1;
use std::fmt;

/// An secp256k1 keypair for signing and recovering messages
#[derive(Debug, Clone, PartialEq)]
pub struct Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Keypair {
    /// Create and return a keypair with a randomly generated private key.
    pub fn new() -> Keypair {
        let (public_key, secret_key) = generate_keys();
        Keypair {
            secret_key,
            public_key,
        }
    }

    /// Create and return a keypair with the given bytes as the private key
    pub fn from_secret_slice(slice: &[u8]) -> Result<Keypair> {
        let secret_key = SecretKey::from_slice(slice)?;
        let public_key = PublicKey::from_secret_key(&SECP256K1, &secret_key);

        Ok(Keypair {
            secret_key,
            public_key,
        })
    }

    /// Create and return a keypair with the given hex string as the private key
    pub fn from_secret_hex(secret_hex: &str) -> Result<Keypair> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(secret_hex, &mut bytes as &mut [u8])
            .map_err(|err| crate::Error::Input(format!("invalid secret key hex: {}", err)))?;
        Keypair::from_secret_slice(&bytes)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// The identity other nodes know us by.
    pub fn peer_id(&self) -> PeerId {
        PeerId::from_public_key(self.public_key)
    }

    /// Sign a digest with a recoverable signature
    pub fn sign_hash(&self, message_hash: &Hash) -> Result<RecoverableSignatureBytes> {
        sign_recoverable(message_hash, &self.secret_key)
    }

    /// Hash and sign message bytes
    pub fn sign_message(&self, message_bytes: &[u8]) -> Result<RecoverableSignatureBytes> {
        self.sign_hash(&hash(message_bytes))
    }
}

impl Default for Keypair {
    fn default() -> Self {
        Keypair::new()
    }
}

impl fmt::Display for Keypair {
    /// formats a Keypair without leaking the secret
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pubkey:{}", self.peer_id())
    }
}
