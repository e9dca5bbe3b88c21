/*!
# Proof-of-relay challenges

A relay claims payment for forwarding a packet by showing that it knows the
secret bound to a specific iteration of a payment channel. The challenge is the
digest of that secret and iteration, and the payer signs it with a recoverable
signature.

```bytes
0-31    challenge = hash(secret ‖ iteration as 32 byte big-endian)
32-95   compact secp256k1 signature over the challenge
96      recovery id
```

Because the signer's key is recovered from the signature, flipping any single
bit of a signed challenge makes it either unrecoverable or recover a different
key, so verification fails.
*/
use std::convert::TryInto;
use std::fmt;

use crate::crypto::{hash, recover, Hash, PublicKey, HASH_SIZE, SIGNATURE_SIZE};
use crate::keypair::Keypair;
use crate::util::number_to_buffer;
use crate::{Error, Result};

/// Width of the encoded channel iteration.
pub const ITERATION_SIZE: usize = 32;
pub const SIGNED_CHALLENGE_SIZE: usize = HASH_SIZE + SIGNATURE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    hash: Hash,
}

impl Challenge {
    /// Bind `secret` to channel `iteration`. Deterministic.
    pub fn create(secret: &[u8], iteration: u64) -> Result<Challenge> {
        let mut preimage = secret.to_vec();
        preimage.extend(number_to_buffer(iteration, ITERATION_SIZE)?);
        Ok(Challenge {
            hash: hash(&preimage),
        })
    }

    pub fn from_hash(hash: Hash) -> Challenge {
        Challenge { hash }
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn sign(&self, keypair: &Keypair) -> Result<SignedChallenge> {
        let signature = keypair.sign_hash(&self.hash)?;

        let mut bytes = [0u8; SIGNED_CHALLENGE_SIZE];
        bytes[..HASH_SIZE].copy_from_slice(&self.hash);
        bytes[HASH_SIZE..].copy_from_slice(&signature);
        Ok(SignedChallenge { bytes })
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Challenge({})", hex::encode(self.hash))
    }
}

/// A challenge together with the recoverable signature of the party that
/// issued it.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedChallenge {
    bytes: [u8; SIGNED_CHALLENGE_SIZE],
}

impl SignedChallenge {
    pub fn from_bytes(bytes: &[u8]) -> Result<SignedChallenge> {
        let bytes: [u8; SIGNED_CHALLENGE_SIZE] = bytes.try_into().map_err(|_| {
            Error::Decode(format!(
                "signed challenge must be {} bytes, got {}",
                SIGNED_CHALLENGE_SIZE,
                bytes.len()
            ))
        })?;
        Ok(SignedChallenge { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(test)]
    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn challenge(&self) -> Challenge {
        let mut challenge_hash = [0u8; HASH_SIZE];
        challenge_hash.copy_from_slice(&self.bytes[..HASH_SIZE]);
        Challenge::from_hash(challenge_hash)
    }

    pub fn signature(&self) -> &[u8] {
        &self.bytes[HASH_SIZE..]
    }

    /// The public key of whoever signed the challenge.
    pub fn counterparty(&self) -> Result<PublicKey> {
        recover(self.challenge().hash(), self.signature())
    }

    /// True iff the challenge was signed by `public_key` and has not been
    /// tampered with.
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        match self.counterparty() {
            Ok(recovered) => &recovered == public_key,
            Err(_) => false,
        }
    }
}

impl fmt::Debug for SignedChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedChallenge({})", hex::encode(&self.bytes[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_secret() -> [u8; 32] {
        rand::random()
    }

    #[test]
    fn signed_challenge_verifies() {
        let keypair = Keypair::new();
        let challenge = Challenge::create(&random_secret(), 0).unwrap();
        let signed = challenge.sign(&keypair).unwrap();

        assert!(signed.verify(keypair.public_key()));
        assert_eq!(&signed.counterparty().unwrap(), keypair.public_key());
        assert_eq!(signed.challenge(), challenge);
    }

    #[test]
    fn challenge_is_deterministic() {
        let secret = random_secret();
        assert_eq!(
            Challenge::create(&secret, 42).unwrap(),
            Challenge::create(&secret, 42).unwrap()
        );
        assert_ne!(
            Challenge::create(&secret, 42).unwrap(),
            Challenge::create(&secret, 43).unwrap()
        );
    }

    #[test]
    fn challenge_hashes_fixed_width_iteration() {
        let secret = [7u8; 32];
        let mut preimage = secret.to_vec();
        let mut iteration = [0u8; ITERATION_SIZE];
        iteration[ITERATION_SIZE - 1] = 5;
        preimage.extend_from_slice(&iteration);

        assert_eq!(Challenge::create(&secret, 5).unwrap().hash(), &hash(&preimage));
    }

    #[test]
    fn other_identity_does_not_verify() {
        let signed = Challenge::create(&random_secret(), 3)
            .unwrap()
            .sign(&Keypair::new())
            .unwrap();
        assert!(!signed.verify(Keypair::new().public_key()));
    }

    #[test]
    fn manipulated_challenge_fails_verification() {
        let keypair = Keypair::new();
        let mut signed = Challenge::create(&random_secret(), 0)
            .unwrap()
            .sign(&keypair)
            .unwrap();
        signed.as_mut_bytes()[0] ^= 0xff;

        assert!(!signed.verify(keypair.public_key()));
    }

    #[test]
    fn every_single_bit_flip_fails_verification() {
        let keypair = Keypair::new();
        let signed = Challenge::create(&random_secret(), 17)
            .unwrap()
            .sign(&keypair)
            .unwrap();

        for byte in 0..SIGNED_CHALLENGE_SIZE {
            for bit in 0..8 {
                let mut tampered = signed.clone();
                tampered.as_mut_bytes()[byte] ^= 1 << bit;
                assert!(
                    !tampered.verify(keypair.public_key()),
                    "flipping bit {} of byte {} went unnoticed",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn from_bytes_round_trips_and_checks_length() {
        let signed = Challenge::create(&random_secret(), 9)
            .unwrap()
            .sign(&Keypair::new())
            .unwrap();

        assert_eq!(SignedChallenge::from_bytes(signed.as_bytes()).unwrap(), signed);
        assert!(SignedChallenge::from_bytes(&signed.as_bytes()[1..]).is_err());
    }
}
