use base58::ToBase58;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

use crate::crypto::{PublicKey, COMPRESSED_PUBLIC_KEY_SIZE};
use crate::{Error, Result};

/// A node's identity: its secp256k1 public key.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(PublicKey);

impl PeerId {
    pub fn from_public_key(public_key: PublicKey) -> Self {
        PeerId(public_key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_SIZE {
            return Err(Error::Input(format!(
                "expected a {} byte public key, got {}",
                COMPRESSED_PUBLIC_KEY_SIZE,
                bytes.len()
            )));
        }
        Ok(PeerId(PublicKey::from_slice(bytes)?))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        self.0.serialize()
    }

    pub fn to_base58(&self) -> String {
        self.to_bytes().to_base58()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.to_base58())
    }
}

/// A peer together with the addresses it can be reached at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PeerInfo {
    pub id: PeerId,
    pub addrs: Vec<SocketAddr>,
}

impl PeerInfo {
    pub fn new(id: PeerId, addrs: Vec<SocketAddr>) -> Self {
        PeerInfo { id, addrs }
    }
}

/// Who to dial: either a peer with known addresses or a bare identity that
/// still has to be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerAddress {
    Info(PeerInfo),
    Id(PeerId),
}

impl PeerAddress {
    pub fn id(&self) -> &PeerId {
        match self {
            PeerAddress::Info(info) => &info.id,
            PeerAddress::Id(id) => id,
        }
    }
}

impl From<PeerInfo> for PeerAddress {
    fn from(info: PeerInfo) -> Self {
        PeerAddress::Info(info)
    }
}

impl From<PeerId> for PeerAddress {
    fn from(id: PeerId) -> Self {
        PeerAddress::Id(id)
    }
}
