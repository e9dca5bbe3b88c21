use std::convert::TryInto;

use crate::crypto::{hash, recover, PublicKey, RecoverableSignatureBytes, SIGNATURE_SIZE};
use crate::keypair::Keypair;
use crate::{Error, Result};

pub const CHANNEL_SIZE: usize = 17;
pub const SIGNED_CHANNEL_SIZE: usize = SIGNATURE_SIZE + CHANNEL_SIZE;

/// How the funds of a channel are split. `balance_a` is the share of party A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBalance {
    pub balance: u64,
    pub balance_a: u64,
}

impl ChannelBalance {
    pub fn new(balance: u64, balance_a: u64) -> Result<Self> {
        if balance_a > balance {
            return Err(Error::Input(format!(
                "party A cannot hold {} of a {} balance",
                balance_a, balance
            )));
        }
        Ok(ChannelBalance { balance, balance_a })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Uncommitted = 0,
    Funding = 1,
    Open = 2,
    Pending = 3,
}

impl ChannelStatus {
    fn from_byte(byte: u8) -> Result<ChannelStatus> {
        match byte {
            0 => Ok(ChannelStatus::Uncommitted),
            1 => Ok(ChannelStatus::Funding),
            2 => Ok(ChannelStatus::Open),
            3 => Ok(ChannelStatus::Pending),
            other => Err(Error::Decode(format!("unknown channel status {}", other))),
        }
    }
}

/// The terms of a payment channel.
///
/// ```bytes
/// 0       status
/// 1-8     balance (big-endian u64)
/// 9-16    balance_a (big-endian u64)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    status: ChannelStatus,
    balance: ChannelBalance,
}

impl Channel {
    pub fn new(status: ChannelStatus, balance: ChannelBalance) -> Self {
        Channel { status, balance }
    }

    /// A channel that is about to be funded with `balance`.
    pub fn create_funded(balance: ChannelBalance) -> Self {
        Channel::new(ChannelStatus::Funding, balance)
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    pub fn balance(&self) -> &ChannelBalance {
        &self.balance
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut vbytes: Vec<u8> = vec![self.status as u8];
        vbytes.extend(&self.balance.balance.to_be_bytes());
        vbytes.extend(&self.balance.balance_a.to_be_bytes());
        vbytes
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Channel> {
        if bytes.len() != CHANNEL_SIZE {
            return Err(Error::Decode(format!(
                "channel must be {} bytes, got {}",
                CHANNEL_SIZE,
                bytes.len()
            )));
        }
        let status = ChannelStatus::from_byte(bytes[0])?;
        let balance = u64::from_be_bytes(bytes[1..9].try_into().map_err(decode_error)?);
        let balance_a = u64::from_be_bytes(bytes[9..17].try_into().map_err(decode_error)?);
        let balance = ChannelBalance::new(balance, balance_a)
            .map_err(|err| Error::Decode(err.to_string()))?;

        Ok(Channel::new(status, balance))
    }
}

fn decode_error(err: std::array::TryFromSliceError) -> Error {
    Error::Decode(err.to_string())
}

/// Channel terms signed by one of the channel's parties. The party is not
/// stored, it is recovered from the signature.
///
/// ```bytes
/// 0-64    recoverable signature over hash(channel)
/// 65-81   channel
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedChannel {
    signature: RecoverableSignatureBytes,
    channel: Channel,
}

impl SignedChannel {
    pub fn create(keypair: &Keypair, channel: Channel) -> Result<SignedChannel> {
        let signature = keypair.sign_message(&channel.serialize())?;
        Ok(SignedChannel { signature, channel })
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn signature(&self) -> &RecoverableSignatureBytes {
        &self.signature
    }

    /// The party that signed these terms.
    pub fn signer(&self) -> Result<PublicKey> {
        recover(&hash(&self.channel.serialize()), &self.signature)
    }

    pub fn verify(&self, public_key: &PublicKey) -> bool {
        matches!(self.signer(), Ok(signer) if &signer == public_key)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut vbytes: Vec<u8> = vec![];
        vbytes.extend(&self.signature);
        vbytes.extend(self.channel.serialize());
        vbytes
    }

    pub fn deserialize(bytes: &[u8]) -> Result<SignedChannel> {
        if bytes.len() != SIGNED_CHANNEL_SIZE {
            return Err(Error::Decode(format!(
                "signed channel must be {} bytes, got {}",
                SIGNED_CHANNEL_SIZE,
                bytes.len()
            )));
        }
        let signature: RecoverableSignatureBytes =
            bytes[..SIGNATURE_SIZE].try_into().map_err(decode_error)?;
        let channel = Channel::deserialize(&bytes[SIGNATURE_SIZE..])?;

        Ok(SignedChannel { signature, channel })
    }
}
