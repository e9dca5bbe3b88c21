use futures::StreamExt;
use tracing::{info, warn};

use crate::channels::types::{Channel, SignedChannel};
use crate::keypair::Keypair;
use crate::networking::duplex::Source;
use crate::networking::node::PaymentChannels;
use crate::util::pub_key_to_address;
use crate::{Error, Result};

/// Payment channel connector backed by a local on-chain keypair.
///
/// Every opening proposal whose signature recovers to a valid key is answered
/// with the same channel terms, counter-signed with the on-chain key.
#[derive(Debug, Clone)]
pub struct ChannelConnector {
    on_chain_keypair: Keypair,
}

impl ChannelConnector {
    pub fn new(on_chain_keypair: Keypair) -> Self {
        ChannelConnector { on_chain_keypair }
    }

    pub fn on_chain_keypair(&self) -> &Keypair {
        &self.on_chain_keypair
    }

    fn answer_proposal(keypair: &Keypair, proposal: &[u8]) -> Result<Vec<u8>> {
        let proposal = SignedChannel::deserialize(proposal)?;
        let proposer = proposal
            .signer()
            .map_err(|err| Error::Validation(format!("unsigned channel proposal: {}", err)))?;

        info!(
            "counter-signing channel with {} for balance {}",
            hex::encode(pub_key_to_address(&proposer)),
            proposal.channel().balance().balance
        );
        Ok(SignedChannel::create(keypair, *proposal.channel())?.serialize())
    }
}

impl PaymentChannels for ChannelConnector {
    fn on_chain_public_key(&self) -> Vec<u8> {
        self.on_chain_keypair.public_key().serialize().to_vec()
    }

    fn sign_channel(&self, channel: Channel) -> Result<SignedChannel> {
        SignedChannel::create(&self.on_chain_keypair, channel)
    }

    fn handle_opening_request(&self, proposals: Source) -> Source {
        let keypair = self.on_chain_keypair.clone();
        proposals
            .map(move |proposal| -> Result<Vec<u8>> {
                let answer = ChannelConnector::answer_proposal(&keypair, &proposal?);
                if let Err(err) = &answer {
                    warn!("rejecting channel proposal: {}", err);
                }
                answer
            })
            .boxed()
    }
}
