use async_trait::async_trait;
use std::sync::Arc;

use crate::channels::{Channel, SignedChannel};
use crate::keypair::Keypair;
use crate::networking::duplex::{Duplex, Source};
use crate::networking::peer::{PeerAddress, PeerId, PeerInfo};
use crate::networking::ProtocolId;
use crate::settings::InteractionSettings;
use crate::Result;

/// Opens protocol streams to other nodes.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial_protocol(&self, counterparty: &PeerAddress, protocol: ProtocolId)
        -> Result<Duplex>;
}

/// Resolves an identity to the addresses it is currently reachable at.
#[async_trait]
pub trait PeerRouting: Send + Sync {
    async fn find_peer(&self, peer_id: &PeerId) -> Result<PeerInfo>;
}

/// Knows the current peer set and answers crawl requests from it.
pub trait CrawlResponder: Send + Sync {
    fn handle_crawl_request(&self) -> Source;
}

/// The node's view of the payment channel connector.
pub trait PaymentChannels: Send + Sync {
    /// Marshaled public key of the on-chain identity.
    fn on_chain_public_key(&self) -> Vec<u8>;

    /// Signs channel terms with the on-chain key.
    fn sign_channel(&self, channel: Channel) -> Result<SignedChannel>;

    /// Turns a stream of opening proposals into a stream of answers.
    fn handle_opening_request(&self, proposals: Source) -> Source;

    fn signed_channel_from_bytes(&self, bytes: &[u8]) -> Result<SignedChannel> {
        SignedChannel::deserialize(bytes)
    }
}

/// Everything an interaction needs from the node it runs on.
pub struct Node {
    keypair: Keypair,
    settings: InteractionSettings,
    dialer: Arc<dyn Dialer>,
    peer_routing: Arc<dyn PeerRouting>,
    crawl_responder: Arc<dyn CrawlResponder>,
    payment_channels: Arc<dyn PaymentChannels>,
}

impl Node {
    pub fn new(
        keypair: Keypair,
        settings: InteractionSettings,
        dialer: Arc<dyn Dialer>,
        peer_routing: Arc<dyn PeerRouting>,
        crawl_responder: Arc<dyn CrawlResponder>,
        payment_channels: Arc<dyn PaymentChannels>,
    ) -> Node {
        Node {
            keypair,
            settings,
            dialer,
            peer_routing,
            crawl_responder,
            payment_channels,
        }
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn peer_id(&self) -> PeerId {
        self.keypair.peer_id()
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn dialer(&self) -> &dyn Dialer {
        self.dialer.as_ref()
    }

    pub fn peer_routing(&self) -> &dyn PeerRouting {
        self.peer_routing.as_ref()
    }

    pub fn crawl_responder(&self) -> &dyn CrawlResponder {
        self.crawl_responder.as_ref()
    }

    pub fn payment_channels(&self) -> &dyn PaymentChannels {
        self.payment_channels.as_ref()
    }
}
