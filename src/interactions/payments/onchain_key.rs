use async_trait::async_trait;
use std::sync::Arc;

use crate::interactions::{collect_first, dial_with_fallback, Interaction, PROTOCOL_ONCHAIN_KEY};
use crate::networking::duplex::{source_from, Duplex};
use crate::networking::node::Node;
use crate::networking::peer::PeerAddress;
use crate::networking::ProtocolId;
use crate::{Error, Result};

/// Fetches the public key a peer uses on chain, which differs from the key
/// that identifies it on the network.
pub struct OnChainKey {
    node: Arc<Node>,
}

impl OnChainKey {
    pub fn new(node: Arc<Node>) -> Self {
        OnChainKey { node }
    }
}

#[async_trait]
impl Interaction for OnChainKey {
    type Request = ();
    type Response = Vec<u8>;

    fn protocols(&self) -> &[ProtocolId] {
        &[PROTOCOL_ONCHAIN_KEY]
    }

    async fn handler(&self, stream: Duplex) -> Result<()> {
        let on_chain_key = self.node.payment_channels().on_chain_public_key();
        (stream.sink)(source_from(vec![on_chain_key])).await
    }

    async fn interact(&self, counterparty: &PeerAddress, _request: ()) -> Result<Vec<u8>> {
        let stream = dial_with_fallback(&self.node, counterparty, PROTOCOL_ONCHAIN_KEY)
            .await
            .map_err(|err| Error::connection(*counterparty.id(), err))?;

        collect_first(stream.source, self.node.settings().read_timeout, |chunk| {
            if chunk.is_empty() {
                return Err(Error::EmptyResponse);
            }
            Ok(())
        })
        .await
    }
}
