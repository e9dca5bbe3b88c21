//! Request/response protocols spoken between two nodes.
//!
//! Every protocol is an [`Interaction`]: a list of protocol identifiers, an
//! inbound `handler` the dispatch table calls when a peer opens a stream, and
//! an outbound `interact` that dials the peer and exchanges messages.
//! [`Interactions`] builds each of them once per node and registers their
//! handlers.

use async_trait::async_trait;
use futures::{Future, FutureExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::networking::dispatch::DispatchTableBuilder;
use crate::networking::duplex::{Chunk, Duplex, Source};
use crate::networking::node::Node;
use crate::networking::peer::PeerAddress;
use crate::networking::ProtocolId;
use crate::{Error, Result};

pub mod network;
pub mod payments;

pub use network::{Crawler, NetworkInteractions};
pub use payments::{OnChainKey, Opening, PaymentInteractions};

pub const PROTOCOL_CRAWLING: ProtocolId = "/mixnode/crawl/0.1.0";
pub const PROTOCOL_ONCHAIN_KEY: ProtocolId = "/mixnode/onchain-key/0.1.0";
pub const PROTOCOL_PAYMENT_CHANNEL: ProtocolId = "/mixnode/payment-channel/0.1.0";
/// Owned by the packet relay layer, which registers its own handler.
pub const PROTOCOL_PACKET: ProtocolId = "/mixnode/packet/0.1.0";

#[async_trait]
pub trait Interaction: Send + Sync + 'static {
    type Request: Send + 'static;
    type Response: Send + 'static;

    /// Protocols this interaction answers to. The first one is used to dial.
    fn protocols(&self) -> &[ProtocolId];

    /// Serve a stream a remote peer opened with one of `protocols`.
    async fn handler(&self, stream: Duplex) -> Result<()>;

    /// Open a stream to `counterparty` and run the protocol from our side.
    async fn interact(
        &self,
        counterparty: &PeerAddress,
        request: Self::Request,
    ) -> Result<Self::Response>;
}

/// Route the interaction's protocols to its handler.
pub fn register<I: Interaction>(
    builder: &mut DispatchTableBuilder,
    interaction: Arc<I>,
) -> Result<()> {
    let protocols = interaction.protocols().to_vec();
    builder.handle(
        &protocols,
        Arc::new(move |stream: Duplex| {
            let interaction = interaction.clone();
            async move { interaction.handler(stream).await }.boxed()
        }),
    )
}

/// All interactions of a node.
pub struct Interactions {
    pub network: NetworkInteractions,
    pub payments: PaymentInteractions,
}

impl Interactions {
    pub fn new(node: Arc<Node>, builder: &mut DispatchTableBuilder) -> Result<Self> {
        Ok(Interactions {
            network: NetworkInteractions::new(node.clone(), builder)?,
            payments: PaymentInteractions::new(node, builder)?,
        })
    }
}

async fn bounded<T, F>(limit: Duration, action: &'static str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(action)),
    }
}

/// Dial `counterparty`. If that fails, look up where the peer is now and dial
/// that address once.
pub(crate) async fn dial_with_fallback(
    node: &Node,
    counterparty: &PeerAddress,
    protocol: ProtocolId,
) -> Result<Duplex> {
    let settings = node.settings();
    let first_attempt = bounded(
        settings.dial_timeout,
        "dial",
        node.dialer().dial_protocol(counterparty, protocol),
    )
    .await;

    match first_attempt {
        Ok(stream) => Ok(stream),
        Err(err) => {
            debug!(
                "dialing {} for {} failed ({}), resolving its address",
                counterparty.id(),
                protocol,
                err
            );
            let peer_info = bounded(
                settings.resolve_timeout,
                "resolve peer",
                node.peer_routing().find_peer(counterparty.id()),
            )
            .await?;
            bounded(
                settings.dial_timeout,
                "dial",
                node.dialer()
                    .dial_protocol(&PeerAddress::Info(peer_info), protocol),
            )
            .await
        }
    }
}

/// Pull one chunk. `Ok(None)` once the source is exhausted.
pub(crate) async fn next_chunk(source: &mut Source, read_timeout: Duration) -> Result<Option<Chunk>> {
    match timeout(read_timeout, source.next()).await {
        Ok(Some(chunk)) => chunk.map(Some),
        Ok(None) => Ok(None),
        Err(_) => Err(Error::Timeout("read from stream")),
    }
}

/// Read the source to the end and keep the first chunk. Every chunk goes
/// through `check`; a failed check aborts the read.
pub(crate) async fn collect_first<F>(
    mut source: Source,
    read_timeout: Duration,
    check: F,
) -> Result<Chunk>
where
    F: Fn(&Chunk) -> Result<()>,
{
    let mut result: Option<Chunk> = None;
    loop {
        match next_chunk(&mut source, read_timeout).await {
            Ok(Some(chunk)) => {
                check(&chunk)?;
                if result.is_none() {
                    result = Some(chunk);
                }
            }
            Ok(None) => break,
            Err(err) => {
                if result.is_none() {
                    return Err(err);
                }
                // we already have what we came for
                debug!("stopped draining response stream: {}", err);
                break;
            }
        }
    }
    result.ok_or(Error::NoResponse)
}
