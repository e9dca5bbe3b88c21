use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::interactions::{dial_with_fallback, next_chunk, Interaction, PROTOCOL_CRAWLING};
use crate::networking::duplex::{Duplex, Source};
use crate::networking::message_types::crawl_response::{CrawlResponse, CrawlStatus};
use crate::networking::node::Node;
use crate::networking::peer::{PeerAddress, PeerInfo};
use crate::networking::ProtocolId;
use crate::Result;

/// Asks a peer which other peers it knows.
///
/// Crawling is best effort: an unreachable peer yields an empty list and a
/// broken answer yields whatever arrived before it broke.
pub struct Crawler {
    node: Arc<Node>,
}

impl Crawler {
    pub fn new(node: Arc<Node>) -> Self {
        Crawler { node }
    }
}

#[async_trait]
impl Interaction for Crawler {
    type Request = ();
    type Response = Vec<PeerInfo>;

    fn protocols(&self) -> &[ProtocolId] {
        &[PROTOCOL_CRAWLING]
    }

    async fn handler(&self, stream: Duplex) -> Result<()> {
        (stream.sink)(self.node.crawl_responder().handle_crawl_request()).await
    }

    async fn interact(&self, counterparty: &PeerAddress, _request: ()) -> Result<Vec<PeerInfo>> {
        let stream =
            match dial_with_fallback(&self.node, counterparty, PROTOCOL_CRAWLING).await {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(
                        "Could not ask node {} for other nodes. Error was: {}",
                        counterparty.id(),
                        err
                    );
                    return Ok(vec![]);
                }
            };

        Ok(collect_peer_infos(stream.source, self.node.settings().read_timeout).await)
    }
}

async fn collect_peer_infos(mut source: Source, read_timeout: Duration) -> Vec<PeerInfo> {
    let mut peer_infos = vec![];
    loop {
        let encoded = match next_chunk(&mut source, read_timeout).await {
            Ok(Some(encoded)) => encoded,
            Ok(None) => break,
            Err(err) => {
                warn!(
                    "crawl answer broke off after {} peers: {}",
                    peer_infos.len(),
                    err
                );
                break;
            }
        };

        let response = match CrawlResponse::deserialize(&encoded) {
            Ok(response) => response,
            Err(err) => {
                debug!("skipping undecodable crawl answer: {}", err);
                continue;
            }
        };
        if response.get_status() != CrawlStatus::Ok {
            continue;
        }
        peer_infos.extend(response.into_peer_infos());
    }
    peer_infos
}
