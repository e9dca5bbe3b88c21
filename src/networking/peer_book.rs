use futures::stream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::networking::duplex::Source;
use crate::networking::message_types::crawl_response::CrawlResponse;
use crate::networking::node::CrawlResponder;
use crate::networking::peer::{PeerId, PeerInfo};
use crate::util::random_subset;

/// The peers this node knows about. Answers crawl requests with a random
/// sample of them.
#[derive(Clone, Debug)]
pub struct PeerBook {
    peers: Arc<RwLock<Vec<PeerInfo>>>,
    response_size: usize,
}

impl PeerBook {
    pub fn new(response_size: usize) -> Self {
        PeerBook {
            peers: Arc::new(RwLock::new(vec![])),
            response_size,
        }
    }

    /// Adds `peer_info`, replacing any earlier entry for the same id.
    pub async fn add_peer(&self, peer_info: PeerInfo) {
        let mut peers = self.peers.write().await;
        match peers.iter_mut().find(|known| known.id == peer_info.id) {
            Some(known) => *known = peer_info,
            None => peers.push(peer_info),
        }
    }

    pub async fn remove_peer(&self, peer_id: &PeerId) {
        self.peers.write().await.retain(|known| &known.id != peer_id);
    }

    pub async fn peers(&self) -> Vec<PeerInfo> {
        self.peers.read().await.clone()
    }
}

impl CrawlResponder for PeerBook {
    fn handle_crawl_request(&self) -> Source {
        let peers_lock = self.peers.clone();
        let response_size = self.response_size;

        stream::once(async move {
            let peers: Vec<PeerInfo> = peers_lock.read().await.clone();
            let response = if peers.is_empty() {
                Ok(CrawlResponse::failed())
            } else {
                random_subset(&peers, response_size.min(peers.len()), |_| true)
                    .map(CrawlResponse::ok)
            };
            response.and_then(|response| {
                debug!(
                    "answering crawl request with {} peers",
                    response.get_peer_infos().len()
                );
                response.serialize()
            })
        })
        .boxed()
    }
}
