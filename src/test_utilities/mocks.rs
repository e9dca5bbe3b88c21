use async_trait::async_trait;
use futures::stream;
use futures::{FutureExt, StreamExt, TryStreamExt};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::channels::ChannelConnector;
use crate::keypair::Keypair;
use crate::networking::duplex::{pair, source_from, Chunk, Duplex, Sink, Source};
use crate::networking::node::{Dialer, Node, PeerRouting};
use crate::networking::peer::{PeerAddress, PeerId, PeerInfo};
use crate::networking::peer_book::PeerBook;
use crate::networking::ProtocolId;
use crate::settings::InteractionSettings;
use crate::{Error, Result};

/// What the next dial should do.
pub enum DialPlan {
    Fail,
    /// Connect; the remote sends `chunks` and closes.
    Respond(Vec<Chunk>),
    /// Connect; the remote sends `chunks` and then goes quiet.
    Stall(Vec<Chunk>),
    /// Connect; the remote sends `chunks` but never reads what we send.
    Hangup(Vec<Chunk>),
}

/// A dialer that plays back a fixed list of outcomes, one per dial, and
/// records what was dialed and what was sent.
#[derive(Default)]
pub struct ScriptedDialer {
    plans: Mutex<VecDeque<DialPlan>>,
    dialed: Mutex<Vec<(PeerAddress, ProtocolId)>>,
    sent: Arc<Mutex<Vec<Chunk>>>,
}

impl ScriptedDialer {
    pub fn new(plans: Vec<DialPlan>) -> Self {
        ScriptedDialer {
            plans: Mutex::new(plans.into_iter().collect()),
            ..ScriptedDialer::default()
        }
    }

    pub fn dialed(&self) -> Vec<(PeerAddress, ProtocolId)> {
        self.dialed.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Chunk> {
        self.sent.lock().unwrap().clone()
    }

    fn recording_sink(&self) -> Sink {
        let sent = self.sent.clone();
        Box::new(move |source: Source| {
            async move {
                let chunks: Vec<Chunk> = source.try_collect().await?;
                sent.lock().unwrap().extend(chunks);
                Ok(())
            }
            .boxed()
        })
    }
}

#[async_trait]
impl Dialer for ScriptedDialer {
    async fn dial_protocol(
        &self,
        counterparty: &PeerAddress,
        protocol: ProtocolId,
    ) -> Result<Duplex> {
        self.dialed
            .lock()
            .unwrap()
            .push((counterparty.clone(), protocol));
        let plan = self.plans.lock().unwrap().pop_front();

        let source: Source = match plan {
            Some(DialPlan::Respond(chunks)) => stream::iter(chunks.into_iter().map(Ok)).boxed(),
            Some(DialPlan::Stall(chunks)) => stream::iter(chunks.into_iter().map(Ok))
                .chain(stream::pending())
                .boxed(),
            Some(DialPlan::Hangup(chunks)) => {
                let (local, remote) = pair();
                let (remote_sink, remote_source) = remote.into_parts();
                drop(remote_source);
                remote_sink(source_from(chunks)).await?;
                return Ok(local);
            }
            Some(DialPlan::Fail) | None => {
                return Err(Error::Dial(format!("scripted failure for {}", counterparty.id())))
            }
        };
        Ok(Duplex::new(self.recording_sink(), source))
    }
}

/// Peer routing answered from a fixed table.
#[derive(Default)]
pub struct StaticRouting {
    peers: HashMap<PeerId, PeerInfo>,
}

impl StaticRouting {
    pub fn new(peers: Vec<PeerInfo>) -> Self {
        StaticRouting {
            peers: peers.into_iter().map(|info| (info.id, info)).collect(),
        }
    }
}

#[async_trait]
impl PeerRouting for StaticRouting {
    async fn find_peer(&self, peer_id: &PeerId) -> Result<PeerInfo> {
        self.peers
            .get(peer_id)
            .cloned()
            .ok_or(Error::PeerNotFound(*peer_id))
    }
}

/// Short timeouts so stalled streams fail fast.
pub fn test_settings() -> InteractionSettings {
    InteractionSettings {
        dial_timeout: Duration::from_millis(200),
        resolve_timeout: Duration::from_millis(200),
        read_timeout: Duration::from_millis(200),
        crawl_response_size: 4,
    }
}

pub fn make_mock_peer_info(port: u16) -> PeerInfo {
    PeerInfo::new(
        Keypair::new().peer_id(),
        vec![format!("127.0.0.1:{}", port).parse().unwrap()],
    )
}

/// A node whose outbound traffic is scripted.
pub fn make_scripted_node(dialer: Arc<ScriptedDialer>, routing: Arc<StaticRouting>) -> Arc<Node> {
    let settings = test_settings();
    Arc::new(Node::new(
        Keypair::new(),
        settings.clone(),
        dialer,
        routing,
        Arc::new(PeerBook::new(settings.crawl_response_size)),
        Arc::new(ChannelConnector::new(Keypair::new())),
    ))
}
