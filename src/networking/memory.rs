use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{event, Level};

use crate::networking::dispatch::DispatchTable;
use crate::networking::duplex::{pair, Duplex};
use crate::networking::node::{Dialer, PeerRouting};
use crate::networking::peer::{PeerAddress, PeerId, PeerInfo};
use crate::networking::ProtocolId;
use crate::{Error, Result};

struct Listener {
    peer_id: PeerId,
    dispatch_table: Arc<DispatchTable>,
}

/// A network that lives inside one process. Nodes listen on socket addresses
/// without binding them, and every dial produces an in-memory duplex pair
/// whose far end is served by the listener's dispatch table.
#[derive(Default)]
pub struct MemoryNetwork {
    listeners: RwLock<HashMap<SocketAddr, Listener>>,
    directory: RwLock<HashMap<PeerId, PeerInfo>>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        MemoryNetwork::default()
    }

    /// Serve `dispatch_table` for `peer_info.id` on all of its addresses.
    pub async fn listen(&self, peer_info: &PeerInfo, dispatch_table: Arc<DispatchTable>) {
        let mut listeners = self.listeners.write().await;
        for addr in &peer_info.addrs {
            listeners.insert(
                *addr,
                Listener {
                    peer_id: peer_info.id,
                    dispatch_table: dispatch_table.clone(),
                },
            );
        }
    }

    pub async fn shutdown(&self, addr: &SocketAddr) {
        self.listeners.write().await.remove(addr);
    }

    /// Publish where a peer can be found, for later `find_peer` lookups.
    pub async fn announce(&self, peer_info: PeerInfo) {
        self.directory.write().await.insert(peer_info.id, peer_info);
    }
}

#[async_trait]
impl Dialer for MemoryNetwork {
    async fn dial_protocol(
        &self,
        counterparty: &PeerAddress,
        protocol: ProtocolId,
    ) -> Result<Duplex> {
        let peer_info = match counterparty {
            PeerAddress::Info(peer_info) => peer_info,
            PeerAddress::Id(peer_id) => {
                return Err(Error::Dial(format!("no known address for {}", peer_id)))
            }
        };

        let dispatch_table = {
            let listeners = self.listeners.read().await;
            peer_info
                .addrs
                .iter()
                .filter_map(|addr| listeners.get(addr))
                .find(|listener| listener.peer_id == peer_info.id)
                .map(|listener| listener.dispatch_table.clone())
                .ok_or_else(|| {
                    Error::Dial(format!("{} is not listening on {:?}", peer_info.id, peer_info.addrs))
                })?
        };

        if !dispatch_table.supports(protocol) {
            return Err(Error::Dial(format!(
                "{} does not speak {}",
                peer_info.id, protocol
            )));
        }

        let (local, remote) = pair();
        tokio::spawn(async move {
            if let Err(err) = dispatch_table.dispatch(protocol, remote).await {
                event!(Level::DEBUG, "inbound {} stream ended with {}", protocol, err);
            }
        });
        Ok(local)
    }
}

#[async_trait]
impl PeerRouting for MemoryNetwork {
    async fn find_peer(&self, peer_id: &PeerId) -> Result<PeerInfo> {
        self.directory
            .read()
            .await
            .get(peer_id)
            .cloned()
            .ok_or(Error::PeerNotFound(*peer_id))
    }
}
