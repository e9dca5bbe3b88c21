use std::sync::Arc;

use crate::channels::ChannelConnector;
use crate::interactions::Interactions;
use crate::keypair::Keypair;
use crate::networking::dispatch::DispatchTable;
use crate::networking::memory::MemoryNetwork;
use crate::networking::node::Node;
use crate::networking::peer::{PeerAddress, PeerInfo};
use crate::networking::peer_book::PeerBook;
use crate::test_utilities::mocks::test_settings;

/// A node running on a [`MemoryNetwork`] with all interactions registered.
pub struct TestNode {
    pub node: Arc<Node>,
    pub peer_info: PeerInfo,
    pub peer_book: PeerBook,
    pub connector: ChannelConnector,
    pub interactions: Interactions,
}

impl TestNode {
    pub fn address(&self) -> PeerAddress {
        PeerAddress::Info(self.peer_info.clone())
    }
}

pub struct TestManager {
    pub network: Arc<MemoryNetwork>,
}

impl TestManager {
    pub fn new() -> Self {
        TestManager {
            network: Arc::new(MemoryNetwork::new()),
        }
    }

    /// Start a node listening on `127.0.0.1:port` and announce it.
    pub async fn spawn_node(&self, port: u16) -> TestNode {
        let settings = test_settings();
        let keypair = Keypair::new();
        let peer_info = PeerInfo::new(
            keypair.peer_id(),
            vec![format!("127.0.0.1:{}", port).parse().unwrap()],
        );
        let peer_book = PeerBook::new(settings.crawl_response_size);
        let connector = ChannelConnector::new(Keypair::new());

        let node = Arc::new(Node::new(
            keypair,
            settings,
            self.network.clone(),
            self.network.clone(),
            Arc::new(peer_book.clone()),
            Arc::new(connector.clone()),
        ));
        let mut builder = DispatchTable::builder();
        let interactions = Interactions::new(node.clone(), &mut builder).unwrap();

        self.network
            .listen(&peer_info, Arc::new(builder.build()))
            .await;
        self.network.announce(peer_info.clone()).await;

        TestNode {
            node,
            peer_info,
            peer_book,
            connector,
            interactions,
        }
    }
}
