/*!
# mixnode demo

Starts three nodes on an in-memory network and runs every interaction between
two of them once.

## Example Usage

```bash
mixnode --config=config
```

## Dev

```bash
cargo run -- --help
cargo run -- --config=config
```
*/

use clap::{App, Arg};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use mixnode::challenge::Challenge;
use mixnode::channels::{ChannelBalance, ChannelConnector};
use mixnode::interactions::{Interaction, Interactions};
use mixnode::keypair::Keypair;
use mixnode::networking::dispatch::DispatchTable;
use mixnode::networking::memory::MemoryNetwork;
use mixnode::networking::node::Node;
use mixnode::networking::peer::{PeerAddress, PeerInfo};
use mixnode::networking::peer_book::PeerBook;
use mixnode::settings::InteractionSettings;

struct DemoNode {
    node: Arc<Node>,
    peer_info: PeerInfo,
    peer_book: PeerBook,
    interactions: Interactions,
}

async fn start_node(
    network: &Arc<MemoryNetwork>,
    settings: &InteractionSettings,
    addr: &str,
) -> mixnode::Result<DemoNode> {
    let keypair = Keypair::new();
    let addr: SocketAddr = addr
        .parse()
        .map_err(|err| mixnode::Error::Input(format!("bad listen address {}: {}", addr, err)))?;
    let peer_info = PeerInfo::new(keypair.peer_id(), vec![addr]);
    let peer_book = PeerBook::new(settings.crawl_response_size);

    let node = Arc::new(Node::new(
        keypair,
        settings.clone(),
        network.clone(),
        network.clone(),
        Arc::new(peer_book.clone()),
        Arc::new(ChannelConnector::new(Keypair::new())),
    ));
    let mut builder = DispatchTable::builder();
    let interactions = Interactions::new(node.clone(), &mut builder)?;

    network.listen(&peer_info, Arc::new(builder.build())).await;
    network.announce(peer_info.clone()).await;
    info!("node {} listening on {}", peer_info.id, addr);

    Ok(DemoNode {
        node,
        peer_info,
        peer_book,
        interactions,
    })
}

#[tokio::main]
pub async fn main() -> mixnode::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = App::new("mixnode")
        .about("Runs the mixnode interactions between in-memory nodes")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .default_value("config")
                .help("config file name"),
        )
        .get_matches();

    let config_name = matches.value_of("config").unwrap_or("config");
    let settings = match InteractionSettings::load(config_name) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("using default settings, could not read {}: {}", config_name, err);
            InteractionSettings::default()
        }
    };

    let network = Arc::new(MemoryNetwork::new());
    let alice = start_node(&network, &settings, "127.0.0.1:9001").await?;
    let bob = start_node(&network, &settings, "127.0.0.1:9002").await?;
    let carol = start_node(&network, &settings, "127.0.0.1:9003").await?;
    bob.peer_book.add_peer(carol.peer_info.clone()).await;
    bob.peer_book.add_peer(alice.peer_info.clone()).await;

    let bob_by_id = PeerAddress::Id(bob.peer_info.id);

    let peers = alice
        .interactions
        .network
        .crawler
        .interact(&bob_by_id, ())
        .await?;
    info!("bob knows {} peers: {:?}", peers.len(), peers);

    let on_chain_key = alice
        .interactions
        .payments
        .onchain_key
        .interact(&bob_by_id, ())
        .await?;
    info!("bob's on-chain key is {}", hex::encode(&on_chain_key));

    let signed_channel = alice
        .interactions
        .payments
        .open
        .interact(&bob_by_id, ChannelBalance::new(1_000, 1_000)?)
        .await?;
    info!(
        "channel opened, counter-signed by on-chain key: {}",
        signed_channel.signer()?.serialize().to_vec() == on_chain_key
    );

    let challenge = Challenge::create(&rand::random::<[u8; 32]>(), 0)?;
    let signed_challenge = challenge.sign(bob.node.keypair())?;
    info!(
        "challenge {:?} verifies against bob: {}",
        signed_challenge.challenge(),
        signed_challenge.verify(bob.node.keypair().public_key())
    );
    info!("{} done", alice.node.peer_id());

    Ok(())
}
