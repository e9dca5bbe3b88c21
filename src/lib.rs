/*!
# Welcome to mixnode

mixnode is the **protocol interaction layer** of an incentivized mix-network node. Peers relay encrypted packets for each other and prove honest relaying to claim payment over payment channels.

This crate holds the request/response handlers that run over duplex byte streams between two peers, and the `Challenge` primitive that backs proof-of-relay payment claims.

# Layout

- `networking` carries the duplex stream contract, peer types, the node's collaborators and the protocol dispatch table.
- `interactions` implements the protocols themselves: crawling, on-chain key exchange and payment channel opening.
- `challenge` builds, signs and verifies proof-of-relay challenges.
- `channels` holds the payment channel terms exchanged while opening a channel.
- `util` has the buffer and hash helpers everything above leans on.

# Usage

```bash
cargo run -- --config config
```

runs a few nodes on an in-memory network and walks them through every interaction.
*/
pub mod challenge;
pub mod channels;
pub mod crypto;
pub mod error;
pub mod interactions;
pub mod keypair;
pub mod networking;
pub mod settings;
pub mod util;

#[cfg(test)]
pub mod test_utilities;

pub use error::{Error, Result};
