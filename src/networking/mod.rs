/*!

# Networking Interfaces and Methods

## Introduction

Nodes talk to each other over multiplexed, encrypted point-to-point streams. Each stream is opened for exactly one protocol and carries a sequence of length-delimited binary chunks in both directions.

The transport itself (discovery, multiplexing, transport encryption) lives outside this crate and is reached through the `Dialer` and `PeerRouting` traits in `node`. `MemoryNetwork` implements both inside a single process.

## Streams

A stream is a `Duplex`: a `Source` that yields inbound chunks when pulled, and a `Sink` that consumes a `Source` of outbound chunks until it is exhausted.

## Protocols

```bytes
/mixnode/crawl/0.1.0
/mixnode/onchain-key/0.1.0
/mixnode/payment-channel/0.1.0
/mixnode/packet/0.1.0
```

### crawl

The responder sends one or more `CrawlResponse` chunks:

```bytes
0       status (0 = OK, 1 = FAIL)
1..     bincode encoded list of PeerInfo (OK only)
```

### onchain-key

The responder sends its marshaled on-chain public key as a single chunk.

### payment-channel

The initiator sends one serialized `SignedChannel` proposal, the responder answers with one serialized `SignedChannel`.

### packet

Reserved for the packet relay layer, which registers its own handler.

*/

pub mod dispatch;
pub mod duplex;
pub mod memory;
pub mod message_types;
pub mod node;
pub mod peer;
pub mod peer_book;

/// Names a protocol spoken over a stream.
pub type ProtocolId = &'static str;
