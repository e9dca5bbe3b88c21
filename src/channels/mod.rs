//! Payment channel terms exchanged while opening a channel, and a local
//! connector that answers opening proposals.

pub mod connector;
pub mod types;

pub use connector::ChannelConnector;
pub use types::{Channel, ChannelBalance, ChannelStatus, SignedChannel};
