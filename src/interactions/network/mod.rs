use std::sync::Arc;

use crate::interactions::register;
use crate::networking::dispatch::DispatchTableBuilder;
use crate::networking::node::Node;
use crate::Result;

pub mod crawler;

pub use crawler::Crawler;

/// Interactions that keep the node's view of the network current.
pub struct NetworkInteractions {
    pub crawler: Arc<Crawler>,
}

impl NetworkInteractions {
    pub fn new(node: Arc<Node>, builder: &mut DispatchTableBuilder) -> Result<Self> {
        let crawler = Arc::new(Crawler::new(node));
        register(builder, crawler.clone())?;
        Ok(NetworkInteractions { crawler })
    }
}
