use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::networking::duplex::Duplex;
use crate::networking::ProtocolId;
use crate::{Error, Result};

/// Serves one inbound stream for a protocol.
pub type StreamHandler = Arc<dyn Fn(Duplex) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Collects handlers while the node is being set up.
#[derive(Default)]
pub struct DispatchTableBuilder {
    handlers: HashMap<ProtocolId, StreamHandler>,
}

impl DispatchTableBuilder {
    pub fn new() -> Self {
        DispatchTableBuilder::default()
    }

    /// Route every protocol in `protocols` to `handler`.
    pub fn handle(&mut self, protocols: &[ProtocolId], handler: StreamHandler) -> Result<()> {
        if let Some(taken) = protocols
            .iter()
            .find(|protocol| self.handlers.contains_key(*protocol))
        {
            return Err(Error::DuplicateProtocol(taken.to_string()));
        }
        for protocol in protocols {
            self.handlers.insert(*protocol, handler.clone());
        }
        Ok(())
    }

    pub fn build(self) -> DispatchTable {
        DispatchTable {
            handlers: self.handlers,
        }
    }
}

/// Maps protocol identifiers to their inbound handlers. Immutable once built,
/// so it can be shared between connections without locking.
pub struct DispatchTable {
    handlers: HashMap<ProtocolId, StreamHandler>,
}

impl DispatchTable {
    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder::new()
    }

    pub fn supports(&self, protocol: &str) -> bool {
        self.handlers.contains_key(protocol)
    }

    pub fn protocols(&self) -> Vec<ProtocolId> {
        self.handlers.keys().cloned().collect()
    }

    /// Hand an inbound stream to the handler registered for `protocol`.
    pub async fn dispatch(&self, protocol: &str, stream: Duplex) -> Result<()> {
        let handler = self
            .handlers
            .get(protocol)
            .ok_or_else(|| Error::UnknownProtocol(protocol.to_string()))?
            .clone();

        debug!("dispatching inbound stream for {}", protocol);
        let result = handler(stream).await;
        if let Err(err) = &result {
            error!("handler for {} failed: {}", protocol, err);
        }
        result
    }
}
