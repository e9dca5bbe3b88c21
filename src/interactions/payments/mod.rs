use std::sync::Arc;

use crate::interactions::register;
use crate::networking::dispatch::DispatchTableBuilder;
use crate::networking::node::Node;
use crate::Result;

pub mod onchain_key;
pub mod opening;

pub use onchain_key::OnChainKey;
pub use opening::Opening;

/// Interactions run before and while a payment channel is opened.
pub struct PaymentInteractions {
    pub onchain_key: Arc<OnChainKey>,
    pub open: Arc<Opening>,
}

impl PaymentInteractions {
    pub fn new(node: Arc<Node>, builder: &mut DispatchTableBuilder) -> Result<Self> {
        let onchain_key = Arc::new(OnChainKey::new(node.clone()));
        let open = Arc::new(Opening::new(node));
        register(builder, onchain_key.clone())?;
        register(builder, open.clone())?;
        Ok(PaymentInteractions { onchain_key, open })
    }
}
