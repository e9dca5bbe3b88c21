use async_trait::async_trait;
use futures::future::join;
use std::sync::Arc;
use tracing::{debug, info};

use crate::channels::{Channel, ChannelBalance, SignedChannel};
use crate::interactions::{collect_first, dial_with_fallback, Interaction, PROTOCOL_PAYMENT_CHANNEL};
use crate::networking::duplex::{source_from, Duplex};
use crate::networking::node::Node;
use crate::networking::peer::PeerAddress;
use crate::networking::ProtocolId;
use crate::{Error, Result};

/// Proposes a funded payment channel to a peer and returns the peer's
/// counter-signed terms.
pub struct Opening {
    node: Arc<Node>,
}

impl Opening {
    pub fn new(node: Arc<Node>) -> Self {
        Opening { node }
    }
}

#[async_trait]
impl Interaction for Opening {
    type Request = ChannelBalance;
    type Response = SignedChannel;

    fn protocols(&self) -> &[ProtocolId] {
        &[PROTOCOL_PAYMENT_CHANNEL]
    }

    async fn handler(&self, stream: Duplex) -> Result<()> {
        let (sink, source) = stream.into_parts();
        sink(self.node.payment_channels().handle_opening_request(source)).await
    }

    async fn interact(
        &self,
        counterparty: &PeerAddress,
        balance: ChannelBalance,
    ) -> Result<SignedChannel> {
        let stream = dial_with_fallback(&self.node, counterparty, PROTOCOL_PAYMENT_CHANNEL)
            .await
            .map_err(|err| Error::connection(*counterparty.id(), err))?;

        let proposal = self
            .node
            .payment_channels()
            .sign_channel(Channel::create_funded(balance))?;
        info!(
            "proposing channel with balance {} to {}",
            balance.balance,
            counterparty.id()
        );

        let (sink, source) = stream.into_parts();
        let (sent, answer) = join(
            sink(source_from(vec![proposal.serialize()])),
            collect_first(source, self.node.settings().read_timeout, |_| Ok(())),
        )
        .await;

        let answer = match (answer, sent) {
            (Ok(answer), Ok(())) => answer,
            (Ok(answer), Err(err)) => {
                debug!(
                    "answer from {} arrived, proposal send failed: {}",
                    counterparty.id(),
                    err
                );
                answer
            }
            // a failed send explains a missing answer better than the read does
            (Err(_), Err(err)) | (Err(err), Ok(())) => return Err(err),
        };

        self.node.payment_channels().signed_channel_from_bytes(&answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelStatus;
    use crate::keypair::Keypair;
    use crate::test_utilities::mocks::{
        make_mock_peer_info, make_scripted_node, DialPlan, ScriptedDialer, StaticRouting,
    };
    use crate::test_utilities::test_manager::TestManager;

    fn balance() -> ChannelBalance {
        ChannelBalance::new(1_000, 600).unwrap()
    }

    fn answer(balance: ChannelBalance) -> SignedChannel {
        SignedChannel::create(&Keypair::new(), Channel::create_funded(balance)).unwrap()
    }

    #[tokio::test]
    async fn sends_signed_proposal_and_keeps_first_answer() {
        let first = answer(balance());
        let second = answer(ChannelBalance::new(5, 5).unwrap());
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Respond(vec![
            first.serialize(),
            second.serialize(),
        ])]));
        let node = make_scripted_node(dialer.clone(), Arc::new(StaticRouting::default()));
        let opening = Opening::new(node.clone());

        let received = opening
            .interact(&PeerAddress::Info(make_mock_peer_info(9300)), balance())
            .await
            .unwrap();
        assert_eq!(received, first);

        let sent = dialer.sent();
        assert_eq!(sent.len(), 1);
        let proposal = SignedChannel::deserialize(&sent[0]).unwrap();
        assert_eq!(proposal.channel().status(), ChannelStatus::Funding);
        assert_eq!(proposal.channel().balance(), &balance());
        assert_eq!(
            proposal.signer().unwrap().serialize().to_vec(),
            node.payment_channels().on_chain_public_key()
        );
        assert!(!proposal.verify(node.keypair().public_key()));
    }

    #[tokio::test]
    async fn keeps_answer_when_peer_stops_reading() {
        let first = answer(balance());
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Hangup(vec![
            first.serialize()
        ])]));
        let opening = Opening::new(make_scripted_node(dialer, Arc::new(StaticRouting::default())));

        let received = opening
            .interact(&PeerAddress::Info(make_mock_peer_info(9305)), balance())
            .await
            .unwrap();
        assert_eq!(received, first);
    }

    #[tokio::test]
    async fn send_failure_without_answer_is_reported() {
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Hangup(vec![])]));
        let opening = Opening::new(make_scripted_node(dialer, Arc::new(StaticRouting::default())));

        assert!(matches!(
            opening
                .interact(&PeerAddress::Info(make_mock_peer_info(9306)), balance())
                .await,
            Err(Error::StreamClosed)
        ));
    }

    #[tokio::test]
    async fn silent_peer_is_no_response() {
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Respond(vec![])]));
        let opening = Opening::new(make_scripted_node(dialer, Arc::new(StaticRouting::default())));

        assert!(matches!(
            opening
                .interact(&PeerAddress::Info(make_mock_peer_info(9310)), balance())
                .await,
            Err(Error::NoResponse)
        ));
    }

    #[tokio::test]
    async fn malformed_answer_is_rejected() {
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Respond(vec![vec![1; 10]])]));
        let opening = Opening::new(make_scripted_node(dialer, Arc::new(StaticRouting::default())));

        assert!(matches!(
            opening
                .interact(&PeerAddress::Info(make_mock_peer_info(9320)), balance())
                .await,
            Err(Error::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_peer_is_connection_error() {
        let target = make_mock_peer_info(9330);
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Fail, DialPlan::Fail]));
        let opening = Opening::new(make_scripted_node(
            dialer.clone(),
            Arc::new(StaticRouting::new(vec![target.clone()])),
        ));

        assert!(matches!(
            opening.interact(&PeerAddress::Id(target.id), balance()).await,
            Err(Error::Connection { .. })
        ));
        // first attempt plus one redial to the resolved address
        assert_eq!(dialer.dialed().len(), 2);
    }

    #[tokio::test]
    async fn redials_resolved_address_after_failed_dial() {
        let target = make_mock_peer_info(9335);
        let first = answer(balance());
        let dialer = Arc::new(ScriptedDialer::new(vec![
            DialPlan::Fail,
            DialPlan::Respond(vec![first.serialize()]),
        ]));
        let opening = Opening::new(make_scripted_node(
            dialer.clone(),
            Arc::new(StaticRouting::new(vec![target.clone()])),
        ));

        let received = opening
            .interact(&PeerAddress::Id(target.id), balance())
            .await
            .unwrap();
        assert_eq!(received, first);

        let dialed = dialer.dialed();
        assert_eq!(dialed.len(), 2);
        assert_eq!(dialed[0], (PeerAddress::Id(target.id), PROTOCOL_PAYMENT_CHANNEL));
        assert_eq!(dialed[1], (PeerAddress::Info(target), PROTOCOL_PAYMENT_CHANNEL));
        assert_eq!(dialer.sent().len(), 1);
    }

    #[tokio::test]
    async fn unresolvable_peer_is_connection_error() {
        let target = make_mock_peer_info(9337);
        let dialer = Arc::new(ScriptedDialer::new(vec![DialPlan::Fail]));
        let opening = Opening::new(make_scripted_node(
            dialer.clone(),
            Arc::new(StaticRouting::default()),
        ));

        match opening.interact(&PeerAddress::Id(target.id), balance()).await {
            Err(Error::Connection { peer, cause }) => {
                assert_eq!(peer, target.id);
                assert!(matches!(*cause, Error::PeerNotFound(_)));
            }
            other => panic!("expected connection error, got {:?}", other),
        }
        assert_eq!(dialer.dialed().len(), 1);
        assert!(dialer.sent().is_empty());
    }

    #[tokio::test]
    async fn opens_channel_over_memory_network() {
        let manager = TestManager::new();
        let alice = manager.spawn_node(9340).await;
        let bob = manager.spawn_node(9341).await;

        let signed = alice
            .interactions
            .payments
            .open
            .interact(&PeerAddress::Id(bob.peer_info.id), balance())
            .await
            .unwrap();

        assert_eq!(signed.channel(), &Channel::create_funded(balance()));
        assert!(signed.verify(bob.connector.on_chain_keypair().public_key()));
        assert!(!signed.verify(alice.connector.on_chain_keypair().public_key()));
    }
}
