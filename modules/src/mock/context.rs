//! Implementation of a global context mock. Used in testing handlers of all IBC modules.

use core::ops::Bound::{Excluded, Unbounded};
use core::time::Duration;
use std::collections::{BTreeMap, VecDeque};
use std::time::UNIX_EPOCH;

use secp256k1::SecretKey;
use tracing::debug;

use crate::clients::ics07_tendermint::client_state::{AllowUpdate, ClientState as TmClientState};
use crate::clients::ics09_localhost::client_state::ClientState as LocalhostClientState;
use crate::clients::ics09_localhost::consensus_state::ConsensusState as LocalhostConsensusState;
use crate::config::EngineConfig;
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::consensus_state::AnyConsensusState;
use crate::core::ics02_client::context::{ClientKeeper, ClientReader};
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics02_client::header::AnyHeader;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::context::{ConnectionKeeper, ConnectionReader};
use crate::core::ics03_connection::error::Error as Ics03Error;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::error::Error as Ics04Error;
use crate::core::ics04_channel::packet::{Receipt, Sequence};
use crate::core::ics05_port::capabilities::{Capability, CapabilityName};
use crate::core::ics05_port::context::{CapabilityKeeper, CapabilityReader, PortKeeper, PortReader};
use crate::core::ics05_port::error::Error as Ics05Error;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics24_host::identifier::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics24_host::path::Path;
use crate::core::ics24_host::store::ProvableStore;
use crate::core::ics26_routing::context::{Ics26Context, ModuleId};
use crate::core::ics26_routing::error::Error as Ics26Error;
use crate::core::ics26_routing::handler::{deliver, MsgReceipt};
use crate::core::ics26_routing::msgs::Ics26Envelope;
use crate::events::IbcEvent;
use crate::mock::host::{validator_keys, HostBlock};
use crate::mock::module::{MockModule, MockRouter};
use crate::mock::store::InMemoryStore;
use crate::relayer::ics18_relayer::context::Ics18Context;
use crate::relayer::ics18_relayer::error::Error as Ics18Error;
use crate::test_utils::{get_dummy_solomachine_states, get_dummy_tendermint_states};
use crate::timestamp::Timestamp;
use crate::Height;

/// Wall-clock time of the (virtual) block at height zero of every mock host.
const GENESIS_UNIX_SECS: u64 = 1_650_000_000;

const DEFAULT_VALIDATOR_COUNT: usize = 4;

/// Everything a host knows about one of its clients.
#[derive(Clone, Debug)]
pub struct MockClientRecord {
    pub client_type: ClientType,
    pub client_state: Option<AnyClientState>,
    pub consensus_states: BTreeMap<Height, AnyConsensusState>,
    pub update_times: BTreeMap<Height, Timestamp>,
    pub update_heights: BTreeMap<Height, Height>,
}

impl MockClientRecord {
    fn new(client_type: ClientType) -> Self {
        Self {
            client_type,
            client_state: None,
            consensus_states: BTreeMap::new(),
            update_times: BTreeMap::new(),
            update_heights: BTreeMap::new(),
        }
    }
}

/// Typed IBC state of a mock host. Every write is mirrored, in its committed
/// encoding, into the provable store of the owning [`MockContext`].
#[derive(Clone, Debug, Default)]
pub struct MockIbcStore {
    pub clients: BTreeMap<ClientId, MockClientRecord>,
    pub client_ids_counter: u64,
    pub client_connections: BTreeMap<ClientId, ConnectionId>,
    pub connections: BTreeMap<ConnectionId, ConnectionEnd>,
    pub connection_ids_counter: u64,
    pub channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
    pub connection_channels: BTreeMap<ConnectionId, Vec<(PortId, ChannelId)>>,
    pub channel_ids_counter: u64,
    pub next_sequence_send: BTreeMap<(PortId, ChannelId), Sequence>,
    pub next_sequence_recv: BTreeMap<(PortId, ChannelId), Sequence>,
    pub next_sequence_ack: BTreeMap<(PortId, ChannelId), Sequence>,
    pub packet_commitment: BTreeMap<(PortId, ChannelId, Sequence), PacketCommitment>,
    pub packet_receipt: BTreeMap<(PortId, ChannelId, Sequence), Receipt>,
    pub packet_acknowledgement: BTreeMap<(PortId, ChannelId, Sequence), AcknowledgementCommitment>,
    pub capabilities: BTreeMap<CapabilityName, Capability>,
    pub next_capability_index: u64,
    pub port_to_module: BTreeMap<PortId, ModuleId>,
}

/// A context implementing the dependencies necessary for testing any IBC module.
#[derive(Clone, Debug)]
pub struct MockContext {
    /// Host chain identifier.
    host_chain_id: ChainId,

    config: EngineConfig,

    /// Keys signing every block of this host.
    validators: Vec<SecretKey>,

    /// Highest height (i.e., most recent) of the blocks in the history.
    latest_height: Height,

    /// The chain of blocks underlying this context, ascending by height and at
    /// most `config.max_history_size` long.
    history: VecDeque<HostBlock>,

    ibc_store: MockIbcStore,

    /// The store whose roots end up as the app hash of the host blocks.
    store: InMemoryStore,

    router: MockRouter,
}

/// Returns a MockContext with bare minimum initialization: no clients, no connections and no
/// channels are present, and the chain has Height(1, 5). The default module is routed.
impl Default for MockContext {
    fn default() -> Self {
        Self::new(ChainId::new("mockgaia".to_string(), 1), Height::new(1, 5))
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to any Ics handler.
impl MockContext {
    /// Creates a mock context. Parameter `latest_height` determines the current height of the
    /// chain and must be in the revision of `host_id`.
    pub fn new(host_id: ChainId, latest_height: Height) -> Self {
        Self::with_config(host_id, latest_height, EngineConfig::default())
    }

    pub fn with_config(host_id: ChainId, latest_height: Height, config: EngineConfig) -> Self {
        assert_eq!(
            host_id.version(),
            latest_height.revision_number,
            "The version in the chain identifier must match the version in the latest height"
        );

        let prefix = config.commitment_prefix().unwrap_or_default();
        let mut router = MockRouter::default();
        router.add_route(Self::default_module_id(), MockModule::default());

        let mut ctx = MockContext {
            validators: validator_keys(&host_id, DEFAULT_VALIDATOR_COUNT),
            host_chain_id: host_id,
            latest_height: Height::new(latest_height.revision_number, 0),
            history: VecDeque::new(),
            ibc_store: MockIbcStore::default(),
            store: InMemoryStore::new(prefix, config.max_history_size),
            router,
            config,
        };

        // Only the most recent blocks are kept.
        let retained = (ctx.config.max_history_size as u64).min(latest_height.revision_height);
        let first = latest_height.revision_height - retained + 1;
        for height in first..=latest_height.revision_height {
            ctx.produce_block(height);
        }
        ctx.latest_height = latest_height;
        ctx
    }

    /// The module every port bound through [`MockContext::with_port`] routes to.
    pub fn default_module_id() -> ModuleId {
        ModuleId::new("mockmodule")
    }

    pub fn with_module(mut self, module_id: ModuleId, module: MockModule) -> Self {
        self.router.add_route(module_id, module);
        self
    }

    /// Binds `port_id` to the default module.
    pub fn with_port(self, port_id: PortId) -> Self {
        self.with_port_for_module(port_id, Self::default_module_id())
    }

    pub fn with_port_for_module(mut self, port_id: PortId, module_id: ModuleId) -> Self {
        self.bind_port(port_id, module_id)
            .expect("port must not be bound yet");
        self
    }

    /// Associates a solo machine client, at sequence `sequence` and signing with `secret_key`.
    pub fn with_solomachine_client(
        self,
        client_id: &ClientId,
        secret_key: &SecretKey,
        sequence: u64,
    ) -> Self {
        let (client_state, consensus_state) = get_dummy_solomachine_states(secret_key, sequence);
        self.with_client_states(client_id, client_state.into(), consensus_state.into())
    }

    /// Associates a tendermint client for a fictional counterparty, with a
    /// single consensus state at `client_state_height`.
    pub fn with_tendermint_client(self, client_id: &ClientId, client_state_height: Height) -> Self {
        let (client_state, consensus_state) =
            get_dummy_tendermint_states(&self, client_state_height);
        self.with_client_states(client_id, client_state.into(), consensus_state.into())
    }

    /// Associates a loopback client tracking this very host.
    pub fn with_localhost_client(self, client_id: &ClientId) -> Self {
        let client_state =
            LocalhostClientState::new(self.host_chain_id.clone(), self.host_height());
        let consensus_state = LocalhostConsensusState::new(self.host_timestamp());
        self.with_client_states(client_id, client_state.into(), consensus_state.into())
    }

    /// Associates a tendermint client tracking the latest block of `counterparty`,
    /// with the trust parameters of this host's configuration.
    pub fn with_client_for(self, client_id: &ClientId, counterparty: &MockContext) -> Self {
        let block = counterparty
            .latest_block()
            .cloned()
            .expect("counterparty has produced no block");

        let client_state = TmClientState {
            chain_id: counterparty.host_chain_id.clone(),
            trust_level: self.config.default_trust_threshold,
            trusting_period: self.config.trusting_period,
            unbonding_period: self.config.unbonding_period,
            max_clock_drift: self.config.max_clock_drift,
            latest_height: block.height(),
            allow_update: AllowUpdate::default(),
            frozen_height: None,
        };

        self.with_client_states(client_id, client_state.into(), block.into())
    }

    fn with_client_states(
        mut self,
        client_id: &ClientId,
        client_state: AnyClientState,
        consensus_state: AnyConsensusState,
    ) -> Self {
        let height = client_state.latest_height();
        let (host_time, host_height) = (self.host_timestamp(), self.host_height());

        self.store_client_type(client_id.clone(), client_state.client_type())
            .and_then(|_| self.store_client_state(client_id.clone(), client_state))
            .and_then(|_| self.store_consensus_state(client_id.clone(), height, consensus_state))
            .and_then(|_| self.store_update_time(client_id.clone(), height, host_time))
            .and_then(|_| self.store_update_height(client_id.clone(), height, host_height))
            .expect("storing a client never fails");
        self.ibc_store.client_ids_counter += 1;
        self
    }

    pub fn with_connection(
        mut self,
        connection_id: ConnectionId,
        connection_end: ConnectionEnd,
    ) -> Self {
        let client_id = connection_end.client_id().clone();
        self.store_connection(connection_id.clone(), &connection_end)
            .and_then(|_| self.store_connection_to_client(connection_id, &client_id))
            .expect("storing a connection never fails");
        self
    }

    /// Stores the channel together with everything a freshly opened channel
    /// comes with: its capability, its connection index and sequences at 1.
    pub fn with_channel(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        self.new_capability(CapabilityName::channel(&port_id, &chan_id))
            .expect("channel capability must be free");

        let stored = self
            .store_channel(port_id.clone(), chan_id.clone(), &channel_end)
            .and_then(|_| self.store_next_sequence_send(port_id.clone(), chan_id.clone(), 1.into()))
            .and_then(|_| self.store_next_sequence_recv(port_id.clone(), chan_id.clone(), 1.into()))
            .and_then(|_| self.store_next_sequence_ack(port_id.clone(), chan_id.clone(), 1.into()));
        stored.expect("storing a channel never fails");

        if let Ok(connection_id) = channel_end.single_connection_hop() {
            let connection_id = connection_id.clone();
            self.store_connection_channels(connection_id, port_id, chan_id)
                .expect("storing a channel never fails");
        }
        self
    }

    pub fn with_send_sequence(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
    ) -> Self {
        self.store_next_sequence_send(port_id, chan_id, seq)
            .expect("storing a sequence never fails");
        self
    }

    pub fn with_recv_sequence(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
    ) -> Self {
        self.store_next_sequence_recv(port_id, chan_id, seq)
            .expect("storing a sequence never fails");
        self
    }

    pub fn with_ack_sequence(mut self, port_id: PortId, chan_id: ChannelId, seq: Sequence) -> Self {
        self.store_next_sequence_ack(port_id, chan_id, seq)
            .expect("storing a sequence never fails");
        self
    }

    pub fn with_packet_commitment(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
        data: PacketCommitment,
    ) -> Self {
        self.store_packet_commitment(port_id, chan_id, seq, data)
            .expect("storing a commitment never fails");
        self
    }

    pub fn with_packet_receipt(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
    ) -> Self {
        self.store_packet_receipt(port_id, chan_id, seq, Receipt::Ok)
            .expect("storing a receipt never fails");
        self
    }

    pub fn with_ack_commitment(
        mut self,
        port_id: PortId,
        chan_id: ChannelId,
        seq: Sequence,
        ack: AcknowledgementCommitment,
    ) -> Self {
        self.store_packet_acknowledgement(port_id, chan_id, seq, ack)
            .expect("storing an acknowledgement never fails");
        self
    }

    pub fn host_chain_id(&self) -> &ChainId {
        &self.host_chain_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ibc_store(&self) -> &MockIbcStore {
        &self.ibc_store
    }

    pub fn module(&self, module_id: &ModuleId) -> Option<&MockModule> {
        self.router.module(module_id)
    }

    /// Accessor for a block of the local (host) chain from this context.
    /// Returns `None` if the block at the requested height does not exist.
    pub fn host_block(&self, target_height: Height) -> Option<&HostBlock> {
        if target_height.revision_number != self.latest_height.revision_number {
            return None;
        }
        self.history
            .iter()
            .find(|block| block.height() == target_height)
    }

    pub fn latest_block(&self) -> Option<&HostBlock> {
        self.history.back()
    }

    /// Time of the host block at `height`: genesis plus `height` block intervals.
    fn block_time_at(&self, height: u64) -> Timestamp {
        let block_nanos = u64::try_from(self.config.block_time.as_nanos()).unwrap_or(u64::MAX);
        let offset = Duration::from_nanos(block_nanos.saturating_mul(height));
        let time = UNIX_EPOCH + Duration::from_secs(GENESIS_UNIX_SECS) + offset;
        Timestamp::from_datetime(time.into())
    }

    /// Commits the store as version `height` and seals the block on top of it.
    fn produce_block(&mut self, height: u64) {
        let app_hash = self.store.commit(height);
        let block = HostBlock::generate(
            &self.host_chain_id,
            height,
            self.block_time_at(height),
            app_hash,
            &self.validators,
        );

        self.history.push_back(block);
        while self.history.len() > self.config.max_history_size {
            self.history.pop_front();
        }
        self.latest_height = Height::new(self.latest_height.revision_number, height);
    }

    /// Triggers the advancing of the host chain, by extending the history of blocks (or headers).
    pub fn advance_host_chain_height(&mut self) {
        let next = self.latest_height.increment();
        self.produce_block(next.revision_height);
        debug!("mock host {} advanced to {}", self.host_chain_id, next);
    }

    /// Value committed at `path` as of block `height`.
    pub fn query_value(&self, path: &Path, height: Height) -> Option<Vec<u8>> {
        self.store.get_at(height.revision_height, path)
    }

    /// Merkle proof of `path` (present or absent) against the app hash of
    /// the block at `height`.
    pub fn query_proof(&self, path: &Path, height: Height) -> Option<CommitmentProofBytes> {
        if height.revision_number != self.latest_height.revision_number {
            return None;
        }
        self.store
            .proof(height.revision_height, path)
            .map(CommitmentProofBytes::from)
    }

    /// A wrapper over `deliver` which also advances the chain by one block
    /// once the message is applied, so its effects become provable.
    pub fn deliver(&mut self, msg: Ics26Envelope) -> Result<MsgReceipt, Ics26Error> {
        let receipt = deliver(self, msg)?;
        self.advance_host_chain_height();
        Ok(receipt)
    }

    /// Validates this context. Accumulates all the errors and returns them in a `Vec<String>`.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = vec![];

        if self.history.len() > self.config.max_history_size {
            errors.push(format!(
                "too many blocks in the history: {} > {}",
                self.history.len(),
                self.config.max_history_size
            ));
        }

        for pair in self.history.iter().collect::<Vec<_>>().windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            if cur.height() != prev.height().increment() {
                errors.push(format!("gap in the history after {}", prev.height()));
            }
            if !cur.timestamp().after(&prev.timestamp()) {
                errors.push(format!("block {} is not later than its parent", cur.height()));
            }
        }

        match self.latest_block() {
            Some(block) if block.height() != self.latest_height => errors.push(format!(
                "latest block {} does not match the latest height {}",
                block.height(),
                self.latest_height
            )),
            Some(block)
                if self.store.root(block.height().revision_height).as_ref()
                    != Some(block.app_hash()) =>
            {
                errors.push(format!("app hash of block {} is not the store root", block.height()))
            }
            _ => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn client_record(&self, client_id: &ClientId) -> Result<&MockClientRecord, Ics02Error> {
        self.ibc_store
            .clients
            .get(client_id)
            .ok_or_else(|| Ics02Error::client_not_found(client_id.clone()))
    }

    fn client_record_mut(
        &mut self,
        client_id: &ClientId,
    ) -> Result<&mut MockClientRecord, Ics02Error> {
        self.ibc_store
            .clients
            .get_mut(client_id)
            .ok_or_else(|| Ics02Error::client_not_found(client_id.clone()))
    }
}

impl Ics26Context for MockContext {
    type Router = MockRouter;

    fn router(&self) -> &Self::Router {
        &self.router
    }

    fn router_mut(&mut self) -> &mut Self::Router {
        &mut self.router
    }
}

impl CapabilityReader for MockContext {
    fn get_capability(&self, name: &CapabilityName) -> Result<Capability, Ics05Error> {
        self.ibc_store
            .capabilities
            .get(name)
            .cloned()
            .ok_or_else(|| Ics05Error::capability_not_found(name.clone()))
    }
}

impl CapabilityKeeper for MockContext {
    fn new_capability(&mut self, name: CapabilityName) -> Result<Capability, Ics05Error> {
        if self.ibc_store.capabilities.contains_key(&name) {
            return Err(Ics05Error::capability_already_taken(name));
        }

        let capability = Capability::new(self.ibc_store.next_capability_index);
        self.ibc_store.next_capability_index += 1;
        self.ibc_store.capabilities.insert(name, capability.clone());
        Ok(capability)
    }

    fn release_capability(&mut self, name: &CapabilityName) {
        self.ibc_store.capabilities.remove(name);
    }
}

impl PortReader for MockContext {
    fn lookup_module_by_port(
        &self,
        port_id: &PortId,
    ) -> Result<(ModuleId, Capability), Ics05Error> {
        let module_id = self
            .ibc_store
            .port_to_module
            .get(port_id)
            .cloned()
            .ok_or_else(|| Ics05Error::unknown_port(port_id.clone()))?;
        let capability = self.get_capability(&CapabilityName::port(port_id))?;
        Ok((module_id, capability))
    }
}

impl PortKeeper for MockContext {
    fn store_module_by_port(
        &mut self,
        port_id: PortId,
        module_id: ModuleId,
    ) -> Result<(), Ics05Error> {
        self.store
            .set(Path::Ports(port_id.clone()), module_id.as_str().as_bytes().to_vec());
        self.ibc_store.port_to_module.insert(port_id, module_id);
        Ok(())
    }
}

impl ChannelReader for MockContext {
    fn channel_end(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ChannelEnd, Ics04Error> {
        self.ibc_store
            .channels
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
            .ok_or_else(|| Ics04Error::channel_not_found(port_id.clone(), channel_id.clone()))
    }

    fn connection_channels(
        &self,
        cid: &ConnectionId,
    ) -> Result<Vec<(PortId, ChannelId)>, Ics04Error> {
        Ok(self
            .ibc_store
            .connection_channels
            .get(cid)
            .cloned()
            .unwrap_or_default())
    }

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Ics04Error> {
        self.ibc_store
            .next_sequence_send
            .get(&(port_id.clone(), channel_id.clone()))
            .copied()
            .ok_or_else(|| Ics04Error::missing_next_send_seq(port_id.clone(), channel_id.clone()))
    }

    fn get_next_sequence_recv(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Ics04Error> {
        self.ibc_store
            .next_sequence_recv
            .get(&(port_id.clone(), channel_id.clone()))
            .copied()
            .ok_or_else(|| Ics04Error::missing_next_recv_seq(port_id.clone(), channel_id.clone()))
    }

    fn get_next_sequence_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Ics04Error> {
        self.ibc_store
            .next_sequence_ack
            .get(&(port_id.clone(), channel_id.clone()))
            .copied()
            .ok_or_else(|| Ics04Error::missing_next_ack_seq(port_id.clone(), channel_id.clone()))
    }

    fn get_packet_commitment(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<PacketCommitment> {
        self.ibc_store
            .packet_commitment
            .get(&(port_id.clone(), channel_id.clone(), sequence))
            .cloned()
    }

    fn get_packet_receipt(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Receipt> {
        self.ibc_store
            .packet_receipt
            .get(&(port_id.clone(), channel_id.clone(), sequence))
            .cloned()
    }

    fn get_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<AcknowledgementCommitment> {
        self.ibc_store
            .packet_acknowledgement
            .get(&(port_id.clone(), channel_id.clone(), sequence))
            .cloned()
    }

    fn channel_counter(&self) -> Result<u64, Ics04Error> {
        Ok(self.ibc_store.channel_ids_counter)
    }
}

impl ChannelKeeper for MockContext {
    fn store_packet_commitment(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::Commitments {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                sequence,
            },
            commitment.clone().into_vec(),
        );
        self.ibc_store
            .packet_commitment
            .insert((port_id, channel_id, sequence), commitment);
        Ok(())
    }

    fn delete_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Ics04Error> {
        self.store.delete(&Path::Commitments {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        });
        self.ibc_store
            .packet_commitment
            .remove(&(port_id.clone(), channel_id.clone(), sequence));
        Ok(())
    }

    fn store_packet_receipt(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        receipt: Receipt,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::Receipts {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                sequence,
            },
            receipt.as_bytes().to_vec(),
        );
        self.ibc_store
            .packet_receipt
            .insert((port_id, channel_id, sequence), receipt);
        Ok(())
    }

    fn store_packet_acknowledgement(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::Acks {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                sequence,
            },
            ack_commitment.clone().into_vec(),
        );
        self.ibc_store
            .packet_acknowledgement
            .insert((port_id, channel_id, sequence), ack_commitment);
        Ok(())
    }

    fn store_connection_channels(
        &mut self,
        conn_id: ConnectionId,
        port_id: PortId,
        channel_id: ChannelId,
    ) -> Result<(), Ics04Error> {
        let channels = self.ibc_store.connection_channels.entry(conn_id).or_default();
        if !channels.contains(&(port_id.clone(), channel_id.clone())) {
            channels.push((port_id, channel_id));
        }
        Ok(())
    }

    fn store_channel(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        channel_end: &ChannelEnd,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::ChannelEnds(port_id.clone(), channel_id.clone()),
            channel_end.encode_vec(),
        );
        self.ibc_store
            .channels
            .insert((port_id, channel_id), channel_end.clone());
        Ok(())
    }

    fn store_next_sequence_send(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::SeqSends(port_id.clone(), channel_id.clone()),
            seq.to_be_bytes().to_vec(),
        );
        self.ibc_store.next_sequence_send.insert((port_id, channel_id), seq);
        Ok(())
    }

    fn store_next_sequence_recv(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::SeqRecvs(port_id.clone(), channel_id.clone()),
            seq.to_be_bytes().to_vec(),
        );
        self.ibc_store.next_sequence_recv.insert((port_id, channel_id), seq);
        Ok(())
    }

    fn store_next_sequence_ack(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
    ) -> Result<(), Ics04Error> {
        self.store.set(
            Path::SeqAcks(port_id.clone(), channel_id.clone()),
            seq.to_be_bytes().to_vec(),
        );
        self.ibc_store.next_sequence_ack.insert((port_id, channel_id), seq);
        Ok(())
    }

    fn increase_channel_counter(&mut self) {
        self.ibc_store.channel_ids_counter += 1;
    }
}

impl ConnectionReader for MockContext {
    fn connection_end(&self, cid: &ConnectionId) -> Result<ConnectionEnd, Ics03Error> {
        self.ibc_store
            .connections
            .get(cid)
            .cloned()
            .ok_or_else(|| Ics03Error::connection_not_found(cid.clone()))
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        self.store.prefix().clone()
    }

    fn max_expected_time_per_block(&self) -> Duration {
        self.config.max_expected_time_per_block
    }

    fn connection_counter(&self) -> Result<u64, Ics03Error> {
        Ok(self.ibc_store.connection_ids_counter)
    }
}

impl ConnectionKeeper for MockContext {
    fn store_connection(
        &mut self,
        connection_id: ConnectionId,
        connection_end: &ConnectionEnd,
    ) -> Result<(), Ics03Error> {
        self.store.set(
            Path::Connections(connection_id.clone()),
            connection_end.encode_vec(),
        );
        self.ibc_store
            .connections
            .insert(connection_id, connection_end.clone());
        Ok(())
    }

    fn store_connection_to_client(
        &mut self,
        connection_id: ConnectionId,
        client_id: &ClientId,
    ) -> Result<(), Ics03Error> {
        self.store.set(
            Path::ClientConnections(client_id.clone()),
            connection_id.as_str().as_bytes().to_vec(),
        );
        self.ibc_store
            .client_connections
            .insert(client_id.clone(), connection_id);
        Ok(())
    }

    fn increase_connection_counter(&mut self) {
        self.ibc_store.connection_ids_counter += 1;
    }
}

impl ClientReader for MockContext {
    fn client_type(&self, client_id: &ClientId) -> Result<ClientType, Ics02Error> {
        Ok(self.client_record(client_id)?.client_type)
    }

    fn client_state(&self, client_id: &ClientId) -> Result<AnyClientState, Ics02Error> {
        self.client_record(client_id)?
            .client_state
            .clone()
            .ok_or_else(|| Ics02Error::client_not_found(client_id.clone()))
    }

    fn consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<AnyConsensusState, Ics02Error> {
        self.client_record(client_id)?
            .consensus_states
            .get(&height)
            .cloned()
            .ok_or_else(|| Ics02Error::consensus_state_not_found(client_id.clone(), height))
    }

    fn next_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, Ics02Error> {
        Ok(self
            .client_record(client_id)?
            .consensus_states
            .range((Excluded(height), Unbounded))
            .next()
            .map(|(_, cs)| cs.clone()))
    }

    fn prev_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, Ics02Error> {
        Ok(self
            .client_record(client_id)?
            .consensus_states
            .range(..height)
            .next_back()
            .map(|(_, cs)| cs.clone()))
    }

    fn host_height(&self) -> Height {
        self.latest_height
    }

    fn host_timestamp(&self) -> Timestamp {
        self.block_time_at(self.latest_height.revision_height)
    }

    fn client_counter(&self) -> Result<u64, Ics02Error> {
        Ok(self.ibc_store.client_ids_counter)
    }

    fn client_update_time(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Timestamp, Ics02Error> {
        self.client_record(client_id)?
            .update_times
            .get(&height)
            .copied()
            .ok_or_else(|| Ics02Error::processed_time_not_found(client_id.clone(), height))
    }

    fn client_update_height(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Height, Ics02Error> {
        self.client_record(client_id)?
            .update_heights
            .get(&height)
            .copied()
            .ok_or_else(|| Ics02Error::processed_height_not_found(client_id.clone(), height))
    }

    fn host_store_value(&self, path: &Path) -> Option<Vec<u8>> {
        self.store.get(path)
    }
}

impl ClientKeeper for MockContext {
    fn store_client_type(
        &mut self,
        client_id: ClientId,
        client_type: ClientType,
    ) -> Result<(), Ics02Error> {
        self.store.set(
            Path::ClientType(client_id.clone()),
            client_type.as_str().as_bytes().to_vec(),
        );
        self.ibc_store
            .clients
            .entry(client_id)
            .or_insert_with(|| MockClientRecord::new(client_type))
            .client_type = client_type;
        Ok(())
    }

    fn store_client_state(
        &mut self,
        client_id: ClientId,
        client_state: AnyClientState,
    ) -> Result<(), Ics02Error> {
        let client_type = client_state.client_type();
        self.ibc_store
            .clients
            .entry(client_id)
            .or_insert_with(|| MockClientRecord::new(client_type))
            .client_state = Some(client_state);
        Ok(())
    }

    fn store_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Result<(), Ics02Error> {
        self.client_record_mut(&client_id)?
            .consensus_states
            .insert(height, consensus_state);
        Ok(())
    }

    fn increase_client_counter(&mut self) {
        self.ibc_store.client_ids_counter += 1;
    }

    fn store_update_time(
        &mut self,
        client_id: ClientId,
        height: Height,
        timestamp: Timestamp,
    ) -> Result<(), Ics02Error> {
        self.client_record_mut(&client_id)?
            .update_times
            .insert(height, timestamp);
        Ok(())
    }

    fn store_update_height(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_height: Height,
    ) -> Result<(), Ics02Error> {
        self.client_record_mut(&client_id)?
            .update_heights
            .insert(height, host_height);
        Ok(())
    }
}

impl Ics18Context for MockContext {
    fn query_latest_height(&self) -> Height {
        self.host_height()
    }

    fn query_client_full_state(&self, client_id: &ClientId) -> Option<AnyClientState> {
        // Forward call to Ics2.
        ClientReader::client_state(self, client_id).ok()
    }

    fn query_latest_header(&self) -> Option<AnyHeader> {
        self.latest_block().cloned().map(Into::into)
    }

    fn query_proof(&self, path: &Path, height: Height) -> Option<CommitmentProofBytes> {
        MockContext::query_proof(self, path, height)
    }

    fn send(&mut self, msgs: Vec<Ics26Envelope>) -> Result<Vec<IbcEvent>, Ics18Error> {
        // Forward call to Ics26 delivery method, one message at a time.
        let mut all_events = vec![];
        for msg in msgs {
            let receipt = self.deliver(msg).map_err(Ics18Error::transaction_failed)?;
            all_events.extend(receipt.events);
        }
        Ok(all_events)
    }
}
