//! Fixtures shared by the handler tests: keys, client states for both light
//! client families, solo machine proofs and a connection end.

use core::time::Duration;

use prost::Message;
use secp256k1::SecretKey;

use crate::clients::crypto::{self, PublicKey};
use crate::clients::ics06_solomachine::client_state::ClientState as SmClientState;
use crate::clients::ics06_solomachine::consensus_state::ConsensusState as SmConsensusState;
use crate::clients::ics06_solomachine::misbehaviour::{
    Misbehaviour as SmMisbehaviour, SignatureAndData,
};
use crate::clients::ics06_solomachine::proof::{sign_proof, SignBytes};
use crate::clients::ics07_tendermint::client_state::{AllowUpdate, ClientState as TmClientState};
use crate::clients::ics07_tendermint::consensus_state::ConsensusState as TmConsensusState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::trust_threshold::TrustThreshold;
use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
use crate::core::ics03_connection::version::Version;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentRoot};
use crate::core::ics23_commitment::merkle::apply_prefix;
use crate::core::ics24_host::identifier::{ChainId, ClientId, ConnectionId};
use crate::core::ics24_host::path::Path;
use crate::mock::host::derive_secret_key;
use crate::proofs::Proofs;
use crate::timestamp::Timestamp;
use crate::Height;

/// Diversifier of every dummy solo machine.
pub const DUMMY_DIVERSIFIER: &str = "diversifier";

/// Timestamp recorded in every dummy solo machine consensus state.
pub const DUMMY_SOLOMACHINE_TIME_NANOS: u64 = 1_000_000_000;

pub fn get_dummy_secret_key(seed: u8) -> SecretKey {
    derive_secret_key(&[b'k', b'e', b'y', seed])
}

/// A tendermint client for a fictional `counterparty-{revision}` chain, with
/// one consensus state at `height`, timestamped at the current time of `ctx`.
pub fn get_dummy_tendermint_states<Ctx: ClientReader>(
    ctx: &Ctx,
    height: Height,
) -> (TmClientState, TmConsensusState) {
    let client_state = TmClientState {
        chain_id: ChainId::new("counterparty".to_string(), height.revision_number),
        trust_level: TrustThreshold::ONE_THIRD,
        trusting_period: Duration::from_secs(14 * 24 * 3600),
        unbonding_period: Duration::from_secs(21 * 24 * 3600),
        max_clock_drift: Duration::from_secs(10),
        latest_height: height,
        allow_update: AllowUpdate::default(),
        frozen_height: None,
    };

    let consensus_state = TmConsensusState::new(
        CommitmentRoot::from_bytes(b"dummy app hash"),
        ctx.host_timestamp(),
        [7u8; 32],
    );

    (client_state, consensus_state)
}

pub fn get_dummy_solomachine_states(
    secret_key: &SecretKey,
    sequence: u64,
) -> (SmClientState, SmConsensusState) {
    let consensus_state = SmConsensusState::new(
        PublicKey::from_secret_key(secret_key),
        DUMMY_DIVERSIFIER.to_string(),
        Timestamp::from_nanoseconds(DUMMY_SOLOMACHINE_TIME_NANOS)
            .expect("dummy timestamp in range"),
    );
    let client_state = SmClientState::new(sequence, consensus_state.clone(), false)
        .expect("dummy solo machine state is valid");

    (client_state, consensus_state)
}

/// Signs `data` at `path` the way a solo machine at `sequence` would, for
/// a counterparty whose store prefix is `prefix`. Empty `data` proves absence.
pub fn get_dummy_solomachine_proofs(
    secret_key: &SecretKey,
    sequence: u64,
    prefix: &CommitmentPrefix,
    path: &Path,
    data: Vec<u8>,
) -> Proofs {
    let timestamp = Timestamp::from_nanoseconds(DUMMY_SOLOMACHINE_TIME_NANOS + sequence)
        .expect("dummy timestamp in range");
    let key = apply_prefix(prefix, path.to_string()).key();

    let proof = sign_proof(secret_key, sequence, DUMMY_DIVERSIFIER, timestamp, key, data)
        .expect("signing a dummy proof");
    Proofs::new(proof, Height::new(0, sequence)).expect("non-empty proof at a non-zero height")
}

/// Evidence of a solo machine signing two different states of the same
/// connection path at `sequence`.
pub fn get_dummy_solomachine_misbehaviour(
    secret_key: &SecretKey,
    client_id: ClientId,
    sequence: u64,
) -> SmMisbehaviour {
    let path = Path::Connections(ConnectionId::new(0)).to_string();
    let path = apply_prefix(&CommitmentPrefix::default(), path).key();
    let statement = |data: &[u8]| {
        let timestamp = Timestamp::from_nanoseconds(DUMMY_SOLOMACHINE_TIME_NANOS + sequence)
            .expect("dummy timestamp in range");
        let sign_bytes =
            SignBytes::new(sequence, timestamp, DUMMY_DIVERSIFIER, path.clone(), data.to_vec())
                .encode_to_vec();
        SignatureAndData {
            signature: crypto::sign(secret_key, &sign_bytes),
            path: path.clone(),
            data: data.to_vec(),
            timestamp,
        }
    };

    SmMisbehaviour {
        client_id,
        sequence,
        signature_one: statement(b"open"),
        signature_two: statement(b"closed"),
    }
}

/// A connection end on a solo machine client (`06-solomachine-0`), whose
/// counterparty is `connection-1` on a tendermint client.
pub fn get_dummy_connection_end(state: State) -> ConnectionEnd {
    let client_id = ClientId::new(ClientType::Solomachine, 0).expect("valid client id");
    let counterparty = Counterparty::new(
        ClientId::default(),
        Some(ConnectionId::new(1)),
        CommitmentPrefix::default(),
    );

    ConnectionEnd::new(
        state,
        client_id,
        counterparty,
        vec![Version::default()],
        Duration::ZERO,
    )
}
