use tracing::debug;

use crate::clients::ics07_tendermint::client_state::ClientState;
use crate::clients::ics07_tendermint::consensus_state::ConsensusState;
use crate::clients::ics07_tendermint::header::{vote_sign_bytes, Header};
use crate::clients::ics07_tendermint::misbehaviour::Misbehaviour;
use crate::clients::ics07_tendermint::validator::ValidatorSet;
use crate::core::ics02_client::client_def::ClientDef;
use crate::core::ics02_client::consensus_state::{AnyConsensusState, ConsensusState as _};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::trust_threshold::TrustThreshold;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics23_commitment::merkle::{apply_prefix, MerkleProof};
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::downcast;
use crate::Height;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TendermintClient;

impl TendermintClient {
    fn consensus_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        height: Height,
    ) -> Result<ConsensusState, Error> {
        let any = ctx.consensus_state(client_id, height)?;
        downcast_consensus_state(any)
    }

    /// Voting power of the members of `validator_set` with a valid vote in
    /// the header's commit. A bad signature by a member fails the header.
    fn signed_power(&self, header: &Header, validator_set: &ValidatorSet) -> Result<u64, Error> {
        let block = &header.signed_header.header;
        let commit = &header.signed_header.commit;
        let sign_bytes = vote_sign_bytes(&block.chain_id, block.height, &commit.block_hash);

        let mut signers = Vec::with_capacity(commit.signatures.len());
        for sig in &commit.signatures {
            if validator_set.validator(&sig.validator).is_none() {
                continue;
            }
            sig.validator
                .verify(&sign_bytes, &sig.signature)
                .map_err(|e| {
                    Error::invalid_header(format!(
                        "invalid commit signature by validator {}: {}",
                        sig.validator, e
                    ))
                })?;
            signers.push(&sig.validator);
        }

        Ok(validator_set.voting_power_of(signers))
    }

    fn verify_merkle_proof(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        height: Height,
        proof: &CommitmentProofBytes,
    ) -> Result<(ConsensusState, MerkleProof), Error> {
        if client_state.frozen_height.is_some() {
            return Err(Error::client_frozen(client_id.clone()));
        }
        if client_state.latest_height() < height {
            return Err(Error::insufficient_height(
                client_state.latest_height(),
                height,
            ));
        }

        let consensus_state = self.consensus_state(ctx, client_id, height)?;
        let merkle_proof = MerkleProof::try_from(proof).map_err(Error::invalid_proof)?;

        Ok((consensus_state, merkle_proof))
    }
}

fn downcast_consensus_state(cs: AnyConsensusState) -> Result<ConsensusState, Error> {
    let client_type = cs.client_type();
    downcast!(cs => AnyConsensusState::Tendermint)
        .ok_or_else(|| Error::client_args_type_mismatch(client_type))
}

impl ClientDef for TendermintClient {
    type Header = Header;
    type Misbehaviour = Misbehaviour;
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;

    fn initialize(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
    ) -> Result<(), Error> {
        client_state.validate()?;

        if client_state.frozen_height.is_some() {
            return Err(Error::invalid_client_state(
                "a new client cannot be frozen".to_string(),
            ));
        }
        if consensus_state.root.is_empty() {
            return Err(Error::invalid_consensus_state(
                "root cannot be empty".to_string(),
            ));
        }
        if !consensus_state.timestamp.is_set() {
            return Err(Error::invalid_consensus_state(
                "timestamp cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    fn verify_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        header: &Header,
    ) -> Result<(), Error> {
        let block = &header.signed_header.header;

        if block.chain_id != client_state.chain_id {
            return Err(Error::invalid_header(format!(
                "header chain id {} does not match the client chain id {}",
                block.chain_id, client_state.chain_id
            )));
        }

        if header.height() <= header.trusted_height
            || header.height().revision_number != header.trusted_height.revision_number
        {
            return Err(Error::invalid_header(format!(
                "header height {} must be above the trusted height {} within the same revision",
                header.height(),
                header.trusted_height
            )));
        }

        let trusted = self.consensus_state(ctx, client_id, header.trusted_height)?;

        if header.trusted_validator_set.hash() != trusted.next_validators_hash {
            return Err(Error::invalid_header(
                "trusted validator set does not match the trusted next validators hash".to_string(),
            ));
        }

        if header.validator_set.hash() != block.validators_hash {
            return Err(Error::invalid_header(
                "validator set does not match the header validators hash".to_string(),
            ));
        }

        let commit = &header.signed_header.commit;
        if commit.height != block.height || commit.block_hash != block.hash() {
            return Err(Error::invalid_header(
                "commit does not sign this block".to_string(),
            ));
        }

        if !block.time.after(&trusted.timestamp) {
            return Err(Error::invalid_header(format!(
                "header time {} is not after the trusted time {}",
                block.time, trusted.timestamp
            )));
        }

        let now = ctx.host_timestamp();
        let drift_limit = (now + client_state.max_clock_drift).map_err(Error::timestamp_overflow)?;
        if block.time.after(&drift_limit) {
            return Err(Error::invalid_header(format!(
                "header time {} is in the future (now {}, max drift {:?})",
                block.time, now, client_state.max_clock_drift
            )));
        }

        let elapsed = now.duration_since(&trusted.timestamp).unwrap_or_default();
        if client_state.expired(elapsed) {
            return Err(Error::expired_client(
                client_id.clone(),
                trusted.timestamp,
                elapsed,
            ));
        }

        let adjacent = header.height() == header.trusted_height.increment();
        if adjacent {
            if block.validators_hash != trusted.next_validators_hash {
                return Err(Error::invalid_header(
                    "adjacent header validators do not match the trusted next validators"
                        .to_string(),
                ));
            }
        } else {
            let trusted_power = self.signed_power(header, &header.trusted_validator_set)?;
            let trusted_total = header.trusted_validator_set.total_voting_power();
            if !client_state
                .trust_level
                .is_exceeded_by(trusted_power, trusted_total)
            {
                return Err(Error::invalid_header(format!(
                    "not enough trust: {}/{} of the trusted voting power signed, need more than {}",
                    trusted_power, trusted_total, client_state.trust_level
                )));
            }
        }

        let power = self.signed_power(header, &header.validator_set)?;
        let total = header.validator_set.total_voting_power();
        if !TrustThreshold::TWO_THIRDS.is_exceeded_by(power, total) {
            return Err(Error::invalid_header(format!(
                "insufficient voting power: {}/{} signed, need more than 2/3",
                power, total
            )));
        }

        debug!(
            "verified header {} against trusted height {}",
            header, header.trusted_height
        );

        Ok(())
    }

    fn check_for_misbehaviour_on_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &ClientState,
        header: &Header,
    ) -> Result<bool, Error> {
        let height = header.height();
        let header_cs = ConsensusState::from(header.clone());

        // A different consensus state already recorded at this height is a fork.
        if let Ok(existing) = ctx.consensus_state(client_id, height) {
            let existing = downcast_consensus_state(existing)?;
            return Ok(existing != header_cs);
        }

        // Time must grow with height.
        if let Some(prev) = ctx.prev_consensus_state(client_id, height)? {
            if !header_cs.timestamp.after(&prev.timestamp()) {
                return Ok(true);
            }
        }
        if let Some(next) = ctx.next_consensus_state(client_id, height)? {
            if !next.timestamp().after(&header_cs.timestamp) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn update_state(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: ClientState,
        header: Header,
    ) -> Result<(ClientState, ConsensusState), Error> {
        let client_state = client_state.with_header(&header);
        Ok((client_state, ConsensusState::from(header)))
    }

    fn verify_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        misbehaviour: &Misbehaviour,
    ) -> Result<(), Error> {
        if client_state.frozen_height.is_some() {
            return Err(Error::client_frozen(client_id.clone()));
        }
        if &misbehaviour.client_id != client_id {
            return Err(Error::invalid_misbehaviour(format!(
                "evidence names client {} instead of {}",
                misbehaviour.client_id, client_id
            )));
        }

        for header in [&misbehaviour.header1, &misbehaviour.header2] {
            self.verify_header(ctx, client_id, client_state, header)
                .map_err(|e| Error::invalid_misbehaviour(e.to_string()))?;
        }

        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        misbehaviour: &Misbehaviour,
    ) -> Result<bool, Error> {
        let (h1, h2) = (&misbehaviour.header1, &misbehaviour.header2);

        if h1.height() == h2.height() {
            return Ok(h1.signed_header.commit.block_hash != h2.signed_header.commit.block_hash);
        }

        let (lower, higher) = if h1.height() < h2.height() {
            (h1, h2)
        } else {
            (h2, h1)
        };
        Ok(!higher.timestamp().after(&lower.timestamp()))
    }

    fn update_state_on_misbehaviour(
        &self,
        client_state: ClientState,
        height: Height,
    ) -> Result<ClientState, Error> {
        Ok(client_state.with_frozen_height(height))
    }

    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        let (consensus_state, merkle_proof) =
            self.verify_merkle_proof(ctx, client_id, client_state, height, proof)?;
        let merkle_path = apply_prefix(prefix, path.to_string());

        merkle_proof
            .verify_membership(&consensus_state.root, &merkle_path, &value)
            .map_err(Error::invalid_proof)
    }

    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
    ) -> Result<(), Error> {
        let (consensus_state, merkle_proof) =
            self.verify_merkle_proof(ctx, client_id, client_state, height, proof)?;
        let merkle_path = apply_prefix(prefix, path.to_string());

        merkle_proof
            .verify_non_membership(&consensus_state.root, &merkle_path)
            .map_err(Error::invalid_proof)
    }

    fn check_substitution_allowed(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: &ClientState,
    ) -> Result<(), Error> {
        let subject_cs = self.consensus_state(ctx, subject_id, subject.latest_height())?;
        let elapsed = ctx
            .host_timestamp()
            .duration_since(&subject_cs.timestamp)
            .unwrap_or_default();
        let frozen = subject.frozen_height.is_some();
        let expired = subject.expired(elapsed);

        if frozen && !subject.allow_update.after_misbehaviour {
            return Err(Error::update_client_failed(format!(
                "client {} is frozen and does not allow updates after misbehaviour",
                subject_id
            )));
        }
        if expired && !subject.allow_update.after_expiry {
            return Err(Error::update_client_failed(format!(
                "client {} is expired and does not allow updates after expiry",
                subject_id
            )));
        }
        Ok(())
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: ClientState,
        substitute_id: &ClientId,
        substitute: ClientState,
    ) -> Result<(ClientState, ConsensusState), Error> {
        self.check_substitution_allowed(ctx, subject_id, &subject)?;

        if substitute.frozen_height.is_some() {
            return Err(Error::client_frozen(substitute_id.clone()));
        }

        let subject_cs = self.consensus_state(ctx, subject_id, subject.latest_height())?;
        let substitute_cs =
            self.consensus_state(ctx, substitute_id, substitute.latest_height())?;
        if substitute_cs.next_validators_hash == subject_cs.next_validators_hash {
            return Err(Error::invalid_header(format!(
                "substitute {} tracks the same validator set as {}",
                substitute_id, subject_id
            )));
        }

        let client_state = ClientState {
            latest_height: substitute.latest_height,
            frozen_height: None,
            ..subject
        };

        Ok((client_state, substitute_cs))
    }
}
