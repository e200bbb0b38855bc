use prost::Message;
use tracing::debug;

use crate::clients::ics06_solomachine::client_state::ClientState;
use crate::clients::ics06_solomachine::consensus_state::ConsensusState;
use crate::clients::ics06_solomachine::header::Header;
use crate::clients::ics06_solomachine::misbehaviour::{Misbehaviour, SignatureAndData};
use crate::clients::ics06_solomachine::proof::{SignBytes, TimestampedSignatureData};
use crate::core::ics02_client::client_def::ClientDef;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics23_commitment::merkle::apply_prefix;
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::timestamp::Timestamp;
use crate::Height;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolomachineClient;

impl SolomachineClient {
    /// Checks a membership or non-membership signature. Non-membership is a
    /// signature over an empty value.
    #[allow(clippy::too_many_arguments)]
    fn verify_signature_proof(
        &self,
        client_id: &ClientId,
        client_state: &ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        if client_state.frozen_height.is_some() {
            return Err(Error::client_frozen(client_id.clone()));
        }

        if height != client_state.latest_height() {
            return Err(Error::invalid_signature_proof(format!(
                "proof height {} does not match the client sequence {}",
                height,
                client_state.latest_height()
            )));
        }

        let proof = TimestampedSignatureData::decode_proof(proof)?;
        let proof_timestamp = Timestamp::from_nanoseconds(proof.timestamp)
            .map_err(Error::timestamp_overflow)?;

        let consensus_state = &client_state.consensus_state;
        if proof_timestamp < consensus_state.timestamp {
            return Err(Error::invalid_signature_proof(format!(
                "proof timestamp {} is before the consensus state timestamp {}",
                proof_timestamp, consensus_state.timestamp
            )));
        }

        let merkle_path = apply_prefix(prefix, path.to_string());
        let sign_bytes = SignBytes::new(
            client_state.sequence,
            proof_timestamp,
            &consensus_state.diversifier,
            merkle_path.key(),
            value,
        )
        .encode_to_vec();

        consensus_state
            .public_key
            .verify(&sign_bytes, &proof.signature_data)
            .map_err(|e| Error::invalid_signature_proof(e.to_string()))
    }

    fn verify_signature_and_data(
        &self,
        client_state: &ClientState,
        sequence: u64,
        sd: &SignatureAndData,
    ) -> Result<(), Error> {
        let consensus_state = &client_state.consensus_state;
        let sign_bytes = SignBytes::new(
            sequence,
            sd.timestamp,
            &consensus_state.diversifier,
            sd.path.clone(),
            sd.data.clone(),
        )
        .encode_to_vec();

        consensus_state
            .public_key
            .verify(&sign_bytes, &sd.signature)
            .map_err(|e| Error::invalid_misbehaviour(e.to_string()))
    }
}

impl ClientDef for SolomachineClient {
    type Header = Header;
    type Misbehaviour = Misbehaviour;
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;

    fn initialize(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
    ) -> Result<(), Error> {
        if client_state.sequence == 0 {
            return Err(Error::invalid_client_state(
                "solo machine sequence cannot be zero".to_string(),
            ));
        }
        if client_state.frozen_height.is_some() {
            return Err(Error::invalid_client_state(
                "a new client cannot be frozen".to_string(),
            ));
        }
        consensus_state.validate_basic()?;
        if &client_state.consensus_state != consensus_state {
            return Err(Error::invalid_consensus_state(
                "consensus state differs from the one embedded in the client state".to_string(),
            ));
        }
        Ok(())
    }

    fn verify_header(
        &self,
        _ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        header: &Header,
    ) -> Result<(), Error> {
        if client_state.frozen_height.is_some() {
            return Err(Error::client_frozen(client_id.clone()));
        }
        header.validate_basic()?;

        if header.sequence != client_state.sequence {
            return Err(Error::invalid_header(format!(
                "header sequence {} does not match the client sequence {}",
                header.sequence, client_state.sequence
            )));
        }

        let consensus_state = &client_state.consensus_state;
        if header.timestamp < consensus_state.timestamp {
            return Err(Error::invalid_header(format!(
                "header timestamp {} is before the consensus state timestamp {}",
                header.timestamp, consensus_state.timestamp
            )));
        }

        let sign_bytes = Header::sign_bytes(
            header.sequence,
            header.timestamp,
            &consensus_state.diversifier,
            &header.new_public_key,
            &header.new_diversifier,
        );

        consensus_state
            .public_key
            .verify(&sign_bytes, &header.signature)
            .map_err(|e| Error::invalid_header(e.to_string()))
    }

    fn check_for_misbehaviour_on_header(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        _header: &Header,
    ) -> Result<bool, Error> {
        // A verified header always carries the expected sequence, so it can
        // only conflict with a statement submitted as explicit evidence.
        Ok(false)
    }

    fn update_state(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: ClientState,
        header: Header,
    ) -> Result<(ClientState, ConsensusState), Error> {
        let consensus_state = ConsensusState::new(
            header.new_public_key,
            header.new_diversifier,
            header.timestamp,
        );

        debug!(
            "solo machine rotated to key {} at sequence {}",
            consensus_state.public_key,
            client_state.sequence + 1
        );

        let client_state = ClientState {
            sequence: client_state.sequence + 1,
            consensus_state: consensus_state.clone(),
            ..client_state
        };

        Ok((client_state, consensus_state))
    }

    fn verify_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        misbehaviour: &Misbehaviour,
    ) -> Result<(), Error> {
        if client_state.frozen_height.is_some() {
            return Err(Error::client_frozen(client_id.clone()));
        }
        misbehaviour.validate_basic()?;

        self.verify_signature_and_data(
            client_state,
            misbehaviour.sequence,
            &misbehaviour.signature_one,
        )?;
        self.verify_signature_and_data(
            client_state,
            misbehaviour.sequence,
            &misbehaviour.signature_two,
        )
    }

    fn check_for_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        misbehaviour: &Misbehaviour,
    ) -> Result<bool, Error> {
        // Proofs do not consume the sequence, so an honest machine signs many
        // paths at one sequence. Only conflicting data for one path is fraud.
        let (one, two) = (&misbehaviour.signature_one, &misbehaviour.signature_two);
        Ok(one.path == two.path && one.data != two.data)
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
        _ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        if value.is_empty() {
            return Err(Error::invalid_signature_proof(
                "cannot prove membership of an empty value".to_string(),
            ));
        }
        self.verify_signature_proof(client_id, client_state, height, prefix, proof, path, value)
    }

    fn verify_non_membership(
        &self,
        _ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
    ) -> Result<(), Error> {
        self.verify_signature_proof(
            client_id,
            client_state,
            height,
            prefix,
            proof,
            path,
            Vec::new(),
        )
    }

    fn check_substitution_allowed(
        &self,
        _ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: &ClientState,
    ) -> Result<(), Error> {
        if !subject.allow_update_after_proposal {
            return Err(Error::update_client_failed(format!(
                "client {} does not allow updates after a proposal",
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

        if subject
            .consensus_state
            .public_key
            .same_key(&substitute.consensus_state.public_key)
        {
            return Err(Error::invalid_header(format!(
                "substitute {} uses the same public key as {}",
                substitute_id, subject_id
            )));
        }

        let consensus_state = substitute.consensus_state.clone();
        let client_state = ClientState {
            sequence: substitute.sequence,
            frozen_height: None,
            consensus_state: substitute.consensus_state,
            ..subject
        };

        Ok((client_state, consensus_state))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::clients::crypto::PublicKey;
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::error::ErrorDetail;
    use crate::core::ics24_host::identifier::ConnectionId;
    use crate::mock::context::MockContext;
    use crate::test_utils::{
        get_dummy_secret_key, get_dummy_solomachine_misbehaviour, get_dummy_solomachine_proofs,
        get_dummy_solomachine_states, DUMMY_DIVERSIFIER, DUMMY_SOLOMACHINE_TIME_NANOS,
    };

    fn client_id() -> ClientId {
        ClientId::new(ClientType::Solomachine, 0).unwrap()
    }

    #[test]
    fn header_rotates_the_key() {
        let ctx = MockContext::default();
        let (old_sk, new_sk) = (get_dummy_secret_key(1), get_dummy_secret_key(2));
        let (client_state, _) = get_dummy_solomachine_states(&old_sk, 3);
        let timestamp = Timestamp::from_nanoseconds(DUMMY_SOLOMACHINE_TIME_NANOS + 10).unwrap();

        let header = Header::new_signed(
            &old_sk,
            3,
            timestamp,
            DUMMY_DIVERSIFIER,
            PublicKey::from_secret_key(&new_sk),
            "rotated".to_string(),
        );

        let client = SolomachineClient;
        client
            .verify_header(&ctx, &client_id(), &client_state, &header)
            .unwrap();
        let (new_state, consensus_state) = client
            .update_state(&ctx, &client_id(), client_state.clone(), header)
            .unwrap();

        assert_eq!(new_state.sequence, 4);
        assert_eq!(consensus_state.diversifier, "rotated");
        assert!(consensus_state
            .public_key
            .same_key(&PublicKey::from_secret_key(&new_sk)));

        // The rotated-out key no longer signs for the client.
        let stale = Header::new_signed(
            &old_sk,
            4,
            timestamp,
            "rotated",
            PublicKey::from_secret_key(&old_sk),
            "back".to_string(),
        );
        let res = client.verify_header(&ctx, &client_id(), &new_state, &stale);
        assert!(matches!(res, Err(Error(ErrorDetail::InvalidHeader(_), _))));
    }

    #[test]
    fn header_for_another_sequence_is_rejected() {
        let ctx = MockContext::default();
        let sk = get_dummy_secret_key(1);
        let (client_state, _) = get_dummy_solomachine_states(&sk, 3);

        let header = Header::new_signed(
            &sk,
            7,
            Timestamp::from_nanoseconds(DUMMY_SOLOMACHINE_TIME_NANOS).unwrap(),
            DUMMY_DIVERSIFIER,
            PublicKey::from_secret_key(&sk),
            DUMMY_DIVERSIFIER.to_string(),
        );

        let res = SolomachineClient.verify_header(&ctx, &client_id(), &client_state, &header);
        assert!(matches!(res, Err(Error(ErrorDetail::InvalidHeader(_), _))));
    }

    #[test]
    fn signature_proofs() {
        let ctx = MockContext::default();
        let sk = get_dummy_secret_key(1);
        let (client_state, _) = get_dummy_solomachine_states(&sk, 2);
        let prefix = CommitmentPrefix::default();
        let path = Path::Connections(ConnectionId::new(0));

        let proofs = get_dummy_solomachine_proofs(&sk, 2, &prefix, &path, b"open".to_vec());
        let client = SolomachineClient;

        assert!(client
            .verify_membership(
                &ctx,
                &client_id(),
                &client_state,
                proofs.height(),
                &prefix,
                proofs.object_proof(),
                &path,
                b"open".to_vec(),
            )
            .is_ok());

        let res = client.verify_membership(
            &ctx,
            &client_id(),
            &client_state,
            proofs.height(),
            &prefix,
            proofs.object_proof(),
            &path,
            b"closed".to_vec(),
        );
        assert!(matches!(res, Err(Error(ErrorDetail::InvalidSignatureProof(_), _))));

        // A proof taken at another sequence does not count.
        let res = client.verify_membership(
            &ctx,
            &client_id(),
            &client_state,
            Height::new(0, 3),
            &prefix,
            proofs.object_proof(),
            &path,
            b"open".to_vec(),
        );
        assert!(res.is_err());

        let absence = get_dummy_solomachine_proofs(&sk, 2, &prefix, &path, vec![]);
        assert!(client
            .verify_non_membership(
                &ctx,
                &client_id(),
                &client_state,
                absence.height(),
                &prefix,
                absence.object_proof(),
                &path,
            )
            .is_ok());
    }

    #[test]
    fn conflicting_statements_freeze_the_client() {
        let ctx = MockContext::default();
        let sk = get_dummy_secret_key(1);
        let (client_state, _) = get_dummy_solomachine_states(&sk, 4);

        let misbehaviour = get_dummy_solomachine_misbehaviour(&sk, client_id(), 4);

        let client = SolomachineClient;
        client
            .verify_misbehaviour(&ctx, &client_id(), &client_state, &misbehaviour)
            .unwrap();
        assert!(client
            .check_for_misbehaviour(&ctx, &client_id(), &client_state, &misbehaviour)
            .unwrap());

        let frozen = client
            .update_state_on_misbehaviour(client_state, Height::new(0, 4))
            .unwrap();
        assert_eq!(frozen.frozen_height, Some(Height::new(0, 4)));

        // Signatures by a stranger are no evidence.
        let (client_state, _) = get_dummy_solomachine_states(&sk, 4);
        let stranger = get_dummy_solomachine_misbehaviour(&get_dummy_secret_key(9), client_id(), 4);
        let forged = Misbehaviour {
            signature_two: stranger.signature_two,
            ..misbehaviour
        };
        let res = client.verify_misbehaviour(&ctx, &client_id(), &client_state, &forged);
        assert!(matches!(res, Err(Error(ErrorDetail::InvalidMisbehaviour(_), _))));
    }

    #[test]
    fn substitute_needs_consent_and_a_new_key() {
        let ctx = MockContext::default();
        let (sk, other_sk) = (get_dummy_secret_key(1), get_dummy_secret_key(2));
        let substitute_id = ClientId::new(ClientType::Solomachine, 1).unwrap();

        let (subject, _) = get_dummy_solomachine_states(&sk, 5);
        let (substitute, _) = get_dummy_solomachine_states(&other_sk, 9);
        let client = SolomachineClient;

        let res = client.check_substitute_and_update_state(
            &ctx,
            &client_id(),
            subject.clone(),
            &substitute_id,
            substitute.clone(),
        );
        assert!(matches!(res, Err(Error(ErrorDetail::UpdateClientFailed(_), _))));

        let subject = ClientState {
            allow_update_after_proposal: true,
            ..subject.with_frozen_height(Height::new(0, 5))
        };
        let (same_key, _) = get_dummy_solomachine_states(&sk, 9);
        assert!(client
            .check_substitute_and_update_state(
                &ctx,
                &client_id(),
                subject.clone(),
                &substitute_id,
                same_key,
            )
            .is_err());

        let (client_state, consensus_state) = client
            .check_substitute_and_update_state(
                &ctx,
                &client_id(),
                subject,
                &substitute_id,
                substitute,
            )
            .unwrap();
        assert_eq!(client_state.sequence, 9);
        assert_eq!(client_state.frozen_height, None);
        assert!(client_state.allow_update_after_proposal);
        assert!(consensus_state
            .public_key
            .same_key(&PublicKey::from_secret_key(&other_sk)));
    }
}
