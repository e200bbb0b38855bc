use crate::clients::ics06_solomachine::client_def::SolomachineClient;
use crate::clients::ics07_tendermint::client_def::TendermintClient;
use crate::clients::ics09_localhost::client_def::LocalhostClient;
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::consensus_state::{AnyConsensusState, ConsensusState};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::header::{AnyHeader, Header};
use crate::core::ics02_client::misbehaviour::AnyMisbehaviour;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::downcast;
use crate::Height;

/// The capabilities every light-client variant provides to the core.
///
/// Verification functions as specified in:
/// <https://github.com/cosmos/ibc/tree/master/spec/core/ics-002-client-semantics>
pub trait ClientDef: Clone {
    type Header: Header;
    type Misbehaviour;
    type ClientState: ClientState;
    type ConsensusState: ConsensusState;

    /// Validates a client state and consensus state pair as a trust anchor.
    fn initialize(
        &self,
        client_state: &Self::ClientState,
        consensus_state: &Self::ConsensusState,
    ) -> Result<(), Error>;

    /// Validates an incoming `header` against the trusted state of this client.
    fn verify_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        header: &Self::Header,
    ) -> Result<(), Error>;

    /// Checks whether an already verified header conflicts with what the
    /// client has recorded so far.
    fn check_for_misbehaviour_on_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        header: &Self::Header,
    ) -> Result<bool, Error>;

    /// Applies a verified header, returning the new client state and the
    /// consensus state to record at the header height.
    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        header: Self::Header,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error>;

    fn verify_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        misbehaviour: &Self::Misbehaviour,
    ) -> Result<(), Error>;

    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        misbehaviour: &Self::Misbehaviour,
    ) -> Result<bool, Error>;

    /// Freezes the client at `height`.
    fn update_state_on_misbehaviour(
        &self,
        client_state: Self::ClientState,
        height: Height,
    ) -> Result<Self::ClientState, Error>;

    /// Verifies a `proof` that `value` is stored at `path` under `prefix` on
    /// the counterparty, as of `height`.
    #[allow(clippy::too_many_arguments)]
    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
        value: Vec<u8>,
    ) -> Result<(), Error>;

    /// Verifies a `proof` that nothing is stored at `path` under `prefix` on
    /// the counterparty, as of `height`.
    #[allow(clippy::too_many_arguments)]
    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
    ) -> Result<(), Error>;

    /// Whether `subject` consents to having its trust material replaced.
    /// Fails with `UpdateClientFailed` otherwise.
    fn check_substitution_allowed(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: &Self::ClientState,
    ) -> Result<(), Error>;

    /// Replaces the trust material of `subject` with that of `substitute`.
    /// Returns the new subject state and the consensus state to record at its
    /// latest height.
    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: Self::ClientState,
        substitute_id: &ClientId,
        substitute: Self::ClientState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyClient {
    Tendermint(TendermintClient),
    Solomachine(SolomachineClient),
    Localhost(LocalhostClient),
}

impl AnyClient {
    pub fn from_client_type(client_type: ClientType) -> AnyClient {
        match client_type {
            ClientType::Tendermint => Self::Tendermint(TendermintClient::default()),
            ClientType::Solomachine => Self::Solomachine(SolomachineClient::default()),
            ClientType::Localhost => Self::Localhost(LocalhostClient::default()),
        }
    }
}

// ⚠️  Beware of the awful boilerplate below ⚠️
impl ClientDef for AnyClient {
    type Header = AnyHeader;
    type Misbehaviour = AnyMisbehaviour;
    type ClientState = AnyClientState;
    type ConsensusState = AnyConsensusState;

    fn initialize(
        &self,
        client_state: &AnyClientState,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, consensus_state) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    consensus_state => AnyConsensusState::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.initialize(client_state, consensus_state)
            }

            Self::Solomachine(client) => {
                let (client_state, consensus_state) = downcast!(
                    client_state => AnyClientState::Solomachine,
                    consensus_state => AnyConsensusState::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.initialize(client_state, consensus_state)
            }

            Self::Localhost(client) => {
                let (client_state, consensus_state) = downcast!(
                    client_state => AnyClientState::Localhost,
                    consensus_state => AnyConsensusState::Localhost,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                client.initialize(client_state, consensus_state)
            }
        }
    }

    fn verify_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        header: &AnyHeader,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    header => AnyHeader::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_header(ctx, client_id, client_state, header)
            }

            Self::Solomachine(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Solomachine,
                    header => AnyHeader::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.verify_header(ctx, client_id, client_state, header)
            }

            Self::Localhost(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Localhost,
                    header => AnyHeader::Localhost,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                client.verify_header(ctx, client_id, client_state, header)
            }
        }
    }

    fn check_for_misbehaviour_on_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        header: &AnyHeader,
    ) -> Result<bool, Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    header => AnyHeader::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.check_for_misbehaviour_on_header(ctx, client_id, client_state, header)
            }

            Self::Solomachine(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Solomachine,
                    header => AnyHeader::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.check_for_misbehaviour_on_header(ctx, client_id, client_state, header)
            }

            Self::Localhost(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Localhost,
                    header => AnyHeader::Localhost,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                client.check_for_misbehaviour_on_header(ctx, client_id, client_state, header)
            }
        }
    }

    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: AnyClientState,
        header: AnyHeader,
    ) -> Result<(AnyClientState, AnyConsensusState), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    header => AnyHeader::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                let (new_state, new_consensus) =
                    client.update_state(ctx, client_id, client_state, header)?;

                Ok((
                    AnyClientState::Tendermint(new_state),
                    AnyConsensusState::Tendermint(new_consensus),
                ))
            }

            Self::Solomachine(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Solomachine,
                    header => AnyHeader::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                let (new_state, new_consensus) =
                    client.update_state(ctx, client_id, client_state, header)?;

                Ok((
                    AnyClientState::Solomachine(new_state),
                    AnyConsensusState::Solomachine(new_consensus),
                ))
            }

            Self::Localhost(client) => {
                let (client_state, header) = downcast!(
                    client_state => AnyClientState::Localhost,
                    header => AnyHeader::Localhost,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                let (new_state, new_consensus) =
                    client.update_state(ctx, client_id, client_state, header)?;

                Ok((
                    AnyClientState::Localhost(new_state),
                    AnyConsensusState::Localhost(new_consensus),
                ))
            }
        }
    }

    fn verify_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        misbehaviour: &AnyMisbehaviour,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, misbehaviour) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    misbehaviour => AnyMisbehaviour::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_misbehaviour(ctx, client_id, client_state, misbehaviour)
            }

            Self::Solomachine(client) => {
                let (client_state, misbehaviour) = downcast!(
                    client_state => AnyClientState::Solomachine,
                    misbehaviour => AnyMisbehaviour::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.verify_misbehaviour(ctx, client_id, client_state, misbehaviour)
            }

            Self::Localhost(_) => Err(Error::invalid_misbehaviour(
                "the loopback client cannot misbehave".to_string(),
            )),
        }
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        misbehaviour: &AnyMisbehaviour,
    ) -> Result<bool, Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, misbehaviour) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    misbehaviour => AnyMisbehaviour::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.check_for_misbehaviour(ctx, client_id, client_state, misbehaviour)
            }

            Self::Solomachine(client) => {
                let (client_state, misbehaviour) = downcast!(
                    client_state => AnyClientState::Solomachine,
                    misbehaviour => AnyMisbehaviour::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.check_for_misbehaviour(ctx, client_id, client_state, misbehaviour)
            }

            Self::Localhost(_) => Ok(false),
        }
    }

    fn update_state_on_misbehaviour(
        &self,
        client_state: AnyClientState,
        height: Height,
    ) -> Result<AnyClientState, Error> {
        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                Ok(AnyClientState::Tendermint(
                    client.update_state_on_misbehaviour(client_state, height)?,
                ))
            }

            Self::Solomachine(client) => {
                let client_state = downcast!(client_state => AnyClientState::Solomachine)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                Ok(AnyClientState::Solomachine(
                    client.update_state_on_misbehaviour(client_state, height)?,
                ))
            }

            Self::Localhost(client) => {
                let client_state = downcast!(client_state => AnyClientState::Localhost)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                Ok(AnyClientState::Localhost(
                    client.update_state_on_misbehaviour(client_state, height)?,
                ))
            }
        }
    }

    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                    value,
                )
            }

            Self::Solomachine(client) => {
                let client_state = downcast!(client_state => AnyClientState::Solomachine)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.verify_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                    value,
                )
            }

            Self::Localhost(client) => {
                let client_state = downcast!(client_state => AnyClientState::Localhost)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                client.verify_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                    value,
                )
            }
        }
    }

    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: &Path,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_non_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                )
            }

            Self::Solomachine(client) => {
                let client_state = downcast!(client_state => AnyClientState::Solomachine)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                client.verify_non_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                )
            }

            Self::Localhost(client) => {
                let client_state = downcast!(client_state => AnyClientState::Localhost)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                client.verify_non_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                )
            }
        }
    }

    fn check_substitution_allowed(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: &AnyClientState,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let subject = downcast!(subject => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;
                client.check_substitution_allowed(ctx, subject_id, subject)
            }

            Self::Solomachine(client) => {
                let subject = downcast!(subject => AnyClientState::Solomachine)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;
                client.check_substitution_allowed(ctx, subject_id, subject)
            }

            Self::Localhost(client) => {
                let subject = downcast!(subject => AnyClientState::Localhost)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;
                client.check_substitution_allowed(ctx, subject_id, subject)
            }
        }
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: AnyClientState,
        substitute_id: &ClientId,
        substitute: AnyClientState,
    ) -> Result<(AnyClientState, AnyConsensusState), Error> {
        // Consent comes first: a subject that forbids substitution says so
        // whatever it is offered.
        self.check_substitution_allowed(ctx, subject_id, &subject)?;

        if subject.client_type() != substitute.client_type() {
            return Err(Error::invalid_client_type(
                subject.client_type(),
                substitute.client_type(),
            ));
        }

        match self {
            Self::Tendermint(client) => {
                let (subject, substitute) = downcast!(
                    subject => AnyClientState::Tendermint,
                    substitute => AnyClientState::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                let (new_state, new_consensus) = client.check_substitute_and_update_state(
                    ctx,
                    subject_id,
                    subject,
                    substitute_id,
                    substitute,
                )?;

                Ok((
                    AnyClientState::Tendermint(new_state),
                    AnyConsensusState::Tendermint(new_consensus),
                ))
            }

            Self::Solomachine(client) => {
                let (subject, substitute) = downcast!(
                    subject => AnyClientState::Solomachine,
                    substitute => AnyClientState::Solomachine,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Solomachine))?;

                let (new_state, new_consensus) = client.check_substitute_and_update_state(
                    ctx,
                    subject_id,
                    subject,
                    substitute_id,
                    substitute,
                )?;

                Ok((
                    AnyClientState::Solomachine(new_state),
                    AnyConsensusState::Solomachine(new_consensus),
                ))
            }

            Self::Localhost(client) => {
                let (subject, substitute) = downcast!(
                    subject => AnyClientState::Localhost,
                    substitute => AnyClientState::Localhost,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Localhost))?;

                let (new_state, new_consensus) = client.check_substitute_and_update_state(
                    ctx,
                    subject_id,
                    subject,
                    substitute_id,
                    substitute,
                )?;

                Ok((
                    AnyClientState::Localhost(new_state),
                    AnyConsensusState::Localhost(new_consensus),
                ))
            }
        }
    }
}
