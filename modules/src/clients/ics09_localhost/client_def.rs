use core::convert::Infallible;

use crate::clients::ics09_localhost::client_state::ClientState;
use crate::clients::ics09_localhost::consensus_state::ConsensusState;
use crate::clients::ics09_localhost::header::Header;
use crate::core::ics02_client::client_def::ClientDef;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics23_commitment::error::Error as Ics23Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::Height;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalhostClient;

impl ClientDef for LocalhostClient {
    type Header = Header;
    type Misbehaviour = Infallible;
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;

    fn initialize(
        &self,
        client_state: &ClientState,
        consensus_state: &ConsensusState,
    ) -> Result<(), Error> {
        if client_state.latest_height.is_zero() {
            return Err(Error::invalid_client_state(
                "latest height must be greater than zero".to_string(),
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
        _client_id: &ClientId,
        _client_state: &ClientState,
        header: &Header,
    ) -> Result<(), Error> {
        if header.height != ctx.host_height() {
            return Err(Error::invalid_header(format!(
                "loopback header height {} is not the host height {}",
                header.height,
                ctx.host_height()
            )));
        }
        Ok(())
    }

    fn check_for_misbehaviour_on_header(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        _header: &Header,
    ) -> Result<bool, Error> {
        Ok(false)
    }

    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: ClientState,
        header: Header,
    ) -> Result<(ClientState, ConsensusState), Error> {
        let client_state = ClientState {
            latest_height: header.height,
            ..client_state
        };
        Ok((client_state, ConsensusState::new(ctx.host_timestamp())))
    }

    fn verify_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        misbehaviour: &Infallible,
    ) -> Result<(), Error> {
        match *misbehaviour {}
    }

    fn check_for_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        misbehaviour: &Infallible,
    ) -> Result<bool, Error> {
        match *misbehaviour {}
    }

    fn update_state_on_misbehaviour(
        &self,
        _client_state: ClientState,
        _height: Height,
    ) -> Result<ClientState, Error> {
        Err(Error::invalid_misbehaviour(
            "the loopback client cannot be frozen".to_string(),
        ))
    }

    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        _height: Height,
        _prefix: &CommitmentPrefix,
        _proof: &CommitmentProofBytes,
        path: &Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        match ctx.host_store_value(path) {
            Some(stored) if stored == value => Ok(()),
            _ => Err(Error::invalid_proof(Ics23Error::verification_failure())),
        }
    }

    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &ClientState,
        _height: Height,
        _prefix: &CommitmentPrefix,
        _proof: &CommitmentProofBytes,
        path: &Path,
    ) -> Result<(), Error> {
        match ctx.host_store_value(path) {
            None => Ok(()),
            Some(_) => Err(Error::invalid_proof(Ics23Error::verification_failure())),
        }
    }

    fn check_substitution_allowed(
        &self,
        _ctx: &dyn ClientReader,
        subject_id: &ClientId,
        _subject: &ClientState,
    ) -> Result<(), Error> {
        Err(Error::update_client_failed(format!(
            "loopback client {} cannot be substituted",
            subject_id
        )))
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_id: &ClientId,
        subject: ClientState,
        _substitute_id: &ClientId,
        _substitute: ClientState,
    ) -> Result<(ClientState, ConsensusState), Error> {
        self.check_substitution_allowed(ctx, subject_id, &subject)?;
        Err(Error::update_client_failed(format!(
            "loopback client {} cannot be substituted",
            subject_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics02_client::client_state::{AnyClientState, ClientState as _};
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::error::ErrorDetail;
    use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
    use crate::core::ics02_client::msgs::ClientMsg;
    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics24_host::identifier::ConnectionId;
    use crate::mock::context::MockContext;
    use crate::test_utils::get_dummy_connection_end;

    fn any_proof() -> CommitmentProofBytes {
        CommitmentProofBytes::try_from(vec![0]).unwrap()
    }

    #[test]
    fn follows_the_host_height() {
        let client_id = ClientId::new(ClientType::Localhost, 0).unwrap();
        let mut ctx = MockContext::default().with_localhost_client(&client_id);
        ctx.advance_host_chain_height();
        ctx.advance_host_chain_height();

        let stale = Header {
            height: Height::new(1, 6),
            timestamp: ctx.host_timestamp(),
        };
        let msg = MsgUpdateClient::new(client_id.clone(), stale.into());
        let res = ctx.deliver(ClientMsg::UpdateClient(msg).into());
        assert!(res.is_err());

        let current = Header {
            height: ctx.host_height(),
            timestamp: ctx.host_timestamp(),
        };
        let msg = MsgUpdateClient::new(client_id.clone(), current.into());
        ctx.deliver(ClientMsg::UpdateClient(msg).into()).unwrap();

        match ctx.client_state(&client_id).unwrap() {
            AnyClientState::Localhost(cs) => assert_eq!(cs.latest_height(), Height::new(1, 7)),
            other => panic!("unexpected client state {:?}", other),
        }
    }

    #[test]
    fn proofs_are_reads_of_the_host_store() {
        let conn_id = ConnectionId::new(0);
        let conn = get_dummy_connection_end(ConnectionState::Init);
        let ctx = MockContext::default().with_connection(conn_id.clone(), conn.clone());

        let client_state = ClientState::new(ctx.host_chain_id().clone(), ctx.host_height());
        let client_id = ClientId::new(ClientType::Localhost, 0).unwrap();
        let prefix = CommitmentPrefix::default();
        let client = LocalhostClient;

        let path = Path::Connections(conn_id);
        client
            .verify_membership(
                &ctx,
                &client_id,
                &client_state,
                ctx.host_height(),
                &prefix,
                &any_proof(),
                &path,
                conn.encode_vec(),
            )
            .unwrap();

        let res = client.verify_non_membership(
            &ctx,
            &client_id,
            &client_state,
            ctx.host_height(),
            &prefix,
            &any_proof(),
            &path,
        );
        assert!(matches!(res, Err(Error(ErrorDetail::InvalidProof(_), _))));

        let absent = Path::Connections(ConnectionId::new(5));
        client
            .verify_non_membership(
                &ctx,
                &client_id,
                &client_state,
                ctx.host_height(),
                &prefix,
                &any_proof(),
                &absent,
            )
            .unwrap();
    }

    #[test]
    fn cannot_be_frozen_or_substituted() {
        let ctx = MockContext::default();
        let client_state = ClientState::new(ctx.host_chain_id().clone(), ctx.host_height());
        let client_id = ClientId::new(ClientType::Localhost, 0).unwrap();

        let client = LocalhostClient;
        assert!(client
            .update_state_on_misbehaviour(client_state.clone(), ctx.host_height())
            .is_err());

        let res = client.check_substitute_and_update_state(
            &ctx,
            &client_id,
            client_state.clone(),
            &client_id,
            client_state,
        );
        assert!(matches!(res, Err(Error(ErrorDetail::UpdateClientFailed(_), _))));
    }
}
