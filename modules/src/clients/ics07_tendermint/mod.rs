//! ICS 07: Validator-set light client. Tracks a BFT chain by checking that
//! enough of a trusted validator set signed each new block header.

pub mod client_def;
pub mod client_state;
pub mod consensus_state;
pub mod header;
pub mod misbehaviour;
pub mod validator;
