//! ICS 09: Loopback client. Lets two modules on the same chain talk over
//! IBC; every proof is a direct read of the host's own store.

pub mod client_def;
pub mod client_state;
pub mod consensus_state;
pub mod header;
