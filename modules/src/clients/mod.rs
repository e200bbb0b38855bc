//! Implementations of client verification algorithms for specific types of chains.

pub mod crypto;
pub mod ics06_solomachine;
pub mod ics07_tendermint;
pub mod ics09_localhost;
