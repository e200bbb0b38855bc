//! ICS 23: Vector Commitment Scheme. A sparse Merkle tree over ICS-24 paths,
//! the proofs it produces, and the byte wrappers handshakes carry them in.

pub mod commitment;
pub mod error;
pub mod merkle;
