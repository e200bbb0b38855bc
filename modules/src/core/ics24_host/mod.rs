//! ICS 24: Host Requirements. Identifier validation, store paths and the
//! provable-store contract the rest of the engine is written against.

pub mod error;
pub mod identifier;
pub mod path;
pub mod store;
pub mod validate;
