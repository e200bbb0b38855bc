//! Implementation of mocks for context, host chain, application module and store.

pub mod context;
pub mod host;
pub mod module;
pub mod store;
