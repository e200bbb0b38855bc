//! Object capabilities handed out to application modules.
//!
//! A [`Capability`] is an opaque token. Only the engine can mint one, so a
//! module that holds the token for a port or channel is the module the engine
//! granted it to.

use core::fmt::{Display, Error as FmtError, Formatter};

use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics24_host::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capability {
    index: u64,
}

impl Capability {
    pub(crate) fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u64 {
        self.index
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "capability-{}", self.index)
    }
}

/// The key under which a capability is owned.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityName(String);

impl CapabilityName {
    /// `ports/{port_id}`
    pub fn port(port_id: &PortId) -> Self {
        Self(Path::Ports(port_id.clone()).to_string())
    }

    /// `capabilities/ports/{port_id}/channels/{channel_id}`
    pub fn channel(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self(format!(
            "capabilities/ports/{}/channels/{}",
            port_id, channel_id
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CapabilityName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn capability_names() {
        let port_id = PortId::transfer();
        assert_eq!(CapabilityName::port(&port_id).as_str(), "ports/transfer");
        assert_eq!(
            CapabilityName::channel(&port_id, &ChannelId::new(4)).to_string(),
            "capabilities/ports/transfer/channels/channel-4"
        );
    }
}
