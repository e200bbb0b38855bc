//! An application module that accepts every handshake and acknowledges every
//! packet, remembering what it was handed.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::ics04_channel::channel::{Counterparty, Order};
use crate::core::ics04_channel::commitment::Acknowledgement;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::Packet;
use crate::core::ics04_channel::version::Version;
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::core::ics26_routing::context::{Module, ModuleId, ModuleOutputBuilder, Router};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockModule {
    reject_handshakes: bool,
    pub received: Vec<Packet>,
    pub acknowledged: Vec<(Packet, Acknowledgement)>,
    pub timed_out: Vec<Packet>,
}

impl MockModule {
    /// A module that vetoes every channel handshake step.
    pub fn rejecting() -> Self {
        Self {
            reject_handshakes: true,
            ..Self::default()
        }
    }

    fn check_handshake(&self, step: &str, port_id: &PortId) -> Result<(), Error> {
        if self.reject_handshakes {
            return Err(Error::app_module(format!(
                "{} refused on port {}",
                step, port_id
            )));
        }
        Ok(())
    }
}

impl Module for MockModule {
    fn on_chan_open_init(
        &mut self,
        output: &mut ModuleOutputBuilder,
        _order: Order,
        _connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        _counterparty: &Counterparty,
        _version: &Version,
    ) -> Result<(), Error> {
        self.check_handshake("channel open init", port_id)?;
        output.log(format!("mock module: init {}/{}", port_id, channel_id));
        Ok(())
    }

    fn on_chan_open_try(
        &mut self,
        output: &mut ModuleOutputBuilder,
        _order: Order,
        _connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        _counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<Version, Error> {
        self.check_handshake("channel open try", port_id)?;
        output.log(format!("mock module: try {}/{}", port_id, channel_id));
        Ok(counterparty_version.clone())
    }

    fn on_chan_open_ack(
        &mut self,
        _output: &mut ModuleOutputBuilder,
        port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty_version: &Version,
    ) -> Result<(), Error> {
        self.check_handshake("channel open ack", port_id)
    }

    fn on_chan_open_confirm(
        &mut self,
        _output: &mut ModuleOutputBuilder,
        port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Result<(), Error> {
        self.check_handshake("channel open confirm", port_id)
    }

    fn on_recv_packet(
        &mut self,
        output: &mut ModuleOutputBuilder,
        packet: &Packet,
    ) -> Acknowledgement {
        debug!("mock module received packet {}", packet);
        output.log(format!("mock module: received packet {}", packet.sequence));
        self.received.push(packet.clone());
        Acknowledgement::success()
    }

    fn on_acknowledgement_packet(
        &mut self,
        _output: &mut ModuleOutputBuilder,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
    ) -> Result<(), Error> {
        self.acknowledged
            .push((packet.clone(), acknowledgement.clone()));
        Ok(())
    }

    fn on_timeout_packet(
        &mut self,
        _output: &mut ModuleOutputBuilder,
        packet: &Packet,
    ) -> Result<(), Error> {
        self.timed_out.push(packet.clone());
        Ok(())
    }
}

/// Routes by module id. Cloned along with the context, so a rolled back
/// message also rolls back what the modules recorded.
#[derive(Clone, Debug, Default)]
pub struct MockRouter(BTreeMap<ModuleId, MockModule>);

impl MockRouter {
    pub fn add_route(&mut self, module_id: ModuleId, module: MockModule) {
        self.0.insert(module_id, module);
    }

    pub fn module(&self, module_id: &ModuleId) -> Option<&MockModule> {
        self.0.get(module_id)
    }
}

impl Router for MockRouter {
    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module> {
        match self.0.get_mut(module_id) {
            Some(m) => Some(m),
            None => None,
        }
    }

    fn has_route(&self, module_id: &ModuleId) -> bool {
        self.0.contains_key(module_id)
    }
}
