use crate::core::ics05_port::capabilities::{Capability, CapabilityName};
use crate::core::ics05_port::error::Error;
use crate::core::ics24_host::identifier::PortId;
use crate::core::ics26_routing::context::ModuleId;

/// Read-only access to the capabilities the host has minted.
pub trait CapabilityReader {
    /// Fetch the capability owned under `name`.
    fn get_capability(&self, name: &CapabilityName) -> Result<Capability, Error>;

    /// Check that `capability` is the token owned under `name`.
    fn authenticate_capability(
        &self,
        name: &CapabilityName,
        capability: &Capability,
    ) -> Result<(), Error> {
        let owned = self.get_capability(name)?;
        if &owned == capability {
            Ok(())
        } else {
            Err(Error::invalid_capability(name.clone()))
        }
    }
}

pub trait CapabilityKeeper {
    /// Mint a capability under `name`. Fails if the name is already taken.
    fn new_capability(&mut self, name: CapabilityName) -> Result<Capability, Error>;

    fn release_capability(&mut self, name: &CapabilityName);
}

/// A context supplying all the necessary read-only dependencies for processing any information regarding a port.
pub trait PortReader: CapabilityReader {
    /// Return the module bound to `port_id` along with the port capability.
    fn lookup_module_by_port(&self, port_id: &PortId) -> Result<(ModuleId, Capability), Error>;

    fn is_bound(&self, port_id: &PortId) -> bool {
        self.get_capability(&CapabilityName::port(port_id)).is_ok()
    }
}

pub trait PortKeeper: CapabilityKeeper + PortReader {
    /// Binds `module_id` to `port_id` and returns the port capability.
    fn bind_port(&mut self, port_id: PortId, module_id: ModuleId) -> Result<Capability, Error> {
        if self.is_bound(&port_id) {
            return Err(Error::port_already_bound(port_id));
        }

        let capability = self.new_capability(CapabilityName::port(&port_id))?;
        self.store_module_by_port(port_id, module_id)?;
        Ok(capability)
    }

    fn store_module_by_port(&mut self, port_id: PortId, module_id: ModuleId) -> Result<(), Error>;
}
