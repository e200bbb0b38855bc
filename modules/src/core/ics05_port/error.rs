use flex_error::define_error;

use crate::core::ics05_port::capabilities::CapabilityName;
use crate::core::ics24_host::identifier::PortId;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        UnknownPort
            { port_id: PortId }
            | e | { format_args!("port '{0}' is unknown", e.port_id) },

        PortAlreadyBound
            { port_id: PortId }
            | e | { format_args!("port '{0}' is already bound", e.port_id) },

        ModuleNotFound
            { port_id: PortId }
            | e | { format_args!("could not retrieve module from port '{0}'", e.port_id) },

        CapabilityNotFound
            { name: CapabilityName }
            | e | { format_args!("no capability is owned under '{0}'", e.name) },

        CapabilityAlreadyTaken
            { name: CapabilityName }
            | e | { format_args!("a capability is already owned under '{0}'", e.name) },

        InvalidCapability
            { name: CapabilityName }
            | e | { format_args!("the capability presented for '{0}' is not the one granted", e.name) },
    }
}
