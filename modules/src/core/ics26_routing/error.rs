use flex_error::define_error;

use crate::core::ics02_client;
use crate::core::ics03_connection;
use crate::core::ics04_channel;
use crate::core::ics05_port;
use crate::core::ics26_routing::context::ModuleId;

define_error! {
    #[derive(Debug)]
    Error {
        Ics02Client
            [ ics02_client::error::Error ]
            | _ | { "ICS02 client error" },

        Ics03Connection
            [ ics03_connection::error::Error ]
            | _ | { "ICS03 connection error" },

        Ics04Channel
            [ ics04_channel::error::Error ]
            | _ | { "ICS04 channel error" },

        Ics05Port
            [ ics05_port::error::Error ]
            | _ | { "ICS05 port error" },

        UnknownModule
            { module_id: ModuleId }
            | e | { format_args!("no module is routed under '{0}'", e.module_id) },
    }
}
