//! Types for the IBC events emitted by the connection handshake handlers.

use serde_derive::{Deserialize, Serialize};

use crate::core::ics02_client::height::Height;
use crate::core::ics24_host::identifier::{ClientId, ConnectionId};
use crate::events::IbcEvent;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attributes {
    pub height: Height,
    pub connection_id: Option<ConnectionId>,
    pub client_id: ClientId,
    pub counterparty_connection_id: Option<ConnectionId>,
    pub counterparty_client_id: ClientId,
}

impl core::fmt::Display for Attributes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        match &self.connection_id {
            Some(connection_id) => write!(
                f,
                "h: {}, conn: {} on {}, counterparty client: {}",
                self.height, connection_id, self.client_id, self.counterparty_client_id
            ),
            None => write!(
                f,
                "h: {}, client: {}, counterparty client: {}",
                self.height, self.client_id, self.counterparty_client_id
            ),
        }
    }
}

macro_rules! connection_event {
    ($name:ident, $variant:ident) => {
        #[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
        pub struct $name(Attributes);

        impl $name {
            pub fn attributes(&self) -> &Attributes {
                &self.0
            }
            pub fn connection_id(&self) -> Option<&ConnectionId> {
                self.0.connection_id.as_ref()
            }
            pub fn height(&self) -> Height {
                self.0.height
            }
            pub fn set_height(&mut self, height: Height) {
                self.0.height = height;
            }
        }

        impl From<Attributes> for $name {
            fn from(attrs: Attributes) -> Self {
                $name(attrs)
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$variant(v)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
                write!(f, "{}", self.0)
            }
        }
    };
}

connection_event!(OpenInit, OpenInitConnection);
connection_event!(OpenTry, OpenTryConnection);
connection_event!(OpenAck, OpenAckConnection);
connection_event!(OpenConfirm, OpenConfirmConnection);
