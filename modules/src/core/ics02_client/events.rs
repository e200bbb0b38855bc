//! Types for the IBC events emitted by the client module.

use serde_derive::Serialize;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::height::Height;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Host height at which the event happened.
    pub height: Height,
    pub client_id: ClientId,
    pub client_type: ClientType,
    pub consensus_height: Height,
}

impl core::fmt::Display for Attributes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "h: {}, cs_h: {}({})",
            self.height, self.client_id, self.consensus_height
        )
    }
}

macro_rules! client_event {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
        pub struct $name(pub Attributes);

        impl $name {
            pub fn client_id(&self) -> &ClientId {
                &self.0.client_id
            }
            pub fn height(&self) -> Height {
                self.0.height
            }
            pub fn consensus_height(&self) -> Height {
                self.0.consensus_height
            }
        }

        impl From<Attributes> for $name {
            fn from(attrs: Attributes) -> Self {
                $name(attrs)
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$name(v)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
                write!(f, "{}", self.0)
            }
        }
    };
}

client_event!(
    /// CreateClient event signals the creation of a new on-chain client (IBC client).
    CreateClient
);

client_event!(
    /// UpdateClient event signals a recent update of an on-chain client (IBC Client).
    UpdateClient
);

client_event!(
    /// ClientMisbehaviour event signals the freezing of an on-chain client.
    ClientMisbehaviour
);

/// SubstituteClient event signals that governance replaced the trust
/// material of a client with that of another one.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SubstituteClient {
    pub common: Attributes,
    pub substitute_client_id: ClientId,
}

impl SubstituteClient {
    pub fn client_id(&self) -> &ClientId {
        &self.common.client_id
    }
    pub fn height(&self) -> Height {
        self.common.height
    }
}

impl From<SubstituteClient> for IbcEvent {
    fn from(v: SubstituteClient) -> Self {
        IbcEvent::SubstituteClient(v)
    }
}

impl core::fmt::Display for SubstituteClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{} <- {}", self.common, self.substitute_client_id)
    }
}
