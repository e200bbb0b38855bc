//! This module implements the processing logic for ICS2 (client abstractions and functions) msgs.

use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::msgs::ClientMsg;
use crate::handler::HandlerResult;

pub mod create_client;
pub mod misbehaviour;
pub mod substitute_client;
pub mod update_client;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientResult {
    Create(create_client::Result),
    Update(update_client::Result),
    Misbehaviour(misbehaviour::Result),
    Substitute(substitute_client::Result),
}

/// General entry point for processing any message related to ICS2 (client functions) protocols.
pub fn dispatch<Ctx>(ctx: &Ctx, msg: ClientMsg) -> HandlerResult<ClientResult, Error>
where
    Ctx: ClientReader,
{
    match msg {
        ClientMsg::CreateClient(msg) => create_client::process(ctx, msg),
        ClientMsg::UpdateClient(msg) => update_client::process(ctx, msg),
        ClientMsg::Misbehaviour(msg) => misbehaviour::process(ctx, msg),
    }
}
