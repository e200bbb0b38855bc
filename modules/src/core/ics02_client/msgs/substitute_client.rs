use crate::core::ics24_host::identifier::ClientId;

/// Asks to replace the trust material of `subject_client_id` with that of
/// `substitute_client_id`. Only ever issued by the host's governance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgSubstituteClient {
    pub subject_client_id: ClientId,
    pub substitute_client_id: ClientId,
}
