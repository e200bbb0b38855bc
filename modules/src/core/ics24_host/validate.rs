use super::error::ValidationError as Error;

/// Path separator (ie. forward slash '/')
const PATH_SEPARATOR: char = '/';
const VALID_SPECIAL_CHARS: &str = "._+-#[]<>";

/// Default validator function for identifiers.
///
/// A valid identifier only contain lowercase alphabetic characters, and be of a given min and max
/// length.
pub fn validate_identifier(id: &str, min: usize, max: usize) -> Result<(), Error> {
    assert!(max >= min);

    if id.is_empty() {
        return Err(Error::empty());
    }

    if id.contains(PATH_SEPARATOR) {
        return Err(Error::contain_separator(id.to_string()));
    }

    if id.len() < min || id.len() > max {
        return Err(Error::invalid_length(id.to_string(), id.len(), min, max));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || VALID_SPECIAL_CHARS.contains(c))
    {
        return Err(Error::invalid_character(id.to_string()));
    }

    Ok(())
}

/// Checks that `id` is `{prefix}-{n}` with `n` a decimal counter.
fn validate_counter_suffix(id: &str, prefix: &str) -> Result<(), Error> {
    let counter = id
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| Error::invalid_prefix(id.to_string(), prefix.to_string()))?;

    if counter.is_empty() || !counter.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_prefix(id.to_string(), prefix.to_string()));
    }

    Ok(())
}

/// Default validator function for Client identifiers.
///
/// A valid identifier must be between 9-64 characters and only contain lowercase
/// alphabetic characters,
pub fn validate_client_identifier(id: &str) -> Result<(), Error> {
    validate_identifier(id, 9, 64)
}

/// Default validator function for Connection identifiers: `connection-{n}`.
pub fn validate_connection_identifier(id: &str) -> Result<(), Error> {
    validate_identifier(id, 10, 64)?;
    validate_counter_suffix(id, "connection")
}

/// Default validator function for Port identifiers.
///
/// A valid Identifier must be between 2-128 characters and only contain lowercase
/// alphabetic characters,
pub fn validate_port_identifier(id: &str) -> Result<(), Error> {
    validate_identifier(id, 2, 128)
}

/// Default validator function for Channel identifiers: `channel-{n}`.
pub fn validate_channel_identifier(id: &str) -> Result<(), Error> {
    validate_identifier(id, 8, 64)?;
    validate_counter_suffix(id, "channel")
}

#[cfg(test)]
mod tests {
    use crate::core::ics24_host::validate::{
        validate_channel_identifier, validate_client_identifier, validate_connection_identifier,
        validate_identifier, validate_port_identifier,
    };
    use test_log::test;

    #[test]
    fn parse_invalid_port_id_min() {
        // invalid min port id
        let id = validate_port_identifier("p");
        assert!(id.is_err())
    }

    #[test]
    fn parse_invalid_port_id_max() {
        // invalid max port id (test string length is 130 chars)
        let id = validate_port_identifier(
            "9anxkcme6je544d5lnj46zqiiiygfqzf8w4bjecbnyj4lj6s7zlpst67yln64tixp9anxkcme6je544d5lnj46zqiiiygfqzf8w4bjecbnyj4lj6s7zlpst67yln64tixp",
        );
        assert!(id.is_err())
    }

    #[test]
    fn parse_non_ascii_port_id() {
        assert!(validate_port_identifier("pört").is_err());
        assert!(validate_identifier("chännel", 2, 64).is_err());
    }

    #[test]
    fn parse_valid_port_id() {
        assert!(validate_port_identifier("transfer").is_ok());
        assert!(validate_port_identifier("ica.host[1]").is_ok());
    }

    #[test]
    fn parse_connection_ids() {
        assert!(validate_connection_identifier("connection-0").is_ok());
        assert!(validate_connection_identifier("connection-42").is_ok());
        assert!(validate_connection_identifier("connection-").is_err());
        assert!(validate_connection_identifier("connection-x1").is_err());
        assert!(validate_connection_identifier("conn-1").is_err());
    }

    #[test]
    fn parse_channel_ids() {
        assert!(validate_channel_identifier("channel-7").is_ok());
        assert!(validate_channel_identifier("channel7").is_err());
        assert!(validate_channel_identifier("chan/nel-7").is_err());
    }

    #[test]
    fn parse_invalid_client_id_min() {
        // invalid min client id
        let id = validate_client_identifier("client");
        assert!(id.is_err())
    }

    #[test]
    fn parse_client_id_with_separator() {
        assert!(validate_client_identifier("07-tender/mint-0").is_err());
    }

    #[test]
    fn parse_invalid_id_chars() {
        // invalid id chars
        let id = validate_identifier("channel@01", 1, 10);
        assert!(id.is_err())
    }

    #[test]
    fn parse_invalid_id_empty() {
        // invalid id empty
        let id = validate_identifier("", 1, 10);
        assert!(id.is_err())
    }
}
