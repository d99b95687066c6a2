//! Validation helpers for raw configuration values.

use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::model::LogFormatPreference;

/// Parse a listener port in the range `1..=65535`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an integer or is zero.
pub fn parse_port(field: &'static str, raw: &str) -> ConfigResult<u16> {
    let port = raw
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::invalid(field, raw, "not_a_port"))?;
    if port == 0 {
        return Err(ConfigError::invalid(field, raw, "zero"));
    }
    Ok(port)
}

/// Parse an IP address for the listener.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an IP address.
pub fn parse_ip(field: &'static str, raw: &str) -> ConfigResult<IpAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, raw, "not_an_ip_address"))
}

/// Parse a non-empty filesystem path.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is blank.
pub fn parse_path(field: &'static str, raw: &str) -> ConfigResult<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(field, raw, "empty"));
    }
    Ok(PathBuf::from(trimmed))
}

/// Parse a strictly positive number of seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a positive integer.
pub fn parse_seconds(field: &'static str, raw: &str) -> ConfigResult<Duration> {
    parse_positive::<u64>(field, raw).map(Duration::from_secs)
}

/// Parse a strictly positive byte count.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a positive integer.
pub fn parse_bytes(field: &'static str, raw: &str) -> ConfigResult<usize> {
    parse_positive::<usize>(field, raw)
}

/// Parse a log format selector (`json` or `pretty`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for any other value.
pub fn parse_log_format(field: &'static str, raw: &str) -> ConfigResult<LogFormatPreference> {
    raw.parse()
        .map_err(|()| ConfigError::invalid(field, raw, "unknown_log_format"))
}

fn parse_positive<T>(field: &'static str, raw: &str) -> ConfigResult<T>
where
    T: FromStr + PartialEq + Default,
{
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::invalid(field, raw, "not_an_integer"))?;
    if value == T::default() {
        return Err(ConfigError::invalid(field, raw, "zero"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_of(err: &ConfigError) -> &'static str {
        let ConfigError::InvalidField { reason, .. } = err;
        *reason
    }

    #[test]
    fn parse_port_rejects_zero_and_overflow() {
        assert_eq!(parse_port("port", "8080").ok(), Some(8080));
        assert_eq!(parse_port("port", " 443 ").ok(), Some(443));

        let zero = parse_port("port", "0").expect_err("zero should fail");
        assert_eq!(reason_of(&zero), "zero");

        let overflow = parse_port("port", "70000").expect_err("overflow should fail");
        assert_eq!(reason_of(&overflow), "not_a_port");
    }

    #[test]
    fn parse_ip_accepts_v4_and_v6() {
        assert!(parse_ip("addr", "127.0.0.1").is_ok());
        assert!(parse_ip("addr", "::1").is_ok());
        let err = parse_ip("addr", "localhost").expect_err("hostname should fail");
        assert_eq!(reason_of(&err), "not_an_ip_address");
    }

    #[test]
    fn parse_path_rejects_blank_values() {
        assert_eq!(
            parse_path("dir", " /tmp/scratch ").ok(),
            Some(PathBuf::from("/tmp/scratch"))
        );
        let err = parse_path("dir", "   ").expect_err("blank should fail");
        assert_eq!(reason_of(&err), "empty");
    }

    #[test]
    fn parse_positive_numbers() {
        assert_eq!(
            parse_seconds("timeout", "30").ok(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(parse_bytes("limit", "1024").ok(), Some(1024));

        let zero = parse_seconds("timeout", "0").expect_err("zero should fail");
        assert_eq!(reason_of(&zero), "zero");
        let negative = parse_bytes("limit", "-5").expect_err("negative should fail");
        assert_eq!(reason_of(&negative), "not_an_integer");
    }

    #[test]
    fn parse_log_format_reports_unknown_values() {
        assert_eq!(
            parse_log_format("format", "json").ok(),
            Some(LogFormatPreference::Json)
        );
        let err = parse_log_format("format", "xml").expect_err("xml should fail");
        assert_eq!(reason_of(&err), "unknown_log_format");
    }
}
