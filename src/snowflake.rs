//! Snowflake identifier helpers
//!
//! Provider identifiers are 64-bit integers transmitted as strings. The top
//! 42 bits hold milliseconds since the provider epoch.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{NetcordError, Result};

/// First millisecond of 2015, the provider's snowflake epoch.
pub const PROVIDER_EPOCH_MS: i64 = 1_420_070_400_000;

/// Parses a snowflake string into its numeric value.
pub fn parse(id: &str) -> Result<u64> {
    id.trim()
        .parse::<u64>()
        .map_err(|e| NetcordError::InvalidRequest(format!("invalid snowflake {:?}: {}", id, e)))
}

/// Unix timestamp in milliseconds at which `id` was generated.
///
/// # Examples
///
/// ```
/// assert_eq!(
///     netcord::snowflake::timestamp_millis("175928847299117063").unwrap(),
///     1_462_015_105_796
/// );
/// ```
pub fn timestamp_millis(id: &str) -> Result<i64> {
    let raw = parse(id)?;
    Ok((raw >> 22) as i64 + PROVIDER_EPOCH_MS)
}

/// Creation time embedded in `id`.
pub fn timestamp(id: &str) -> Result<DateTime<Utc>> {
    let millis = timestamp_millis(id)?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| NetcordError::InvalidRequest(format!("snowflake {} is out of range", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_of_known_id() {
        let created = timestamp("175928847299117063").unwrap();
        assert_eq!(created.timestamp_millis(), 1_462_015_105_796);
    }

    #[test]
    fn test_zero_is_epoch() {
        assert_eq!(timestamp_millis("0").unwrap(), PROVIDER_EPOCH_MS);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(matches!(
            timestamp("not-a-snowflake"),
            Err(NetcordError::InvalidRequest(_))
        ));
    }
}
