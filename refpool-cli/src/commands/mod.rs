//! Subcommand implementations.

pub mod allocate;
pub mod fetch;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime};

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, String> {
    if let Ok(timestamp) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(timestamp);
    }
    Date::parse(s, &Iso8601::DATE)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| format!("expected an RFC 3339 timestamp or a date, got {:?}", s))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {:?}", path))
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {:?}", path))?;
    tracing::info!(path = ?path, "Wrote output file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2025-05-01T00:00:00Z").unwrap();
        assert_eq!(ts.unix_timestamp(), 1746057600);

        let offset = parse_timestamp("2025-05-01T02:00:00+02:00").unwrap();
        assert_eq!(offset.unix_timestamp(), 1746057600);

        let date = parse_timestamp("2025-05-01").unwrap();
        assert_eq!(date.unix_timestamp(), 1746057600);

        assert!(parse_timestamp("yesterday").is_err());
    }
}
