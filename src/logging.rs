use anyhow::anyhow;
use tracing::Level;

pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Maps a configured level name (or its numeric value) to a tracing level.
///
/// Accepts the Python `logging` names and numbers the function has always been
/// configured with, e.g. `WARNING`, `CRITICAL` or `10`.
pub fn parse_log_level(value: &str) -> Option<Level> {
    let level = match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "NOTSET" | "0" => Level::TRACE,
        "DEBUG" | "10" => Level::DEBUG,
        "INFO" | "20" => Level::INFO,
        "WARN" | "WARNING" | "30" => Level::WARN,
        "ERROR" | "CRITICAL" | "FATAL" | "40" | "50" => Level::ERROR,
        _ => return None,
    };
    Some(level)
}

/// Installs the global fmt subscriber and returns the effective level.
///
/// Timestamps and targets are left out, CloudWatch records the ingestion time.
pub fn init(configured: &str) -> anyhow::Result<Level> {
    let level = parse_log_level(configured);

    tracing_subscriber::fmt()
        .with_max_level(level.unwrap_or(DEFAULT_LEVEL))
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    if level.is_none() {
        tracing::warn!("Invalid LOG_LEVEL {configured:?}, using {DEFAULT_LEVEL}");
    }

    Ok(level.unwrap_or(DEFAULT_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_levels() {
        assert_eq!(parse_log_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_log_level("info"), Some(Level::INFO));
        assert_eq!(parse_log_level("WARNING"), Some(Level::WARN));
        assert_eq!(parse_log_level("Warn"), Some(Level::WARN));
        assert_eq!(parse_log_level("CRITICAL"), Some(Level::ERROR));
        assert_eq!(parse_log_level("NOTSET"), Some(Level::TRACE));
        assert_eq!(parse_log_level(" error "), Some(Level::ERROR));
    }

    #[test]
    fn parses_numeric_levels() {
        assert_eq!(parse_log_level("10"), Some(Level::DEBUG));
        assert_eq!(parse_log_level("30"), Some(Level::WARN));
        assert_eq!(parse_log_level("50"), Some(Level::ERROR));
    }

    #[test]
    fn rejects_unknown_levels() {
        assert_eq!(parse_log_level("verbose"), None);
        assert_eq!(parse_log_level("15"), None);
        assert_eq!(parse_log_level(""), None);
    }
}
