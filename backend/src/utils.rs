use crate::error::ApiError;
use std::time::Duration;

pub fn parse_voter_id(id: &str) -> Result<u64, ApiError> {
    id.parse().map_err(|_| ApiError::InvalidId("voter"))
}

pub fn parse_poll_id(id: &str) -> Result<u64, ApiError> {
    id.parse().map_err(|_| ApiError::InvalidId("poll"))
}

/// Whole seconds as `1h2m3s`, `2m3s` or `3s`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m{seconds}s"),
        _ => format!("{hours}h{minutes}m{seconds}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_unsigned() {
        assert_eq!(parse_voter_id("17").unwrap(), 17);
        assert!(matches!(parse_voter_id("-1"), Err(ApiError::InvalidId("voter"))));
        assert!(matches!(parse_poll_id("abc"), Err(ApiError::InvalidId("poll"))));
    }

    #[test]
    fn uptime_layout() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0s");
        assert_eq!(format_uptime(Duration::from_millis(59_900)), "59s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m5s");
        assert_eq!(format_uptime(Duration::from_secs(3600)), "1h0m0s");
    }
}
