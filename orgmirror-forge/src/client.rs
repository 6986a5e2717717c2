//! Shared `ureq` agent construction with a consistent User-Agent header.

use std::time::Duration;

/// Timeout for read-only diagnostic calls.
pub const DIAGNOSTIC_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for listing and mutating calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build a blocking agent with the standard User-Agent and an overall
/// per-request timeout.
pub fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(&user_agent())
        .build()
}

/// `orgmirror/{version}`
pub fn user_agent() -> String {
    format!("orgmirror/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_has_name_and_version() {
        let ua = user_agent();
        let parts: Vec<&str> = ua.split('/').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "orgmirror");
        assert!(!parts[1].is_empty());
    }
}
