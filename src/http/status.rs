//! Classification of HTTP failures into user-facing network errors.
//!
//! Nothing is retried: every failure is surfaced to the caller once, with a
//! hint when the status code suggests a fix.

use reqwest::StatusCode;

use crate::error::HvmError;

/// Maps a failed status code to a network error with a corrective hint.
pub fn classify_status(status: StatusCode, url: &str) -> HvmError {
    let detail = match status {
        StatusCode::UNAUTHORIZED => {
            "authentication failed; check the configured GitHub token".to_string()
        }
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            "GitHub API rate limit exceeded or access forbidden; try again later or configure a GitHub token (githubToken / HVM_GITHUBTOKEN)".to_string()
        }
        StatusCode::NOT_FOUND => "the requested resource was not found".to_string(),
        s if s.is_client_error() => format!("request rejected with HTTP {}", s.as_u16()),
        s => format!("server responded with HTTP {}", s.as_u16()),
    };
    HvmError::Network(format!("{} ({})", detail, url))
}

/// Maps a transport error (connect, TLS, body decode) to a network error.
pub fn classify_transport(error: &reqwest::Error, url: &str) -> HvmError {
    if let Some(status) = error.status() {
        return classify_status(status, url);
    }
    HvmError::Network(format!("{} ({})", error, url))
}
