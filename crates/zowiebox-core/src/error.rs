// ── Core error types ──
//
// User-facing errors from zowiebox-core. Consumers never see raw reqwest
// failures — the `From<zowiebox_api::Error>` impl translates transport
// errors into domain-appropriate variants. A request the *device* rejects
// is not an error anywhere in this workspace; rejections travel as
// `ActionOutcome::Rejected` values.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device at {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    /// No client has been constructed (comms disabled or never started).
    #[error("Not connected to a device")]
    NotConnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device response was malformed: {message}")]
    MalformedResponse { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<zowiebox_api::Error> for CoreError {
    fn from(err: zowiebox_api::Error) -> Self {
        match err {
            zowiebox_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                host: e
                    .url()
                    .map(|u| u.host_str().unwrap_or_default().to_owned())
                    .unwrap_or_default(),
                reason: e.to_string(),
            },
            zowiebox_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            zowiebox_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
