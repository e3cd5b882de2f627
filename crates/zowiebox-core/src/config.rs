// ── Runtime device configuration ──
//
// The host runtime constructs a `DeviceConfig` and hands it in; core
// never reads config files. Changing either field goes through
// `Controller::update_config`, which reconstructs the transport client
// and re-runs the connection check.

use std::net::{IpAddr, SocketAddr};

use crate::error::CoreError;

/// Configuration for one ZowieBox appliance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Device address, IPv4 or IPv6, with an optional port.
    pub host: String,
    /// Administrative communications gate. When false, no network I/O
    /// happens at all and the instance reports `Disconnected`.
    pub enable_coms: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            enable_coms: false,
        }
    }
}

impl DeviceConfig {
    /// Validate the configured address.
    pub fn validate(&self) -> Result<(), CoreError> {
        if is_valid_host(&self.host) {
            Ok(())
        } else {
            Err(CoreError::Config {
                message: format!("invalid device address: {:?}", self.host),
            })
        }
    }
}

/// Whether `host` parses as an IPv4 or IPv6 address, optionally with a
/// port (`192.168.1.88`, `192.168.1.88:8080`, `[::1]:8080`).
pub fn is_valid_host(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok() || host.parse::<SocketAddr>().is_ok()
}
