//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5277                 # HTTP port number
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the endpoint reachable from the LAN.

use std::net::{IpAddr, Ipv4Addr};

use macros::Config;
use serde::{Deserialize, Serialize};

/// Asset endpoint server settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "serve")]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    #[config(inline_doc = "HTTP port number.")]
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5277,
        }
    }
}

impl ServeConfig {
    /// Origin the endpoint is reachable at, e.g. `http://127.0.0.1:5277/`.
    pub fn origin(&self) -> String {
        match self.interface {
            IpAddr::V4(ip) => format!("http://{ip}:{}/", self.port),
            IpAddr::V6(ip) => format!("http://[{ip}]:{}/", self.port),
        }
    }
}
