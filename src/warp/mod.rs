//! Cloudflare WARP endpoint discovery support
//!
//! WARP deployments can select their endpoint by active latency probing
//! instead of static configuration: the `warp_auto` sentinel in the peer's
//! `server` field requests a scan across known WARP address ranges, keeping
//! the lowest-RTT candidate. The scan itself is an external collaborator
//! behind the [`EndpointScanner`] trait; this module carries the provider
//! constants, the scan parameter block, and the gate that refuses discovery
//! mode for any key other than Cloudflare's.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::*;

use crate::error::BoxError;

/// Cloudflare WARP server public key (base64)
pub const WARP_PUBLIC_KEY: &str = "bmXOC+F1FxEMF9dyiK2H5/1SUtzH0JuVo51h2wPfgyo=";

/// Sentinel `server` value selecting endpoint discovery
pub const DISCOVERY_SENTINEL: &str = "warp_auto";

/// Default WARP UDP port
pub const DEFAULT_WARP_PORT: u16 = 2408;

/// Per-candidate probe budget used by the builder
pub const SCAN_MAX_RTT: Duration = Duration::from_millis(500);

/// Parameters for one endpoint scan
#[derive(Debug, Clone)]
pub struct WarpScanOptions {
    /// Local private key (base64), needed for handshake probes
    pub private_key: String,
    /// Provider public key (base64)
    pub public_key: String,
    /// Per-candidate round-trip budget
    pub max_rtt: Duration,
    /// Probe IPv4 candidates
    pub v4: bool,
    /// Probe IPv6 candidates
    pub v6: bool,
    /// Destination port for every candidate
    pub port: u16,
}

impl WarpScanOptions {
    /// Fixed probe budget the builder uses: both address families, 500ms
    /// per candidate, targeting the given port.
    #[must_use]
    pub fn for_port(private_key: &str, port: u16) -> Self {
        Self {
            private_key: private_key.to_string(),
            public_key: WARP_PUBLIC_KEY.to_string(),
            max_rtt: SCAN_MAX_RTT,
            v4: true,
            v6: true,
            port,
        }
    }
}

/// Endpoint discovery collaborator
///
/// Implementations perform a best-effort network probe and return the
/// lowest-latency reachable endpoint. Cancellation is owned by the
/// implementation (typically tied to process interrupt signals); this crate
/// never retries a failed scan.
#[async_trait]
pub trait EndpointScanner: Send + Sync {
    /// Probe candidate endpoints and return the best one
    ///
    /// # Errors
    ///
    /// Returns an implementation-defined error when no candidate is
    /// reachable within the budget. The caller treats any failure as fatal
    /// to the configuration load.
    async fn probe(&self, options: &WarpScanOptions) -> Result<SocketAddr, BoxError>;
}

/// Check whether a base64 public key is the Cloudflare WARP key
///
/// Gate for discovery mode: comparison happens on the decoded bytes, so a
/// typo'd or undecodable key never enables a scan against the wrong
/// provider.
#[must_use]
pub fn is_warp_public_key(public_key: &str) -> bool {
    let Ok(candidate) = BASE64_STANDARD.decode(public_key) else {
        return false;
    };
    let Ok(warp) = BASE64_STANDARD.decode(WARP_PUBLIC_KEY) else {
        return false;
    };
    candidate == warp
}
