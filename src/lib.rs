//! wireguard-peers: `WireGuard` peer descriptor building and resolution
//!
//! This crate transforms declarative `WireGuard` tunnel-peer options into
//! fully resolved peer descriptors and serializes them into the line-oriented
//! IPC configuration protocol consumed by the tunnel engine.
//!
//! # Features
//!
//! - **Two configuration shapes**: implicit single peer or explicit peer list,
//!   validated through one shared path
//! - **Endpoint resolution**: static address, DNS-deferred domain, or active
//!   latency-based WARP endpoint discovery
//! - **Key handling**: base64 transport encoding decoded once at the builder
//!   boundary, emitted only as raw hex
//! - **Capability traits**: scanner and resolver collaborators injected for
//!   deterministic testing without network access
//!
//! # Architecture
//!
//! ```text
//! WireGuardOptions → parse_peers ──(warp_auto)──▶ EndpointScanner
//!                        │
//!                        ▼
//!                  Vec<PeerConfig> → resolve_peers ──▶ DnsResolver
//!                        │
//!                        ▼
//!                generate_ipc_lines → tunnel engine
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use wireguard_peers::{parse_peers, resolve_peers, WireGuardOptions};
//! # use wireguard_peers::{DnsResolver, EndpointScanner};
//!
//! # async fn example(
//! #     scanner: &dyn EndpointScanner,
//! #     resolver: &dyn DnsResolver,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let options: WireGuardOptions = serde_json::from_str(r#"{
//!     "server": "engage.cloudflareclient.com",
//!     "server_port": 2408,
//!     "local_address": ["172.16.0.2/32"],
//!     "peer_public_key": "bmXOC+F1FxEMF9dyiK2H5/1SUtzH0JuVo51h2wPfgyo="
//! }"#)?;
//!
//! let mut peers = parse_peers(&options, scanner).await?;
//! resolve_peers(resolver, &mut peers).await?;
//!
//! let ipc: String = peers.iter().map(|p| p.generate_ipc_lines()).collect();
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types with recoverability classification
//! - [`options`]: Declarative option types and `DomainStrategy`
//! - [`peer`]: Peer records, builder, resolver, IPC generation
//! - [`warp`]: WARP constants, discovery gate, scanner trait

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod options;
pub mod peer;
pub mod warp;

// Re-export commonly used types at the crate root
pub use error::{BoxError, PeerError};
pub use options::{DomainStrategy, WireGuardOptions, WireGuardPeer};
pub use peer::{parse_peers, resolve_peers, DnsResolver, PeerConfig, PeerEndpoint};
pub use warp::{
    is_warp_public_key, EndpointScanner, WarpScanOptions, DISCOVERY_SENTINEL, WARP_PUBLIC_KEY,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
