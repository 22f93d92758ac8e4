//! Peer descriptor records and IPC line generation
//!
//! A [`PeerConfig`] is built once per configuration load by
//! [`builder::parse_peers`], optionally back-filled exactly once by
//! [`resolver::resolve_peers`] (turning a deferred domain endpoint into a
//! concrete address), then consumed read-only by
//! [`PeerConfig::generate_ipc_lines`]. Records are never reused across
//! reloads.

pub mod builder;
pub mod resolver;

pub use builder::parse_peers;
pub use resolver::{resolve_peers, DnsResolver};

use std::fmt::Write as _;
use std::net::SocketAddr;

use crate::options::DomainStrategy;

/// `WireGuard` key length in bytes
pub const KEY_LEN: usize = 32;

/// Endpoint state of one peer
///
/// Exactly one variant holds at construction time. The resolver collapses
/// `Domain` to `Resolved` before IPC generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEndpoint {
    /// Concrete address, either configured literally, discovered by scan,
    /// or produced by DNS resolution
    Resolved(SocketAddr),
    /// Domain endpoint awaiting DNS resolution
    Domain {
        /// Domain name to resolve
        name: String,
        /// Port combined with the first resolved address
        port: u16,
        /// Address-family preference for the lookup
        strategy: DomainStrategy,
    },
}

impl PeerEndpoint {
    /// Check whether this endpoint is ready for IPC generation
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// One fully parsed tunnel peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerConfig {
    /// Remote endpoint, resolved or DNS-deferred
    pub endpoint: PeerEndpoint,
    /// Raw peer public key
    pub public_key: [u8; KEY_LEN],
    /// Raw pre-shared key, if configured
    pub pre_shared_key: Option<[u8; KEY_LEN]>,
    /// Ordered CIDR list routed through this peer
    pub allowed_ips: Vec<String>,
    /// Reserved header bytes; all-zero means "omit from output"
    pub reserved: [u8; 3],
    /// Request provider-specific unblocking, set only for discovered
    /// WARP endpoints
    pub try_unblock_warp: bool,
}

impl PeerConfig {
    /// Render this peer as tunnel-engine IPC lines
    ///
    /// Each line is prefixed with `\n` so per-peer blocks concatenate
    /// directly. Optional fields produce no line when unset; a still-deferred
    /// domain endpoint produces no `endpoint=` line, so callers must run
    /// [`resolve_peers`] first. Pure and idempotent.
    #[must_use]
    pub fn generate_ipc_lines(&self) -> String {
        let mut lines = String::new();

        lines.push_str("\npublic_key=");
        lines.push_str(&hex::encode(self.public_key));

        if let PeerEndpoint::Resolved(endpoint) = &self.endpoint {
            let _ = write!(lines, "\nendpoint={endpoint}");
        }

        if let Some(pre_shared_key) = &self.pre_shared_key {
            lines.push_str("\npreshared_key=");
            lines.push_str(&hex::encode(pre_shared_key));
        }

        for allowed_ip in &self.allowed_ips {
            let _ = write!(lines, "\nallowed_ip={allowed_ip}");
        }

        if self.reserved != [0u8; 3] {
            let _ = write!(
                lines,
                "\nreserved={},{},{}",
                self.reserved[0], self.reserved[1], self.reserved[2]
            );
        }

        if self.try_unblock_warp {
            lines.push_str("\ntry_unblock_warp=true");
        }

        lines
    }
}
