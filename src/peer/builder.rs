//! Peer Descriptor Builder
//!
//! Turns the raw option set into an ordered list of [`PeerConfig`] records.
//! Both configuration shapes are normalized into one list of raw peer blocks
//! first (length one for the implicit single-peer case), so every peer runs
//! through the same validation path and error messages attribute failures by
//! zero-based peer index.

use std::net::{IpAddr, SocketAddr};

use base64::prelude::*;
use ipnet::IpNet;
use tracing::info;

use crate::error::{PeerError, Result};
use crate::options::{WireGuardOptions, WireGuardPeer};
use crate::warp::{self, EndpointScanner, WarpScanOptions};

use super::{PeerConfig, PeerEndpoint, KEY_LEN};

/// One normalized raw peer block
struct RawPeer<'a> {
    server: &'a str,
    server_port: u16,
    public_key: &'a str,
    pre_shared_key: &'a str,
    allowed_ips: Vec<String>,
    reserved: &'a [u8],
    /// Implicit single-peer mode: allowed IPs were derived, skip the
    /// emptiness check
    implicit: bool,
}

impl<'a> RawPeer<'a> {
    fn explicit(peer: &'a WireGuardPeer) -> Self {
        Self {
            server: &peer.server,
            server_port: peer.server_port,
            public_key: &peer.public_key,
            pre_shared_key: &peer.pre_shared_key,
            allowed_ips: peer.allowed_ips.clone(),
            reserved: &peer.reserved,
            implicit: false,
        }
    }

    fn implicit(options: &'a WireGuardOptions) -> Self {
        Self {
            server: &options.server,
            server_port: options.server_port,
            public_key: &options.peer_public_key,
            pre_shared_key: &options.pre_shared_key,
            allowed_ips: default_allowed_ips(&options.local_address),
            reserved: &options.reserved,
            implicit: true,
        }
    }
}

/// Derive the implicit-mode allowed-IP list from the local address families:
/// IPv4 present yields the all-IPv4 route, IPv6 the all-IPv6 route, in that
/// order.
fn default_allowed_ips(local_address: &[IpNet]) -> Vec<String> {
    let has_v4 = local_address.iter().any(|prefix| prefix.addr().is_ipv4());
    let has_v6 = local_address.iter().any(|prefix| prefix.addr().is_ipv6());

    let mut allowed_ips = Vec::new();
    if has_v4 {
        allowed_ips.push("0.0.0.0/0".to_string());
    }
    if has_v6 {
        allowed_ips.push("::/0".to_string());
    }
    allowed_ips
}

fn decode_public_key(encoded: &str, index: usize) -> Result<[u8; KEY_LEN]> {
    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|source| PeerError::PublicKeyDecode { index, source })?;
    <[u8; KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| PeerError::PublicKeyLength {
        index,
        expected: KEY_LEN,
        got: bytes.len(),
    })
}

fn decode_pre_shared_key(encoded: &str, index: usize) -> Result<[u8; KEY_LEN]> {
    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|source| PeerError::PreSharedKeyDecode { index, source })?;
    <[u8; KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| PeerError::PreSharedKeyLength {
        index,
        expected: KEY_LEN,
        got: bytes.len(),
    })
}

/// Build peer descriptors from raw options
///
/// Processes peers in input order and fails fast on the first invalid one;
/// no partial list is ever returned. Discovery-mode peers (`server ==
/// "warp_auto"`) trigger a blocking endpoint scan through `scanner` after
/// passing the WARP key gate.
///
/// # Errors
///
/// Returns [`PeerError`] naming the offending peer index for configuration
/// errors, [`PeerError::Scan`] for scan failures, and the unrecoverable
/// [`PeerError::WarpKeyMismatch`] when discovery is requested with a foreign
/// public key.
pub async fn parse_peers(
    options: &WireGuardOptions,
    scanner: &dyn EndpointScanner,
) -> Result<Vec<PeerConfig>> {
    let raw_peers: Vec<RawPeer<'_>> = if options.peers.is_empty() {
        vec![RawPeer::implicit(options)]
    } else {
        options.peers.iter().map(RawPeer::explicit).collect()
    };

    let mut peers = Vec::with_capacity(raw_peers.len());
    for (index, raw) in raw_peers.iter().enumerate() {
        let mut try_unblock_warp = false;
        let endpoint = if raw.server == warp::DISCOVERY_SENTINEL {
            if !warp::is_warp_public_key(raw.public_key) {
                return Err(PeerError::WarpKeyMismatch);
            }
            info!("running WARP endpoint scan, this might take a while...");
            let scan_options = WarpScanOptions::for_port(&options.private_key, raw.server_port);
            let best = scanner
                .probe(&scan_options)
                .await
                .map_err(|source| PeerError::Scan { source })?;
            info!("fastest WARP endpoint available: {best}");
            try_unblock_warp = true;
            PeerEndpoint::Resolved(best)
        } else if let Ok(address) = raw.server.parse::<IpAddr>() {
            PeerEndpoint::Resolved(SocketAddr::new(address, raw.server_port))
        } else {
            PeerEndpoint::Domain {
                name: raw.server.to_string(),
                port: raw.server_port,
                strategy: options.domain_strategy,
            }
        };

        let public_key = decode_public_key(raw.public_key, index)?;
        let pre_shared_key = if raw.pre_shared_key.is_empty() {
            None
        } else {
            Some(decode_pre_shared_key(raw.pre_shared_key, index)?)
        };

        if !raw.implicit {
            if raw.allowed_ips.is_empty() {
                return Err(PeerError::MissingAllowedIps { index });
            }
            for entry in &raw.allowed_ips {
                entry
                    .parse::<IpNet>()
                    .map_err(|source| PeerError::InvalidAllowedIp {
                        index,
                        entry: entry.clone(),
                        source,
                    })?;
            }
        }

        let mut reserved = [0u8; 3];
        if !raw.reserved.is_empty() {
            if raw.reserved.len() != 3 {
                return Err(PeerError::InvalidReserved {
                    index,
                    got: raw.reserved.len(),
                });
            }
            reserved.copy_from_slice(raw.reserved);
        }

        peers.push(PeerConfig {
            endpoint,
            public_key,
            pre_shared_key,
            allowed_ips: raw.allowed_ips.clone(),
            reserved,
            try_unblock_warp,
        });
    }

    Ok(peers)
}
