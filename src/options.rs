//! Declarative `WireGuard` outbound option types
//!
//! These structures mirror the JSON option surface consumed at configuration
//! load. Two shapes are accepted: a flat single-peer form (the top-level
//! `server`/`peer_public_key` fields) and an explicit `peers` list. When
//! `peers` is non-empty the flat peer fields are ignored except for
//! `private_key` and `domain_strategy`, which are shared.

use std::fmt;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Root `WireGuard` outbound options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WireGuardOptions {
    /// Remote server address: literal IP, domain name, or the `warp_auto`
    /// discovery sentinel (implicit single-peer mode only)
    pub server: String,

    /// Remote server port
    pub server_port: u16,

    /// Local tunnel interface prefixes; their address families decide the
    /// derived allowed-IP list in implicit single-peer mode
    pub local_address: Vec<IpNet>,

    /// Local private key (base64), handed to the endpoint scanner
    pub private_key: String,

    /// Peer public key (base64, implicit single-peer mode)
    pub peer_public_key: String,

    /// Optional pre-shared key (base64, empty = absent)
    pub pre_shared_key: String,

    /// Reserved header bytes; must be empty or exactly 3 bytes
    pub reserved: Vec<u8>,

    /// Address-family preference applied to domain endpoints
    pub domain_strategy: DomainStrategy,

    /// Explicit peer list; empty selects implicit single-peer mode
    pub peers: Vec<WireGuardPeer>,
}

/// One entry of the explicit peer list
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WireGuardPeer {
    /// Remote server address: literal IP, domain name, or `warp_auto`
    pub server: String,

    /// Remote server port
    pub server_port: u16,

    /// Peer public key (base64)
    pub public_key: String,

    /// Optional pre-shared key (base64, empty = absent)
    pub pre_shared_key: String,

    /// Routing scope granted to this peer; at least one CIDR required
    pub allowed_ips: Vec<String>,

    /// Reserved header bytes; must be empty or exactly 3 bytes
    pub reserved: Vec<u8>,
}

/// Address-family preference when a domain endpoint resolves to multiple
/// addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStrategy {
    /// Use the resolver's answer order unchanged
    #[default]
    AsIs,
    /// Sort IPv4 candidates first
    PreferIpv4,
    /// Sort IPv6 candidates first
    PreferIpv6,
    /// Drop IPv6 candidates
    Ipv4Only,
    /// Drop IPv4 candidates
    Ipv6Only,
}

impl fmt::Display for DomainStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsIs => write!(f, "as_is"),
            Self::PreferIpv4 => write!(f, "prefer_ipv4"),
            Self::PreferIpv6 => write!(f, "prefer_ipv6"),
            Self::Ipv4Only => write!(f, "ipv4_only"),
            Self::Ipv6Only => write!(f, "ipv6_only"),
        }
    }
}

impl FromStr for DomainStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "as_is" | "" => Ok(Self::AsIs),
            "prefer_ipv4" => Ok(Self::PreferIpv4),
            "prefer_ipv6" => Ok(Self::PreferIpv6),
            "ipv4_only" => Ok(Self::Ipv4Only),
            "ipv6_only" => Ok(Self::Ipv6Only),
            _ => Err(format!("unknown domain strategy: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_strategy_default() {
        assert_eq!(DomainStrategy::default(), DomainStrategy::AsIs);
    }

    #[test]
    fn test_domain_strategy_roundtrip() {
        for strategy in [
            DomainStrategy::AsIs,
            DomainStrategy::PreferIpv4,
            DomainStrategy::PreferIpv6,
            DomainStrategy::Ipv4Only,
            DomainStrategy::Ipv6Only,
        ] {
            let parsed: DomainStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        assert!("dual_stack".parse::<DomainStrategy>().is_err());
    }

    #[test]
    fn test_options_deserialize_flat() {
        let options: WireGuardOptions = serde_json::from_str(
            r#"{
                "server": "engage.cloudflareclient.com",
                "server_port": 2408,
                "local_address": ["172.16.0.2/32", "2606:4700:110:8d1b::2/128"],
                "private_key": "cHJpdmF0ZQ==",
                "peer_public_key": "bmXOC+F1FxEMF9dyiK2H5/1SUtzH0JuVo51h2wPfgyo=",
                "domain_strategy": "prefer_ipv4"
            }"#,
        )
        .unwrap();

        assert_eq!(options.server_port, 2408);
        assert_eq!(options.local_address.len(), 2);
        assert_eq!(options.domain_strategy, DomainStrategy::PreferIpv4);
        assert!(options.peers.is_empty());
        assert!(options.reserved.is_empty());
    }

    #[test]
    fn test_options_deserialize_peer_list() {
        let options: WireGuardOptions = serde_json::from_str(
            r#"{
                "private_key": "cHJpdmF0ZQ==",
                "peers": [
                    {
                        "server": "10.0.0.1",
                        "server_port": 51820,
                        "public_key": "cHVibGlj",
                        "allowed_ips": ["0.0.0.0/0"],
                        "reserved": [1, 2, 3]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(options.peers.len(), 1);
        assert_eq!(options.peers[0].server_port, 51820);
        assert_eq!(options.peers[0].reserved, vec![1, 2, 3]);
        assert_eq!(options.peers[0].allowed_ips, vec!["0.0.0.0/0"]);
    }
}
