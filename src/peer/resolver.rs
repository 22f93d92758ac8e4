//! Endpoint Resolver
//!
//! Back-fills DNS-deferred peer endpoints. Resolution is all-or-nothing:
//! the pass walks peers in input order, stops at the first failure, and
//! never surfaces a partially resolved list as success.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{BoxError, PeerError, Result};
use crate::options::DomainStrategy;

use super::{PeerConfig, PeerEndpoint};

/// Name resolution collaborator
///
/// Implementations return candidate addresses ordered according to the
/// requested strategy. Lookup timeouts are owned by the implementation;
/// any failure here is terminal for the whole resolution pass.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve a domain name to an ordered candidate list
    ///
    /// # Errors
    ///
    /// Returns an implementation-defined error when the lookup fails.
    async fn lookup(
        &self,
        domain: &str,
        strategy: DomainStrategy,
    ) -> std::result::Result<Vec<IpAddr>, BoxError>;
}

/// Resolve every DNS-deferred peer endpoint in place
///
/// Uses the first candidate address combined with the originally configured
/// port. Already-resolved peers are left untouched.
///
/// # Errors
///
/// Fails fast on the first unresolved peer: lookup failures map to
/// [`PeerError::ResolveDomain`] (single-peer list) or
/// [`PeerError::ResolveDomainForPeer`] (multi-peer, naming the zero-based
/// index); an empty candidate list maps to [`PeerError::NoAddresses`].
pub async fn resolve_peers(resolver: &dyn DnsResolver, peers: &mut [PeerConfig]) -> Result<()> {
    let peer_count = peers.len();
    for (index, peer) in peers.iter_mut().enumerate() {
        let (name, port, strategy) = match &peer.endpoint {
            PeerEndpoint::Resolved(_) => continue,
            PeerEndpoint::Domain {
                name,
                port,
                strategy,
            } => (name.clone(), *port, *strategy),
        };

        debug!("resolving endpoint domain {name} ({strategy}) for peer {index}");
        let addresses = resolver.lookup(&name, strategy).await.map_err(|source| {
            if peer_count == 1 {
                PeerError::ResolveDomain {
                    domain: name.clone(),
                    source,
                }
            } else {
                PeerError::ResolveDomainForPeer {
                    index,
                    domain: name.clone(),
                    source,
                }
            }
        })?;

        let Some(address) = addresses.first() else {
            return Err(PeerError::NoAddresses { domain: name });
        };
        peer.endpoint = PeerEndpoint::Resolved(SocketAddr::new(*address, port));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::KEY_LEN;

    /// Resolver backed by a fixed answer table
    struct TableResolver {
        answers: Vec<(String, Vec<IpAddr>)>,
    }

    #[async_trait]
    impl DnsResolver for TableResolver {
        async fn lookup(
            &self,
            domain: &str,
            _strategy: DomainStrategy,
        ) -> std::result::Result<Vec<IpAddr>, BoxError> {
            self.answers
                .iter()
                .find(|(name, _)| name == domain)
                .map(|(_, addresses)| addresses.clone())
                .ok_or_else(|| format!("NXDOMAIN: {domain}").into())
        }
    }

    fn deferred_peer(name: &str, port: u16) -> PeerConfig {
        PeerConfig {
            endpoint: PeerEndpoint::Domain {
                name: name.to_string(),
                port,
                strategy: DomainStrategy::AsIs,
            },
            public_key: [0x11; KEY_LEN],
            pre_shared_key: None,
            allowed_ips: vec!["0.0.0.0/0".into()],
            reserved: [0, 0, 0],
            try_unblock_warp: false,
        }
    }

    fn resolved_peer(endpoint: &str) -> PeerConfig {
        PeerConfig {
            endpoint: PeerEndpoint::Resolved(endpoint.parse().unwrap()),
            ..deferred_peer("unused", 0)
        }
    }

    #[tokio::test]
    async fn test_first_address_wins_with_original_port() {
        let resolver = TableResolver {
            answers: vec![(
                "vpn.example.org".into(),
                vec!["10.0.0.5".parse().unwrap(), "10.0.0.6".parse().unwrap()],
            )],
        };
        let mut peers = vec![deferred_peer("vpn.example.org", 51820)];
        resolve_peers(&resolver, &mut peers).await.unwrap();
        assert_eq!(
            peers[0].endpoint,
            PeerEndpoint::Resolved("10.0.0.5:51820".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_resolved_peers_untouched() {
        let resolver = TableResolver { answers: vec![] };
        let mut peers = vec![resolved_peer("192.0.2.1:51820")];
        resolve_peers(&resolver, &mut peers).await.unwrap();
        assert_eq!(
            peers[0].endpoint,
            PeerEndpoint::Resolved("192.0.2.1:51820".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_empty_answer_is_failure() {
        let resolver = TableResolver {
            answers: vec![("vpn.example.org".into(), vec![])],
        };
        let mut peers = vec![deferred_peer("vpn.example.org", 51820)];
        let err = resolve_peers(&resolver, &mut peers).await.unwrap_err();
        assert!(matches!(err, PeerError::NoAddresses { .. }));
    }

    #[tokio::test]
    async fn test_single_peer_failure_has_plain_message() {
        let resolver = TableResolver { answers: vec![] };
        let mut peers = vec![deferred_peer("missing.example.org", 51820)];
        let err = resolve_peers(&resolver, &mut peers).await.unwrap_err();
        assert!(matches!(err, PeerError::ResolveDomain { .. }));
        assert!(!err.to_string().contains("for peer"));
    }

    #[tokio::test]
    async fn test_multi_peer_failure_names_index_and_stops() {
        let resolver = TableResolver {
            answers: vec![("a.example.org".into(), vec!["10.0.0.1".parse().unwrap()])],
        };
        let mut peers = vec![
            deferred_peer("a.example.org", 51820),
            deferred_peer("b.example.org", 51821),
            deferred_peer("c.example.org", 51822),
        ];
        let err = resolve_peers(&resolver, &mut peers).await.unwrap_err();
        assert!(matches!(
            err,
            PeerError::ResolveDomainForPeer { index: 1, .. }
        ));
        // Fail-fast: the third peer was never attempted and stays deferred
        assert!(!peers[2].endpoint.is_resolved());
    }
}
