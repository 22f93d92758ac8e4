//! Error types for wireguard-peers
//!
//! All configuration-load failures are expressed as one closed [`PeerError`]
//! enum. Every variant is fatal to the load; the only distinction callers
//! need is [`PeerError::is_unrecoverable`], which marks the WARP key
//! policy violation that must abort startup rather than surface as an
//! ordinary configuration error.

use thiserror::Error;

/// Boxed error type returned by collaborator traits
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while building, resolving, or validating peer descriptors
#[derive(Debug, Error)]
pub enum PeerError {
    /// Public key is not valid base64
    #[error("decode public key for peer {index}: {source}")]
    PublicKeyDecode {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// Public key decoded to the wrong number of bytes
    #[error("invalid public key length for peer {index}: expected {expected} bytes, got {got}")]
    PublicKeyLength {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Pre-shared key is not valid base64
    #[error("decode pre shared key for peer {index}: {source}")]
    PreSharedKeyDecode {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// Pre-shared key decoded to the wrong number of bytes
    #[error("invalid pre shared key length for peer {index}: expected {expected} bytes, got {got}")]
    PreSharedKeyLength {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Explicit-mode peer declared no allowed IPs
    #[error("missing allowed_ips for peer {index}")]
    MissingAllowedIps { index: usize },

    /// Allowed-IP entry is not a valid CIDR prefix
    #[error("invalid allowed_ip {entry:?} for peer {index}: {source}")]
    InvalidAllowedIp {
        index: usize,
        entry: String,
        #[source]
        source: ipnet::AddrParseError,
    },

    /// Reserved field must be exactly 3 bytes when supplied
    #[error("invalid reserved value for peer {index}: required 3 bytes, got {got}")]
    InvalidReserved { index: usize, got: usize },

    /// Endpoint discovery requested with a public key that is not the WARP key
    ///
    /// Proceeding would silently probe the wrong provider, so this is the one
    /// unrecoverable variant (see [`PeerError::is_unrecoverable`]).
    #[error("WARP endpoint scan enabled but wrong public key was found")]
    WarpKeyMismatch,

    /// WARP endpoint scan failed
    #[error("WARP endpoint scan failed: {source}")]
    Scan {
        #[source]
        source: BoxError,
    },

    /// DNS lookup failed for a single-peer configuration
    #[error("resolve endpoint domain {domain}: {source}")]
    ResolveDomain {
        domain: String,
        #[source]
        source: BoxError,
    },

    /// DNS lookup failed for one peer of a multi-peer configuration
    #[error("resolve endpoint domain {domain} for peer {index}: {source}")]
    ResolveDomainForPeer {
        index: usize,
        domain: String,
        #[source]
        source: BoxError,
    },

    /// DNS lookup succeeded but returned no candidates
    #[error("no addresses found for endpoint domain: {domain}")]
    NoAddresses { domain: String },
}

impl PeerError {
    /// Check if this error must abort startup entirely
    ///
    /// True only for the WARP key policy violation. Every other variant is an
    /// ordinary configuration or resolution error that callers report and
    /// propagate.
    #[must_use]
    pub const fn is_unrecoverable(&self) -> bool {
        matches!(self, Self::WarpKeyMismatch)
    }

    /// Check if this error is recoverable (can retry operation)
    ///
    /// Configuration-load errors never are: a reload with corrected options
    /// is the only way forward.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Type alias for Result with `PeerError`
pub type Result<T> = std::result::Result<T, PeerError>;
