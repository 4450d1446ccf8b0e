//! Protocol implementations for domain checking.
//!
//! RDAP is the only lookup protocol; the registry module maps TLDs to the
//! servers that answer for them.

/// RDAP (Registration Data Access Protocol) client
pub mod rdap;

/// TLD to RDAP endpoint table
pub mod registry;

pub use rdap::RdapClient;
pub use registry::{extract_tld, known_tlds, rdap_endpoint, rdap_url, FALLBACK_RDAP_ENDPOINT};
