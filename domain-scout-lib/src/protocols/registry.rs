//! Static TLD to RDAP endpoint mappings.
//!
//! Known registries are queried directly; everything else goes through the
//! rdap.org redirector, which forwards to the authoritative server.

use crate::error::DomainScoutError;

/// Generic RDAP lookup used for TLDs missing from the table.
pub const FALLBACK_RDAP_ENDPOINT: &str = "https://rdap.org/domain/";

/// Known RDAP base URLs. Every entry ends with `/domain/` so the lookup URL is
/// the base followed by the domain name.
const RDAP_ENDPOINTS: &[(&str, &str)] = &[
    // Popular gTLDs
    ("com", "https://rdap.verisign.com/com/v1/domain/"),
    ("net", "https://rdap.verisign.com/net/v1/domain/"),
    ("org", "https://rdap.publicinterestregistry.org/rdap/domain/"),
    ("info", "https://rdap.identitydigital.services/rdap/domain/"),
    ("biz", "https://rdap.nic.biz/domain/"),
    // Google registry
    ("app", "https://pubapi.registry.google/rdap/domain/"),
    ("dev", "https://pubapi.registry.google/rdap/domain/"),
    ("page", "https://pubapi.registry.google/rdap/domain/"),
    // CentralNic
    ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
    ("tech", "https://rdap.centralnic.com/tech/domain/"),
    ("online", "https://rdap.centralnic.com/online/domain/"),
    ("site", "https://rdap.centralnic.com/site/domain/"),
    // Identity Digital
    ("ai", "https://rdap.identitydigital.services/rdap/domain/"),
    ("io", "https://rdap.identitydigital.services/rdap/domain/"),
    ("me", "https://rdap.identitydigital.services/rdap/domain/"),
    ("co", "https://rdap.nic.co/domain/"),
    // ccTLDs with working RDAP
    ("us", "https://rdap.nic.us/domain/"),
    ("uk", "https://rdap.nominet.uk/domain/"),
    ("de", "https://rdap.denic.de/domain/"),
    ("fr", "https://rdap.nic.fr/domain/"),
    ("nl", "https://rdap.sidn.nl/domain/"),
    ("tv", "https://rdap.nic.tv/domain/"),
    ("cc", "https://tld-rdap.verisign.com/cc/v1/domain/"),
];

/// Look up the RDAP base URL for a TLD, falling back to the generic endpoint.
pub fn rdap_endpoint(tld: &str) -> &'static str {
    let tld = tld.trim_start_matches('.').to_ascii_lowercase();
    RDAP_ENDPOINTS
        .iter()
        .find(|(known, _)| *known == tld)
        .map(|(_, endpoint)| *endpoint)
        .unwrap_or(FALLBACK_RDAP_ENDPOINT)
}

/// Whether the TLD has a dedicated entry in the table.
pub fn has_dedicated_endpoint(tld: &str) -> bool {
    let tld = tld.to_ascii_lowercase();
    RDAP_ENDPOINTS.iter().any(|(known, _)| *known == tld)
}

/// All TLDs with a dedicated endpoint, sorted alphabetically.
pub fn known_tlds() -> Vec<String> {
    let mut tlds: Vec<String> = RDAP_ENDPOINTS
        .iter()
        .map(|(tld, _)| tld.to_string())
        .collect();
    tlds.sort();
    tlds
}

/// Extract the TLD (last label, lower-cased) from a domain name.
pub fn extract_tld(domain: &str) -> Result<String, DomainScoutError> {
    match domain.rsplit_once('.') {
        Some((base, tld)) if !base.is_empty() && !tld.is_empty() => Ok(tld.to_ascii_lowercase()),
        _ => Err(DomainScoutError::invalid_domain(
            domain,
            "Domain must contain a name and a TLD separated by a dot",
        )),
    }
}

/// Build the full RDAP lookup URL for a domain.
///
/// `base_override` replaces the table for every TLD; a trailing slash is added
/// when missing.
pub fn rdap_url(domain: &str, base_override: Option<&str>) -> Result<String, DomainScoutError> {
    let tld = extract_tld(domain)?;
    let domain = domain.to_ascii_lowercase();

    match base_override {
        Some(base) if base.ends_with('/') => Ok(format!("{}{}", base, domain)),
        Some(base) => Ok(format!("{}/{}", base, domain)),
        None => Ok(format!("{}{}", rdap_endpoint(&tld), domain)),
    }
}
