//! Turn an RDAP lookup outcome into an availability verdict.

use crate::types::Availability;

/// Classify an RDAP response.
///
/// Only a 404 means available. Every other outcome, including 429, 5xx,
/// timeouts and transport failures, is reported as taken so an inconclusive
/// lookup never advertises a domain that may already be registered.
pub fn classify(status: Option<u16>, network_error: bool) -> Availability {
    if network_error {
        return Availability::Taken;
    }

    match status {
        Some(404) => Availability::Available,
        _ => Availability::Taken,
    }
}
