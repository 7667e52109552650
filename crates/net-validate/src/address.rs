//! IP literal validation

use std::net::IpAddr;

use log::debug;

use ifcfg_network_core::error::ValidationError;

/// Check that `address` is an IPv4 or IPv6 literal.
///
/// Only the literal syntax is checked. Netmasks go through the same check, so
/// `255.255.255.0` passes and so does `10.0.0.1`. No prefix suffix is accepted.
pub fn validate_ip(address: &str) -> Result<IpAddr, ValidationError> {
    address.parse::<IpAddr>().map_err(|_| {
        debug!("Rejected address literal {:?}", address);
        ValidationError::InvalidAddress {
            address: address.to_string(),
        }
    })
}
