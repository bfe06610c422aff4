//! Request validation, run before any cache or provider work.

use std::net::IpAddr;

use crate::normalize;
use crate::types::StructuredAddress;
use crate::{GeogateError, Result};

/// An address is judged by its normalized form, the same text the cache
/// key is derived from. Input made only of delimiters and whitespace
/// normalizes to nothing and is rejected.
pub(super) fn address(address: &str) -> Result<()> {
    if normalize::normalize_address(address).is_empty() {
        return Err(GeogateError::invalid_address("address is required"));
    }
    Ok(())
}

pub(super) fn structured_address(address: &StructuredAddress) -> Result<()> {
    if normalize::normalize_address(&address.to_formatted_string()).is_empty() {
        return Err(GeogateError::invalid_address(
            "at least one address field is required",
        ));
    }
    Ok(())
}

pub(super) fn ip(ip: &str) -> Result<()> {
    if ip.is_empty() {
        return Err(GeogateError::invalid_ip("ip is required"));
    }
    ip.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| GeogateError::invalid_ip(format!("invalid IP address format: {ip:?}")))
}

pub(super) fn coordinates(lat: f64, lng: f64) -> Result<()> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(GeogateError::invalid_coordinates(
            "latitude and longitude must be finite numbers",
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeogateError::invalid_coordinates(format!(
            "latitude {lat} is outside [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(GeogateError::invalid_coordinates(format!(
            "longitude {lng} is outside [-180, 180]"
        )));
    }
    Ok(())
}
