//! Public types for the Geogate API.

mod client;
mod geocode;
mod geoip;
mod lookup;
mod reverse;

pub use client::ClientIdentity;
pub use geocode::{GeocodeResult, StructuredAddress};
pub use geoip::GeoIpResult;
pub use lookup::{CACHE_SOURCE, Lookup, RateLimitStatus};
pub(crate) use lookup::reset_timestamp;
pub use reverse::ReverseGeocodeResult;
