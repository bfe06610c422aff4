//! Lookup provider interfaces.
//!
//! Geogate ships no provider clients. Hosts implement these traits over
//! their geocoding and IP-geolocation services and register them with
//! [`LookupGatewayBuilder`](crate::LookupGatewayBuilder).

mod traits;

pub use traits::{GeoIpProvider, GeocodeProvider, ReverseGeocodeProvider};
