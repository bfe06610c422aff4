//! Geogate - rate limiting and response caching in front of geocoding and
//! IP-geolocation providers
//!
//! This crate sits between request handling and the external lookup
//! services. Each lookup is admitted against the client's per-second
//! token bucket, answered from a capacity-bounded cache partition when
//! possible, and otherwise forwarded to the registered provider with the
//! answer written back for next time.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use geogate::{ClientIdentity, GeocodeProvider, GeocodeResult, LookupGateway};
//!
//! struct MyGeocoder;
//!
//! #[async_trait]
//! impl GeocodeProvider for MyGeocoder {
//!     fn name(&self) -> &str {
//!         "my-geocoder"
//!     }
//!
//!     async fn geocode(&self, address: &str) -> geogate::Result<GeocodeResult> {
//!         // call the upstream service here
//!         # let _ = address;
//!         Ok(GeocodeResult::default())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> geogate::Result<()> {
//!     let config = geogate::Config::load(None)?;
//!     let gateway = LookupGateway::builder()
//!         .config(&config)
//!         .geocoder(Arc::new(MyGeocoder))
//!         .build()?;
//!     let sweeper = gateway.start_sweeper();
//!
//!     let client = ClientIdentity::new("key-123", 5).with_name("acme");
//!     let lookup = gateway
//!         .geocode(Some(&client), "15 Falls Road, Shelburne, VT")
//!         .await?;
//!     println!("{} (from {})", lookup.value.formatted_address, lookup.source);
//!
//!     sweeper.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! The pieces are usable on their own: [`RateLimiter`] for admission
//! control, [`CacheService`] for the partitioned cache, and
//! [`normalize`] for the canonical forms and cache keys.

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod limiter;
pub mod normalize;
pub mod providers;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheService};
pub use config::Config;
pub use error::{ErrorBody, GeogateError, Result};
pub use gateway::{LookupGateway, LookupGatewayBuilder};
pub use limiter::{RateLimitConfig, RateLimiter, SweeperHandle};
pub use providers::{GeoIpProvider, GeocodeProvider, ReverseGeocodeProvider};
pub use store::{CacheEntry, MemoryStore, Partition, PartitionStore};

// Re-export all types
pub use types::{
    CACHE_SOURCE, ClientIdentity, GeoIpResult, GeocodeResult, Lookup, RateLimitStatus,
    ReverseGeocodeResult, StructuredAddress,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
