//! Caching subsystem.
//!
//! [`CacheService`] sits between request handling and the partition
//! stores. It owns query normalization, key derivation, JSON
//! (de)serialization and the eviction policy, and applies them the same
//! way to each partition:
//!
//! - **address**: free-text and structured forward geocoding,
//! - **ip**: IP geolocation,
//! - **reverse_geocode**: coordinate lookups.
//!
//! Reads never fail: a missing entry, a store error and an undecodable
//! payload are all reported as a miss, and the caller recomputes. Writes
//! return their error so the caller can log it, but the value the caller
//! just computed stays valid for the current request.
//!
//! See [`eviction`] for the capacity policy.

pub mod eviction;
mod service;

pub use eviction::eviction_batch;
pub use service::{CacheConfig, CacheService};
