//! Lookup gateway and its builder

mod builder;
mod lookup;
mod validate;

pub use builder::LookupGatewayBuilder;
pub use lookup::LookupGateway;
