//! Query normalization and cache-key derivation.
//!
//! Every cached lookup is keyed on the SHA-256 of a canonical form of the
//! query, rendered as 64 lowercase hex characters. Canonicalization is
//! deliberately conservative: it only removes differences a provider
//! cannot observe (case, whitespace, delimiter spelling) and never
//! rewrites content.
//!
//! # Address rules
//!
//! Applied in order:
//!
//! 1. trim and lowercase;
//! 2. treat runs of `\`, `|`, tab and newline as a field delimiter;
//! 3. collapse runs of delimiters (commas, possibly separated by
//!    whitespace) into one;
//! 4. render each delimiter as exactly `", "`;
//! 5. drop leading and trailing delimiters;
//! 6. collapse remaining whitespace runs to a single space.
//!
//! Not performed: abbreviation handling ("St" vs "Street", "N" vs
//! "North"), unit/suite rewriting, or punctuation removal. Periods and
//! semicolons are kept verbatim.
//!
//! # Coordinates
//!
//! Latitude and longitude are formatted to five decimal places (about
//! 1.1 m) before hashing, so coordinates that differ only below that
//! precision share an entry.

use sha2::{Digest, Sha256};

/// Characters treated as field delimiters rather than address content.
const FIELD_DELIMITERS: [char; 4] = ['\\', '|', '\t', '\n'];

/// Decimal places kept for coordinate keys.
pub const COORDINATE_PRECISION: usize = 5;

/// Canonical form of a free-text address.
///
/// Idempotent: `normalize_address(&normalize_address(x)) == normalize_address(x)`.
///
/// ```rust
/// # use geogate::normalize::normalize_address;
/// assert_eq!(
///     normalize_address("  15 FALLS ROAD|Shelburne\\\\VT ,, "),
///     "15 falls road, shelburne, vt"
/// );
/// ```
pub fn normalize_address(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let delimited = lowered.replace(FIELD_DELIMITERS, ",");

    delimited
        .split(',')
        .map(|field| field.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Canonical `"lat,lng"` form with [`COORDINATE_PRECISION`] decimals.
///
/// Values that round to zero are written without a sign so that
/// `-0.000001` and `0.000001` share a key.
pub fn canonical_coordinates(lat: f64, lng: f64) -> String {
    format!("{},{}", fixed(lat), fixed(lng))
}

fn fixed(value: f64) -> String {
    let formatted = format!("{:.*}", COORDINATE_PRECISION, value);
    match formatted.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => formatted,
    }
}

/// SHA-256 of `canonical`, lowercase hex.
pub fn content_hash(canonical: &str) -> String {
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Cache key for a free-text address.
pub fn address_key(raw: &str) -> String {
    content_hash(&normalize_address(raw))
}

/// Cache key for a coordinate pair.
pub fn coordinate_key(lat: f64, lng: f64) -> String {
    content_hash(&canonical_coordinates(lat, lng))
}

/// Cache key for an IP literal.
///
/// The literal is hashed byte-for-byte; `"::1"` and `"0:0:0:0:0:0:0:1"`
/// are different keys.
pub fn ip_key(ip: &str) -> String {
    content_hash(ip)
}
