//! Tests for query normalization and cache-key derivation.

use geogate::StructuredAddress;
use geogate::normalize::{
    address_key, canonical_coordinates, coordinate_key, ip_key, normalize_address,
};

const SAMPLES: &[&str] = &[
    "15 Falls Road, Shelburne, VT 05482",
    "  15 FALLS ROAD,,SHELBURNE ,  VT 05482  ",
    "15 falls road|shelburne\\vt 05482",
    "1600 Amphitheatre Pkwy\nMountain View\tCA",
    ", , leading and trailing , ,",
    "Apt. 5; 221B Baker St.",
    "a , , , b",
    "",
    "   ",
    "|||",
];

// =========================================================================
// Address normalization
// =========================================================================

#[test]
fn normalization_is_idempotent() {
    for raw in SAMPLES {
        let once = normalize_address(raw);
        assert_eq!(normalize_address(&once), once, "input: {raw:?}");
    }
}

#[test]
fn delimiter_case_and_whitespace_variants_share_a_key() {
    let variants = [
        "15 Falls Road, Shelburne, VT",
        "15 FALLS ROAD, SHELBURNE, VT",
        "15 falls road,shelburne,vt",
        "  15   Falls Road ,  Shelburne ,VT  ",
        "15 Falls Road|Shelburne|VT",
        "15 Falls Road\\Shelburne\tVT",
        "15 Falls Road,, Shelburne,,, VT,",
    ];
    let expected = address_key(variants[0]);
    for variant in variants {
        assert_eq!(address_key(variant), expected, "variant: {variant:?}");
    }
    assert_eq!(normalize_address(variants[0]), "15 falls road, shelburne, vt");
}

#[test]
fn abbreviations_are_not_expanded() {
    assert_ne!(address_key("123 Main Street"), address_key("123 Main St"));
    assert_ne!(address_key("100 N Main St"), address_key("100 North Main St"));
}

#[test]
fn spaces_alone_do_not_split_fields() {
    // Without a delimiter the words stay one field.
    assert_eq!(
        normalize_address("15 FALLS ROAD  SHELBURNE  VT"),
        "15 falls road shelburne vt"
    );
    assert_ne!(
        address_key("15 FALLS ROAD  SHELBURNE  VT"),
        address_key("15 Falls Road, Shelburne, VT")
    );
}

#[test]
fn keys_are_lowercase_hex_sha256() {
    let key = address_key("1 Infinite Loop");
    assert_eq!(key.len(), 64);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

// =========================================================================
// Structured addresses
// =========================================================================

#[test]
fn structured_address_shares_key_with_free_text() {
    let structured = StructuredAddress {
        address_line_1: "15 Falls Road".into(),
        city: "Shelburne".into(),
        state: "VT".into(),
        postal_code: "05482".into(),
        ..Default::default()
    };
    assert_eq!(structured.to_formatted_string(), "15 Falls Road, Shelburne, VT, 05482");
    assert_eq!(
        address_key(&structured.to_formatted_string()),
        address_key("15 falls road, shelburne, vt, 05482")
    );
}

// =========================================================================
// Coordinates
// =========================================================================

#[test]
fn coordinates_within_precision_share_a_key() {
    assert_eq!(
        coordinate_key(37.422476, -122.084250),
        coordinate_key(37.4224764, -122.0842499)
    );
    assert_ne!(
        coordinate_key(37.422476, -122.084250),
        coordinate_key(37.42, -122.08)
    );
    assert_eq!(canonical_coordinates(37.422476, -122.08425), "37.42248,-122.08425");
}

#[test]
fn latitude_and_longitude_are_not_interchangeable() {
    assert_ne!(coordinate_key(10.0, 20.0), coordinate_key(20.0, 10.0));
}

// =========================================================================
// IP literals
// =========================================================================

#[test]
fn ip_literals_are_hashed_as_given() {
    assert_eq!(ip_key("8.8.8.8"), ip_key("8.8.8.8"));
    assert_ne!(ip_key("::1"), ip_key("0:0:0:0:0:0:0:1"));
    assert_ne!(ip_key("2001:DB8::1"), ip_key("2001:db8::1"));
}
