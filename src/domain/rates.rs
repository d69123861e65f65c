// src/domain/rates.rs

/// Base rate (BDT per sqft) assumed when a location is not in the table.
pub const DEFAULT_RATE: f64 = 6000.0;

/// Location -> base rate table, BDT per sqft. Keys are the exact strings
/// offered by the location dropdown.
const BASE_RATES: &[(&str, f64)] = &[
    ("Gulshan, Dhaka", 22000.0),
    ("Banani, Dhaka", 20000.0),
    ("Baridhara, Dhaka", 21000.0),
    ("Dhanmondi, Dhaka", 15000.0),
    ("Uttara, Dhaka", 12000.0),
    ("Bashundhara, Dhaka", 13000.0),
    ("Mirpur, Dhaka", 8500.0),
    ("Mohammadpur, Dhaka", 9000.0),
    ("Khulshi, Chattogram", 11000.0),
    ("Agrabad, Chattogram", 9500.0),
    ("Sylhet", 7500.0),
    ("Khulna", 6500.0),
];

/// Look up the base rate for a location, if we track it.
pub fn base_rate(location: &str) -> Option<f64> {
    BASE_RATES
        .iter()
        .find(|(name, _)| *name == location)
        .map(|(_, rate)| *rate)
}

/// Base rate for a location, falling back to [`DEFAULT_RATE`]. An unknown
/// location is not an error, just a worse estimate, so we only warn.
pub fn base_rate_or_default(location: &str) -> f64 {
    match base_rate(location) {
        Some(rate) => rate,
        None => {
            eprintln!("No base rate for location '{location}', using default {DEFAULT_RATE}");
            DEFAULT_RATE
        }
    }
}

/// The locations we carry rates for, in table order. Feeds the form dropdown.
pub fn known_locations() -> impl Iterator<Item = &'static str> {
    BASE_RATES.iter().map(|(name, _)| *name)
}
