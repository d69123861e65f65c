// src/domain/market.rs
//
// Simulated market context shown beside an estimate. These figures are
// synthesized around the location's base rate, not aggregated from stored
// records, and nothing here is persisted: every request gets a fresh draw.

use crate::domain::rates::base_rate_or_default;
use crate::domain::valuation::PropertyType;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub avg_price_per_sqft: i64,
    /// Year-over-year movement, one decimal place, in [-4.5, 10.5).
    pub yoy_change_pct: f64,
    pub active_listings: i64,
    pub avg_days_on_market: i64,
}

/// A synthetic listing used only for the "similar properties" panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparable {
    pub title: String,
    pub area_sqft: i64,
    pub price: i64,
}

/// Draw a market snapshot for a location. Generic over the RNG so tests can
/// pass a seeded one; the web handlers use [`synthesize`].
pub fn synthesize_with<R: Rng>(rng: &mut R, location: &str) -> MarketSnapshot {
    let base = base_rate_or_default(location);

    let avg_price_per_sqft = (base * (1.0 + (rng.gen::<f64>() * 0.2 - 0.1))).round() as i64;
    let yoy_change_pct = (((rng.gen::<f64>() - 0.3) * 15.0) * 10.0).round() / 10.0;
    let active_listings = (rng.gen::<f64>() * 150.0).floor() as i64 + 50;
    let avg_days_on_market = (rng.gen::<f64>() * 60.0).floor() as i64 + 20;

    MarketSnapshot {
        avg_price_per_sqft,
        yoy_change_pct,
        active_listings,
        avg_days_on_market,
    }
}

pub fn synthesize(location: &str) -> MarketSnapshot {
    synthesize_with(&mut rand::thread_rng(), location)
}

/// Four synthetic comparables around the subject property. Sizes wander
/// +/-20% from the subject, rates +/-15% from the location base rate. No
/// dedup, two draws may coincide.
pub fn comparables_with<R: Rng>(
    rng: &mut R,
    location: &str,
    property_type: PropertyType,
    area_sqft: f64,
) -> Vec<Comparable> {
    let base = base_rate_or_default(location);
    let area_label = location.split(',').next().unwrap_or(location).trim();

    (0..4)
        .map(|_| {
            let area_variation = area_sqft * (0.8 + rng.gen::<f64>() * 0.4);
            let rate_variation = base * (0.85 + rng.gen::<f64>() * 0.3);
            Comparable {
                title: format!("{} in {}", property_type.label(), area_label),
                area_sqft: area_variation.round() as i64,
                price: (rate_variation * area_variation).round() as i64,
            }
        })
        .collect()
}

pub fn comparables(location: &str, property_type: PropertyType, area_sqft: f64) -> Vec<Comparable> {
    comparables_with(&mut rand::thread_rng(), location, property_type, area_sqft)
}
