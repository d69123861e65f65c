// src/domain/valuation.rs

use crate::domain::rates::base_rate_or_default;
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Closed set of property types we price. Keeping this an enum (rather than
/// a string keyed into a table) means an unrecognized type is caught at the
/// boundary instead of producing a garbage multiplier downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Duplex,
    Penthouse,
    Commercial,
    Land,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Villa,
        PropertyType::Duplex,
        PropertyType::Penthouse,
        PropertyType::Commercial,
        PropertyType::Land,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            PropertyType::Apartment => 1.0,
            PropertyType::House => 1.15,
            PropertyType::Villa => 1.4,
            PropertyType::Duplex => 1.25,
            PropertyType::Penthouse => 1.5,
            PropertyType::Commercial => 1.3,
            PropertyType::Land => 0.6,
        }
    }

    /// Form value / storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Villa => "villa",
            PropertyType::Duplex => "duplex",
            PropertyType::Penthouse => "penthouse",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }

    /// Human label, also used for comparable titles.
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Villa => "Villa",
            PropertyType::Duplex => "Duplex",
            PropertyType::Penthouse => "Penthouse",
            PropertyType::Commercial => "Commercial Space",
            PropertyType::Land => "Land Plot",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ServerError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown property type '{s}'")))
    }
}

/// Condition grades. Closed for the same reason as [`PropertyType`]; there is
/// deliberately no default multiplier here, condition is a required input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Excellent,
    Good,
    Average,
    NeedsRenovation,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Average,
        Condition::NeedsRenovation,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            Condition::Excellent => 1.2,
            Condition::Good => 1.0,
            Condition::Average => 0.85,
            Condition::NeedsRenovation => 0.7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Average => "average",
            Condition::NeedsRenovation => "needs-renovation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Average => "Average",
            Condition::NeedsRenovation => "Needs Renovation",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ServerError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown condition '{s}'")))
    }
}

/// One valuation request, as collected from the form (or the JSON API).
/// Bedrooms and bathrooms are display-only; they never enter the formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationInput {
    pub property_type: PropertyType,
    pub location: String,
    pub area_sqft: f64,
    #[serde(default)]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    pub bathrooms: Option<i64>,
    #[serde(default)]
    pub age_years: u32,
    pub condition: Condition,
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl ValuationInput {
    /// Builds and validates an input from decoded form pairs. This is the
    /// anti-corruption layer between raw form data and the estimator: every
    /// required field must be present and parseable or we reject the request.
    pub fn from_form(pairs: &[(String, String)]) -> Result<Self, ServerError> {
        let get = |key: &str| -> Option<&str> {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
        };

        let property_type = PropertyType::parse(
            get("property_type").ok_or_else(|| ServerError::BadRequest("missing property type".into()))?,
        )?;
        let condition = Condition::parse(
            get("condition").ok_or_else(|| ServerError::BadRequest("missing condition".into()))?,
        )?;
        let location = get("location")
            .ok_or_else(|| ServerError::BadRequest("missing location".into()))?
            .to_string();

        let area_sqft: f64 = get("area_sqft")
            .ok_or_else(|| ServerError::BadRequest("missing area".into()))?
            .parse()
            .map_err(|_| ServerError::BadRequest("area must be a number".into()))?;

        let parse_opt_int = |key: &str| -> Result<Option<i64>, ServerError> {
            get(key)
                .map(|v| {
                    let n = v.parse::<i64>().map_err(|_| {
                        ServerError::BadRequest(format!("{key} must be a whole number"))
                    })?;
                    if n < 0 {
                        return Err(ServerError::BadRequest(format!(
                            "{key} cannot be negative"
                        )));
                    }
                    Ok(n)
                })
                .transpose()
        };

        let age_years: u32 = match get("age_years") {
            Some(v) => v
                .parse()
                .map_err(|_| ServerError::BadRequest("age must be a non-negative whole number".into()))?,
            None => 0,
        };

        // Amenities arrive either as repeated checkbox fields ("amenity") or
        // as one comma-joined hidden field ("amenities") when a results page
        // round-trips the input.
        let mut amenities: Vec<String> = pairs
            .iter()
            .filter(|(k, _)| k == "amenity")
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if amenities.is_empty() {
            if let Some(joined) = get("amenities") {
                amenities = joined
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }

        let input = ValuationInput {
            property_type,
            location,
            area_sqft,
            bedrooms: parse_opt_int("bedrooms")?,
            bathrooms: parse_opt_int("bathrooms")?,
            age_years,
            condition,
            amenities,
        };
        input.validate()?;
        Ok(input)
    }

    /// Structural checks that the type system cannot express.
    pub fn validate(&self) -> Result<(), ServerError> {
        if !self.area_sqft.is_finite() || self.area_sqft <= 0.0 {
            return Err(ServerError::BadRequest(
                "area must be a positive number of sqft".into(),
            ));
        }
        Ok(())
    }

    /// Deduplicated, non-blank amenities. Only the count enters the formula,
    /// a duplicated checkbox must not double its bonus.
    pub fn unique_amenities(&self) -> BTreeSet<&str> {
        self.amenities
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect()
    }

    pub fn amenities_joined(&self) -> String {
        self.unique_amenities().into_iter().collect::<Vec<_>>().join(", ")
    }
}

/// The computed figures for one input. All derived values come from the
/// *rounded* point estimate, matching how the numbers are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub estimated_value: i64,
    pub low_estimate: i64,
    pub high_estimate: i64,
    pub price_per_sqft: i64,
}

impl ValuationResult {
    pub fn from_raw_estimate(raw: f64, area_sqft: f64) -> Self {
        let estimated_value = raw.round() as i64;
        ValuationResult {
            estimated_value,
            low_estimate: (estimated_value as f64 * 0.9).round() as i64,
            high_estimate: (estimated_value as f64 * 1.1).round() as i64,
            price_per_sqft: (estimated_value as f64 / area_sqft).round() as i64,
        }
    }
}

/// The point estimate before rounding.
///
/// Pure multiplicative model: location base rate x area, scaled by type,
/// condition, linear age depreciation (floored at 70%) and an amenity bonus
/// (2% each, capped at 15%).
pub fn estimate(input: &ValuationInput) -> Result<f64, ServerError> {
    input.validate()?;

    let base = base_rate_or_default(&input.location);
    let age_multiplier = (1.0 - input.age_years as f64 * 0.015).max(0.7);
    let amenities_bonus = (input.unique_amenities().len() as f64 * 0.02).min(0.15);

    Ok(base
        * input.area_sqft
        * input.property_type.multiplier()
        * input.condition.multiplier()
        * age_multiplier
        * (1.0 + amenities_bonus))
}

/// Full valuation: validate, estimate, round, derive the range figures.
pub fn run_valuation(input: &ValuationInput) -> Result<ValuationResult, ServerError> {
    let raw = estimate(input)?;
    let result = ValuationResult::from_raw_estimate(raw, input.area_sqft);
    // A degenerate input (area so small the rounded value vanishes, or is
    // small enough that the rounded low bound collapses onto the estimate)
    // produces figures nothing downstream can display sensibly.
    if result.estimated_value <= 0 || result.low_estimate >= result.estimated_value {
        return Err(ServerError::BadRequest(
            "area too small to produce a meaningful estimate".into(),
        ));
    }
    Ok(result)
}
