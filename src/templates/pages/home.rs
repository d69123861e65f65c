// templates/pages/home.rs

use crate::domain::rates::known_locations;
use crate::domain::valuation::{Condition, PropertyType};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Amenity checkboxes offered on the form. Each adds 2% to the estimate,
/// capped at 15% overall.
pub const AMENITY_OPTIONS: [&str; 8] = [
    "Lift",
    "Generator",
    "Parking",
    "Security",
    "Gas Connection",
    "Rooftop Access",
    "Swimming Pool",
    "Gym",
];

pub fn home_page(signed_in: bool) -> Markup {
    desktop_layout(
        "New Valuation",
        signed_in,
        html! {
            main class="container" {
                h1 { "Property Valuation" }
                p class="lead" {
                    "Get an instant estimate based on location, size and condition."
                }

                form action="/estimate" method="post" class="valuation-form" {
                    label for="location" { "Location" }
                    select id="location" name="location" required {
                        @for loc in known_locations() {
                            option value=(loc) { (loc) }
                        }
                    }

                    label for="property_type" { "Property type" }
                    select id="property_type" name="property_type" required {
                        @for pt in PropertyType::ALL {
                            option value=(pt.as_str()) { (pt.label()) }
                        }
                    }

                    label for="area_sqft" { "Area (sqft)" }
                    input type="number" id="area_sqft" name="area_sqft" min="1" step="any" required;

                    label for="bedrooms" { "Bedrooms" }
                    input type="number" id="bedrooms" name="bedrooms" min="0";

                    label for="bathrooms" { "Bathrooms" }
                    input type="number" id="bathrooms" name="bathrooms" min="0";

                    label for="age_years" { "Age (years)" }
                    input type="number" id="age_years" name="age_years" min="0" value="0";

                    label for="condition" { "Condition" }
                    select id="condition" name="condition" required {
                        @for cond in Condition::ALL {
                            option value=(cond.as_str()) { (cond.label()) }
                        }
                    }

                    fieldset class="amenities" {
                        legend { "Amenities" }
                        @for amenity in AMENITY_OPTIONS {
                            label class="checkbox" {
                                input type="checkbox" name="amenity" value=(amenity);
                                (amenity)
                            }
                        }
                    }

                    button type="submit" { "Estimate value" }
                }
            }
        },
    )
}
