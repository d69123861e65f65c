use crate::domain::market::{Comparable, MarketSnapshot};
use crate::domain::valuation::{ValuationInput, ValuationResult};
use crate::templates::components::{card, fmt_money};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct ResultsVm {
    pub input: ValuationInput,
    pub result: ValuationResult,
    pub market: MarketSnapshot,
    pub comparables: Vec<Comparable>,
    pub signed_in: bool,
}

pub fn results_page(vm: &ResultsVm) -> Markup {
    desktop_layout(
        "Estimate",
        vm.signed_in,
        html! {
            main class="container" {
                h1 { "Estimated Value" }
                p class="estimate-highlight" {
                    strong { "BDT " (fmt_money(vm.result.estimated_value)) }
                }
                p class="estimate-range" {
                    "Range: BDT " (fmt_money(vm.result.low_estimate))
                    " to BDT " (fmt_money(vm.result.high_estimate))
                    " (" (fmt_money(vm.result.price_per_sqft)) " per sqft)"
                }

                (card("Property Details", html! {
                    table {
                        tr { th { "Type" }      td { (vm.input.property_type.label()) } }
                        tr { th { "Location" }  td { (vm.input.location) } }
                        tr { th { "Area" }      td { (vm.input.area_sqft) " sqft" } }
                        @if let Some(beds) = vm.input.bedrooms {
                            tr { th { "Bedrooms" } td { (beds) } }
                        }
                        @if let Some(baths) = vm.input.bathrooms {
                            tr { th { "Bathrooms" } td { (baths) } }
                        }
                        tr { th { "Age" }       td { (vm.input.age_years) " years" } }
                        tr { th { "Condition" } td { (vm.input.condition.label()) } }
                        tr { th { "Amenities" } td { (vm.input.amenities_joined()) } }
                    }
                }))

                (card("Market Context", html! {
                    table {
                        tr { th { "Avg price per sqft" } td { "BDT " (fmt_money(vm.market.avg_price_per_sqft)) } }
                        tr { th { "Year over year" }     td { (vm.market.yoy_change_pct) "%" } }
                        tr { th { "Active listings" }    td { (vm.market.active_listings) } }
                        tr { th { "Avg days on market" } td { (vm.market.avg_days_on_market) } }
                    }
                    p class="fine-print" { "Simulated market figures for context only." }
                }))

                (card("Similar Properties", html! {
                    table {
                        tr { th { "Listing" } th { "Area (sqft)" } th { "Price (BDT)" } }
                        @for comp in &vm.comparables {
                            tr {
                                td { (comp.title) }
                                td { (comp.area_sqft) }
                                td { (fmt_money(comp.price)) }
                            }
                        }
                    }
                }))

                div class="actions" {
                    form action="/estimate/export" method="post" class="inline" {
                        (input_hidden_fields(&vm.input))
                        button type="submit" { "Download report" }
                    }
                    @if vm.signed_in {
                        form action="/valuations" method="post" class="inline" {
                            (input_hidden_fields(&vm.input))
                            button type="submit" { "Save valuation" }
                        }
                    } @else {
                        p { a href="/login" { "Sign in" } " to save this valuation." }
                    }
                }
            }
        },
    )
}

/// Round-trips a validated input through a follow-up form post.
fn input_hidden_fields(input: &ValuationInput) -> Markup {
    html! {
        input type="hidden" name="property_type" value=(input.property_type.as_str());
        input type="hidden" name="location" value=(input.location);
        input type="hidden" name="area_sqft" value=(input.area_sqft);
        @if let Some(beds) = input.bedrooms {
            input type="hidden" name="bedrooms" value=(beds);
        }
        @if let Some(baths) = input.bathrooms {
            input type="hidden" name="bathrooms" value=(baths);
        }
        input type="hidden" name="age_years" value=(input.age_years);
        input type="hidden" name="condition" value=(input.condition.as_str());
        input type="hidden" name="amenities" value=(input.amenities_joined());
    }
}
