use crate::db::valuations::ValuationRecord;
use crate::templates::components::{card, fmt_money};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct DashboardVm {
    pub email: String,
    pub records: Vec<ValuationRecord>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "My Valuations",
        true,
        html! {
            main class="container" {
                h1 { "My Valuations" }
                p { "Signed in as " strong { (vm.email) } }

                @if vm.records.is_empty() {
                    (card("No saved valuations", html! {
                        p { "Estimates you save will show up here." }
                        a href="/" { "Run a valuation" }
                    }))
                } @else {
                    (card("Saved valuations", html! {
                        table class="valuations" {
                            tr {
                                th { "Saved" }
                                th { "Property" }
                                th { "Area (sqft)" }
                                th { "Estimate (BDT)" }
                                th { "Range (BDT)" }
                                th { }
                            }
                            @for record in &vm.records {
                                tr {
                                    td { (record.created_at.format("%Y-%m-%d %H:%M")) }
                                    td {
                                        (record.property_type.label())
                                        ", "
                                        (record.location)
                                    }
                                    td { (record.area_sqft) }
                                    td { (fmt_money(record.result.estimated_value)) }
                                    td {
                                        (fmt_money(record.result.low_estimate))
                                        " - "
                                        (fmt_money(record.result.high_estimate))
                                    }
                                    td class="row-actions" {
                                        a href={ "/valuations/export?id=" (record.id) } { "Report" }
                                        form action="/valuations/delete" method="post" class="inline" {
                                            input type="hidden" name="id" value=(record.id);
                                            button type="submit" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }))
                }
            }
        },
    )
}
