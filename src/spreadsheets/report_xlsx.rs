use crate::domain::market::MarketSnapshot;
use crate::domain::valuation::{ValuationInput, ValuationResult};
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Format, Workbook};

/// Build the downloadable valuation report. Fixed layout: branding header,
/// the point estimate, a property-details block, the price range, and a
/// market-analysis block when a snapshot was taken with the estimate. Pure
/// transformation, no I/O beyond the in-memory buffer.
pub fn build_report(
    input: &ValuationInput,
    result: &ValuationResult,
    market: Option<&MarketSnapshot>,
) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Valuation Report")?;

    let title_fmt = Format::new().set_bold().set_font_size(16);
    let section_fmt = Format::new().set_bold().set_font_size(12);
    let label_fmt = Format::new().set_bold();
    let money_fmt = Format::new().set_num_format("#,##0");
    let estimate_fmt = Format::new().set_bold().set_num_format("#,##0");

    worksheet.set_column_width(0, 28)?;
    worksheet.set_column_width(1, 24)?;

    worksheet.write_string_with_format(0, 0, "PropVal | Property Valuation Report", &title_fmt)?;

    worksheet.write_string_with_format(2, 0, "Estimated Value (BDT)", &label_fmt)?;
    worksheet.write_number_with_format(2, 1, result.estimated_value as f64, &estimate_fmt)?;

    // Property details
    worksheet.write_string_with_format(4, 0, "Property Details", &section_fmt)?;
    let details: [(&str, String); 8] = [
        ("Type", input.property_type.label().to_string()),
        ("Location", input.location.clone()),
        ("Area (sqft)", format!("{}", input.area_sqft)),
        (
            "Bedrooms",
            input.bedrooms.map(|n| n.to_string()).unwrap_or_default(),
        ),
        (
            "Bathrooms",
            input.bathrooms.map(|n| n.to_string()).unwrap_or_default(),
        ),
        ("Age (years)", input.age_years.to_string()),
        ("Condition", input.condition.label().to_string()),
        ("Amenities", input.amenities_joined()),
    ];
    let mut row = 5;
    for (label, value) in &details {
        worksheet.write_string_with_format(row, 0, *label, &label_fmt)?;
        worksheet.write_string(row, 1, value.as_str())?;
        row += 1;
    }

    // Price range
    row += 1;
    worksheet.write_string_with_format(row, 0, "Price Range", &section_fmt)?;
    row += 1;
    let range: [(&str, i64); 4] = [
        ("Low Estimate", result.low_estimate),
        ("Point Estimate", result.estimated_value),
        ("High Estimate", result.high_estimate),
        ("Price per Sqft", result.price_per_sqft),
    ];
    for (label, value) in &range {
        worksheet.write_string_with_format(row, 0, *label, &label_fmt)?;
        worksheet.write_number_with_format(row, 1, *value as f64, &money_fmt)?;
        row += 1;
    }

    // Market analysis, only when a snapshot accompanied the estimate.
    if let Some(snap) = market {
        row += 1;
        worksheet.write_string_with_format(row, 0, "Market Analysis", &section_fmt)?;
        row += 1;

        worksheet.write_string_with_format(row, 0, "Avg Price per Sqft", &label_fmt)?;
        worksheet.write_number_with_format(row, 1, snap.avg_price_per_sqft as f64, &money_fmt)?;
        row += 1;
        worksheet.write_string_with_format(row, 0, "YoY Change (%)", &label_fmt)?;
        worksheet.write_number(row, 1, snap.yoy_change_pct)?;
        row += 1;
        worksheet.write_string_with_format(row, 0, "Active Listings", &label_fmt)?;
        worksheet.write_number(row, 1, snap.active_listings as f64)?;
        row += 1;
        worksheet.write_string_with_format(row, 0, "Avg Days on Market", &label_fmt)?;
        worksheet.write_number(row, 1, snap.avg_days_on_market as f64)?;
    }

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Build the report and wrap it as a download response.
pub fn export_valuation_report(
    input: &ValuationInput,
    result: &ValuationResult,
    market: Option<&MarketSnapshot>,
) -> ResultResp {
    let buffer = build_report(input, result, market)?;
    let filename = format!(
        "valuation_{}.xlsx",
        input
            .location
            .split(',')
            .next()
            .unwrap_or("report")
            .trim()
            .to_lowercase()
            .replace(' ', "_")
    );
    xlsx_response(buffer, &filename)
}
