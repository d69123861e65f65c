pub mod report_xlsx;

pub use report_xlsx::{build_report, export_valuation_report};
