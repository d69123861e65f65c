pub mod market;
pub mod rates;
pub mod valuation;
