pub mod benchmark;
pub mod fallback;
pub mod market_data;
pub mod schedule;
pub mod valuation;
pub mod xirr;
