pub mod instrument;
pub mod plan;
pub mod price;
pub mod valuation;

pub use instrument::InstrumentMatch;
pub use plan::Plan;
pub use price::{PricePoint, PriceSeries, PriceSource};
pub use valuation::{ChartPoint, PerformanceCheck, ValuationResult};
