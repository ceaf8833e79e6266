use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a price series came from. Synthetic series are emergency data
/// and must stay distinguishable from real market quotes all the way to
/// the valuation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Market,
    Synthetic,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Synthetic => "synthetic",
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic)
    }
}

/// A single NAV sample for an instrument on a date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub nav: f64,
}

/// An ordered-by-date, date-deduplicated sequence of price points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    source: PriceSource,
}

impl PriceSeries {
    /// Build a series from raw samples: non-positive navs are dropped,
    /// points are sorted by date, and the first sample seen for each
    /// date wins (stable sort keeps input order within a date).
    pub fn new(mut points: Vec<PricePoint>, source: PriceSource) -> Self {
        points.retain(|p| p.nav.is_finite() && p.nav > 0.0);
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points, source }
    }

    pub fn empty(source: PriceSource) -> Self {
        Self {
            points: Vec::new(),
            source,
        }
    }

    pub fn source(&self) -> PriceSource {
        self.source
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
