use serde::{Deserialize, Serialize};

/// A single hit from an instrument search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentMatch {
    pub symbol: String,
    pub name: String,
    pub instrument_type: String,
    pub region: String,
}
