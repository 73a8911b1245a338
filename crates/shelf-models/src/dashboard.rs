//! Dashboard chart series

use serde::{Deserialize, Serialize};

/// Cumulative asset count at the end of a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAssetTotal {
    /// Short month label, e.g. `"Jan 2024"`
    pub month: String,
    /// Chart category key
    #[serde(rename = "Total assets")]
    pub total: i64,
}
