//! Per-operator report model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::NormalizedRecord;

/// Everything the document renderer needs for one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorReport {
    /// The operator the document is addressed to.
    pub operator: String,
    /// Document file name, e.g. `Report_Mario_Rossi.pdf`.
    pub file_name: String,
    /// The operator's records, in output order.
    pub records: Vec<NormalizedRecord>,
    /// Sum of the records' totals.
    pub total: Decimal,
    /// `total` rendered as a currency string.
    pub total_formatted: String,
}
