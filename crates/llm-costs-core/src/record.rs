use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Unit tag shared by every price field. All prices are per 1,000 tokens;
/// no per-record unit variation exists.
pub const PRICE_UNIT: &str = "per 1K tokens";

/// Normalized pricing for one model variant, as harvested from a table row.
///
/// Absent prices stay `None` and serialize as `null`; downstream readers
/// of the snapshot rely on every key being present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecord {
    pub input_price: Option<f64>,
    pub output_price: Option<f64>,
    #[serde(default)]
    pub batch_input_price: Option<f64>,
    #[serde(default)]
    pub batch_output_price: Option<f64>,
    #[serde(default)]
    pub cache_write_price: Option<f64>,
    #[serde(default)]
    pub cache_read_price: Option<f64>,
    pub unit: String,
    pub provider: String,
    pub region: String,
}

impl PricingRecord {
    /// Whether at least one of the primary prices is known. Records where
    /// this is false are still kept in the set, so a lookup can answer
    /// "pricing unavailable" instead of "model not found".
    pub fn has_pricing(&self) -> bool {
        self.input_price.is_some() || self.output_price.is_some()
    }
}

/// The harvested record set, keyed by model id.
///
/// Backed by a [`BTreeMap`] so iteration is deterministic and sorted by
/// model id, the order the resolver's tie-break depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: BTreeMap<String, PricingRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under `model_id`, returning the record it displaced.
    ///
    /// Duplicate ids across tables resolve last-write-wins; the overwrite
    /// is logged rather than silent.
    pub fn insert(&mut self, model_id: String, record: PricingRecord) -> Option<PricingRecord> {
        let displaced = self.records.insert(model_id.clone(), record);
        if displaced.is_some() {
            debug!(model_id = %model_id, "duplicate model id, keeping the later record");
        }
        displaced
    }

    pub fn get(&self, model_id: &str) -> Option<&PricingRecord> {
        self.records.get(model_id)
    }

    /// Records in sorted model-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PricingRecord)> {
        self.records.iter().map(|(id, r)| (id.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
