pub mod error;
pub mod extract;
#[cfg(feature = "network")]
pub mod fetch;
pub mod record;
pub mod resolve;
pub mod similarity;
pub mod snapshot;
pub mod store;

pub use error::CostsError;
pub use record::{PricingRecord, RecordSet};
pub use resolve::{resolve_and_cost, CostResult, ResolveError};
pub use snapshot::{Snapshot, SnapshotStore};
