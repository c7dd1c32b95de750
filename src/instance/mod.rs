//! Tournament instance: entity store, meeting queries and derived metrics.
//!
//! [`Instance`] owns the complete tournament model for one validation run:
//!
//! - **`store`**: entities keyed by id, meeting generation and scheduling,
//!   distance / cost / carry-over weight data, declared objective values
//! - **`query`**: filtered views of the scheduled meetings
//! - **`metrics`**: distance, breaks, cost and carry-over per team or league
//!
//! Queries read a chronological index of the scheduled meetings that is
//! built on first use and dropped by every mutation.

mod metrics;
mod query;
mod store;

pub use store::{Instance, InstanceMetadata};

pub(crate) use store::report;
