//! # Rates Cache
//!
//! A generic, process-wide in-memory cache mapping string keys to
//! time-stamped entries, each carrying its own TTL.
//!
//! The cache has no knowledge of what it stores: payloads are opaque and
//! heterogeneous, read back through a checked downcast. Entries are never
//! expired by time alone - a stale entry remains readable until it is
//! overwritten or explicitly removed, which is what lets callers fall back
//! to stale data when a refresh fails.
//!
//! No operation here blocks, fails, or performs IO.

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::MemoryCache;
