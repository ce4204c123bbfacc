//! # Dashload Queries
//!
//! Shared query model for the dashboard extractor and the test plan generator.
//!
//! ```text
//! QueryCollection
//!     ├─ instant_queries: hash-key -> InstantQuery { query, time }
//!     └─ range_queries:   hash-key -> RangeQuery { query, start, end, step }
//! ```
//!
//! Keys are content fingerprints (see [`InstantQuery::hash_key`]), so structurally
//! equal queries collapse to one entry. Two different queries sharing a fingerprint
//! is possible in principle; the later insertion silently replaces the earlier one.

mod collection;
mod error;
mod fingerprint;
mod types;

pub use collection::QueryCollection;
pub use error::{QueryError, Result};
pub use types::{InstantQuery, RangeQuery, TimeParam};
