//! # Dashload Extractor
//!
//! Walks a Grafana dashboard document and collects the PromQL expressions it contains.
//!
//! Two modes, because dashboard schemas drift between Grafana versions:
//!
//! - **Panels**: a node holding both `type` and `targets` is a panel. Its type decides
//!   the query kind (`gauge`/`singlestat` are instant, `graph` is range) and every
//!   target's `expr` becomes one query.
//! - **Key**: every string value stored under a given key (usually `expr`), anywhere
//!   in the document, becomes a range query.
//!
//! Extraction never fails. Nodes that do not look like panels are walked through
//! and otherwise ignored.

mod panels;
mod walker;

pub use panels::{PanelKinds, QueryKind};
pub use walker::{extract, find_key, find_queries, ExtractMode};
