use dashload_queries::{InstantQuery, QueryCollection, RangeQuery};
use log::debug;
use serde_json::{Map, Value};

use crate::panels::{PanelKinds, QueryKind};

/// How queries are recognized inside a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractMode {
    /// Typed panels (`type` + `targets[].expr`)
    Panels(PanelKinds),
    /// Any string stored under this key, as a range query
    Key(String),
}

impl Default for ExtractMode {
    fn default() -> Self {
        Self::Panels(PanelKinds::default())
    }
}

pub fn extract(dashboard: &Value, mode: &ExtractMode) -> QueryCollection {
    match mode {
        ExtractMode::Panels(kinds) => find_queries(dashboard, kinds),
        ExtractMode::Key(key) => find_key(dashboard, key),
    }
}

/// Depth-first panel search.
///
/// Object values are all visited; array elements only when they are objects.
pub fn find_queries(node: &Value, kinds: &PanelKinds) -> QueryCollection {
    let mut queries = QueryCollection::new();
    match node {
        Value::Object(fields) => {
            queries.merge(panel_queries(fields, kinds));
            for value in fields.values() {
                queries.merge(find_queries(value, kinds));
            }
        }
        Value::Array(items) => {
            for item in items.iter().filter(|item| item.is_object()) {
                queries.merge(find_queries(item, kinds));
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
    queries
}

/// Depth-first search for `key`, recursing through objects and arrays alike.
pub fn find_key(node: &Value, key: &str) -> QueryCollection {
    let mut queries = QueryCollection::new();
    match node {
        Value::Object(fields) => {
            if let Some(expr) = fields.get(key).and_then(expression) {
                debug!("Found range query under '{key}': {expr}");
                queries.add_range_query(RangeQuery::new(expr));
            }
            for value in fields.values() {
                queries.merge(find_key(value, key));
            }
        }
        Value::Array(items) => {
            for item in items {
                queries.merge(find_key(item, key));
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
    queries
}

fn panel_queries(fields: &Map<String, Value>, kinds: &PanelKinds) -> QueryCollection {
    let mut queries = QueryCollection::new();
    let (Some(panel_type), Some(targets)) = (fields.get("type"), fields.get("targets")) else {
        return queries;
    };
    let Some(panel_type) = panel_type.as_str() else {
        return queries;
    };
    let Some(kind) = kinds.kind_of(panel_type) else {
        return queries;
    };
    let Some(targets) = targets.as_array() else {
        return queries;
    };

    for expr in targets
        .iter()
        .filter_map(|target| target.get("expr"))
        .filter_map(expression)
    {
        debug!("Found {kind:?} query in {panel_type} panel: {expr}");
        match kind {
            QueryKind::Instant => {
                queries.add_instant_query(InstantQuery::new(expr));
            }
            QueryKind::Range => {
                queries.add_range_query(RangeQuery::new(expr));
            }
        }
    }
    queries
}

/// Non-blank string expression; anything else is not a query.
fn expression(value: &Value) -> Option<&str> {
    value.as_str().filter(|expr| !expr.trim().is_empty())
}
