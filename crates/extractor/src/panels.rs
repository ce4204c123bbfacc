use std::collections::BTreeMap;

/// Kind of query a panel visualizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Single value panels
    Instant,
    /// Time series panels
    Range,
}

/// Panel `type` value to query kind table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelKinds {
    kinds: BTreeMap<String, QueryKind>,
}

impl Default for PanelKinds {
    fn default() -> Self {
        Self::empty()
            .with_instant("gauge")
            .with_instant("singlestat")
            .with_range("graph")
    }
}

impl PanelKinds {
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    pub fn with_instant(mut self, panel_type: impl Into<String>) -> Self {
        self.kinds.insert(panel_type.into(), QueryKind::Instant);
        self
    }

    pub fn with_range(mut self, panel_type: impl Into<String>) -> Self {
        self.kinds.insert(panel_type.into(), QueryKind::Range);
        self
    }

    pub fn kind_of(&self, panel_type: &str) -> Option<QueryKind> {
        self.kinds.get(panel_type).copied()
    }
}
