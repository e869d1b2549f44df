use serde::{Deserialize, Serialize};

/// Kind of a stock-keeping location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// Warehouse: receives boxed goods, runs box-to-pair counting
    Warehouse,
    /// Store: sells pair-level stock
    Store,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Warehouse => "warehouse",
            LocationKind::Store => "store",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "warehouse" => Ok(LocationKind::Warehouse),
            "store" => Ok(LocationKind::Store),
            other => Err(format!("Unknown location kind: {}", other)),
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
