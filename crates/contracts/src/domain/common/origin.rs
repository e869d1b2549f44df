use serde::{Deserialize, Serialize};

/// Where an aggregate's data originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Created and owned by this system
    #[serde(rename = "self")]
    Self_,
    /// Imported from an external system
    External,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Self_ => "self",
            Origin::External => "external",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
