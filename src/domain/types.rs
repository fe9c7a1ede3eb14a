use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Needs action or a substantive reply.
    #[serde(rename = "Produtivo")]
    Productive,
    /// Informational, social or otherwise non-actionable.
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Productive => "Produtivo",
            Category::Unproductive => "Improdutivo",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub response: String,
}
