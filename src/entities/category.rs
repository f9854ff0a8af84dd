// 🏷️ Category - Closed set of catalogue categories
//
// The sheet's category column is free text typed by curators. Anything
// outside the known set is coerced to Other rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartupCategory {
    #[serde(rename = "SaaS")]
    SaaS,
    #[serde(rename = "AI")]
    Ai,
    Fintech,
    #[serde(rename = "E-commerce")]
    ECommerce,
    Health,
    Education,
    Productivity,
    Other,
}

impl StartupCategory {
    pub const ALL: [StartupCategory; 8] = [
        StartupCategory::SaaS,
        StartupCategory::Ai,
        StartupCategory::Fintech,
        StartupCategory::ECommerce,
        StartupCategory::Health,
        StartupCategory::Education,
        StartupCategory::Productivity,
        StartupCategory::Other,
    ];

    /// Member used for anything outside the set
    pub const FALLBACK: StartupCategory = StartupCategory::Other;

    pub fn as_str(&self) -> &'static str {
        match self {
            StartupCategory::SaaS => "SaaS",
            StartupCategory::Ai => "AI",
            StartupCategory::Fintech => "Fintech",
            StartupCategory::ECommerce => "E-commerce",
            StartupCategory::Health => "Health",
            StartupCategory::Education => "Education",
            StartupCategory::Productivity => "Productivity",
            StartupCategory::Other => "Other",
        }
    }

    /// Exact (case-sensitive) lookup
    pub fn parse(value: &str) -> Option<StartupCategory> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    /// Lookup that never fails: unknown or blank → Other
    pub fn coerce(value: &str) -> StartupCategory {
        Self::parse(value.trim()).unwrap_or(Self::FALLBACK)
    }
}

impl fmt::Display for StartupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
