pub mod client;
pub mod deserializers;
pub mod envelope;
pub mod http_client;
pub mod kosha;
pub mod types;

pub use client::{CategoryFetcher, ClientConfig, ProxyOptions};
pub use kosha::KoshaClient;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Regulation categories understood by the smart-search service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Category {
    /// Every category (전체)
    All,
    /// Occupational Safety and Health Act (산업안전보건법)
    Law,
    /// Enforcement decree of the act (산업안전보건법 시행령)
    EnforcementDecree,
    /// Rules on occupational safety and health standards (산업안전보건기준에 관한 규칙)
    SafetyRules,
    /// Any other code, sent to the service unchanged
    Reserved(u32),
}

impl Category {
    /// Categories searched by the "main laws" command, in merge order
    pub const MAIN: [Category; 3] = [
        Category::Law,
        Category::EnforcementDecree,
        Category::SafetyRules,
    ];

    pub fn code(&self) -> u32 {
        match self {
            Self::All => 0,
            Self::Law => 1,
            Self::EnforcementDecree => 2,
            Self::SafetyRules => 4,
            Self::Reserved(code) => *code,
        }
    }

    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::All,
            1 => Self::Law,
            2 => Self::EnforcementDecree,
            4 => Self::SafetyRules,
            other => Self::Reserved(other),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u32>() {
            return Some(Self::from_code(code));
        }
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "law" | "act" => Some(Self::Law),
            "decree" | "enforcement-decree" => Some(Self::EnforcementDecree),
            "rules" | "safety-rules" => Some(Self::SafetyRules),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "전체",
            Self::Law => "산업안전보건법",
            Self::EnforcementDecree => "산업안전보건법 시행령",
            Self::SafetyRules => "산업안전보건기준에 관한 규칙",
            Self::Reserved(_) => "기타",
        }
    }
}

impl From<u32> for Category {
    fn from(code: u32) -> Self {
        Self::from_code(code)
    }
}

impl From<Category> for u32 {
    fn from(category: Category) -> Self {
        category.code()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(코드:{})", self.display_name(), self.code())
    }
}
