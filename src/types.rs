// =============================================================================
// Shared types used across every scoring engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Categorical market bias attached to every confidence result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    #[serde(rename = "Neutral to Bullish")]
    NeutralToBullish,
    Neutral,
    #[serde(rename = "Neutral to Bearish")]
    NeutralToBearish,
    Bearish,
}

impl Default for Bias {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::NeutralToBullish => write!(f, "Neutral to Bullish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::NeutralToBearish => write!(f, "Neutral to Bearish"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Letter grade bucket. Variants are declared from worst to best so that the
/// derived `Ord` matches grade quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    D,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "C-")]
    CMinus,
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::D => "D",
            Self::DPlus => "D+",
            Self::CMinus => "C-",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::BMinus => "B-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::A => "A",
            Self::APlus => "A+",
        };
        write!(f, "{label}")
    }
}

/// Qualitative reading attached to a single layer component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Bullish,
    Bearish,
    Neutral,
    Moderate,
    Expanding,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Expanding => write!(f, "Expanding"),
        }
    }
}

/// Three-way direction used by the institutional signal and the deep
/// analysis layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    pub fn bias(self) -> Bias {
        match self {
            Self::Bullish => Bias::Bullish,
            Self::Bearish => Bias::Bearish,
            Self::Neutral => Bias::Neutral,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Bar interval requested from the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    /// Parse the short codes used by the price feed (`d`, `w`, `m`) as well
    /// as the long names. Unknown codes fall back to daily.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "w" | "1wk" | "weekly" => Self::Weekly,
            "m" | "1mo" | "monthly" => Self::Monthly,
            _ => Self::Daily,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}
