use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskAppetite {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskAppetite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskAppetite::Low => write!(f, "Low"),
            RiskAppetite::Moderate => write!(f, "Moderate"),
            RiskAppetite::High => write!(f, "High"),
        }
    }
}

impl FromStr for RiskAppetite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "conservative" => Ok(RiskAppetite::Low),
            "moderate" | "medium" => Ok(RiskAppetite::Moderate),
            "high" | "aggressive" => Ok(RiskAppetite::High),
            _ => Err(format!("Unknown risk appetite: {s} (expected Low, Moderate or High)")),
        }
    }
}

// Accept any casing on the wire.
impl<'de> Deserialize<'de> for RiskAppetite {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
