use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A portfolio line as submitted by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: i64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: i64) -> Result<Self, DomainError> {
        let holding = Self {
            symbol: symbol.into().trim().to_string(),
            quantity,
        };
        holding.validate()?;
        Ok(holding)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.symbol.trim().is_empty() {
            return Err(DomainError::InvalidInput("Holding symbol must not be empty".into()));
        }
        if self.quantity <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "Quantity for {} must be positive, got {}",
                self.symbol, self.quantity
            )));
        }
        Ok(())
    }
}

impl std::str::FromStr for Holding {
    type Err = DomainError;

    /// Parses `SYMBOL:QTY`, e.g. `TCS:10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, qty) = s
            .rsplit_once(':')
            .ok_or_else(|| DomainError::InvalidInput(format!("Expected SYMBOL:QTY, got {s}")))?;
        let quantity = qty
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::InvalidInput(format!("Bad quantity in {s}: {e}")))?;
        Holding::new(symbol, quantity)
    }
}

/// A holding after the sector analyzer has labelled it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedHolding {
    pub symbol: String,
    pub quantity: i64,
    pub sector: String,
}
