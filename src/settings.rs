//! Start-up configuration read from the page's query string,
//! e.g. `?houses=4&mode=surebet&solver=relaxed&log=debug`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::distribute::CashbackSolver;
use crate::error::CalculatorError;
use crate::state::{LEG_POOL_SIZE, MIN_ACTIVE_LEGS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorMode {
    /// Fix one house's stake and equalize the others (cashback, freebets, boosts).
    #[default]
    Cashback,
    /// Split a total investment across houses in inverse proportion to their odds.
    Surebet,
}

impl CalculatorMode {
    pub fn all() -> &'static [(Self, &'static str)] {
        &[(Self::Cashback, "Cashback"), (Self::Surebet, "Surebet")]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub houses: usize,
    pub mode: CalculatorMode,
    pub solver: CashbackSolver,
    pub log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            houses: 3,
            mode: CalculatorMode::default(),
            solver: CashbackSolver::default(),
            log: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_query(query: &str) -> Result<Self, CalculatorError> {
        let query = query.trim_start_matches('?');
        let settings: Self = serde_urlencoded::from_str(query)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CalculatorError> {
        if !(MIN_ACTIVE_LEGS..=LEG_POOL_SIZE).contains(&self.houses) {
            return Err(CalculatorError::LegCount(self.houses));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level, CalculatorError> {
        Level::from_str(self.log.trim()).map_err(|_| CalculatorError::LogLevel(self.log.clone()))
    }
}
