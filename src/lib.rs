//! Stake calculators for arbitrage and cashback betting across 2 to 5 houses.
//!
//! The engine here is pure and synchronous; `main.rs` is the browser front end
//! that feeds it edits and renders what it reports.

pub mod distribute;
pub mod error;
pub mod leg;
pub mod logging;
pub mod odds;
pub mod report;
pub mod settings;
pub mod state;
pub mod surebet;

pub use distribute::{distribute, distribute_from, CashbackSolver};
pub use error::{CalculatorError, InputError};
pub use leg::{BetLeg, EditedField, LegEdit, LegKind};
pub use odds::effective_odd;
pub use report::{build_report, LegRow, ProfitClass, Report, Summary};
pub use settings::{CalculatorMode, Settings};
pub use state::{CalculatorState, LEG_POOL_SIZE, MIN_ACTIVE_LEGS};
pub use surebet::{plan_investment, InvestmentPlan, PlanRow};
