//! Stake distribution: holds one leg's stake fixed and derives the stakes of
//! every other leg so that net profit is the same whichever leg wins.
//!
//! With cashback, `profit(k) = payout(k) - cashback(k) + C`, where `C` (total
//! invested and total cashback) is shared by all outcomes. Equal profit therefore
//! only requires `payout(k) - cashback(k)` to match the anchor's.

use serde::{Deserialize, Serialize};

use crate::leg::{BetLeg, LegKind};
use crate::odds::{effective_odd, lay_liability, payout_multiplier, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashbackSolver {
    /// Solves each sibling against the anchor in closed form.
    #[default]
    Exact,
    /// Single-pass substitution that takes each sibling's own cashback from a
    /// baseline stake. Converges to `Exact` when re-run on its own output.
    Relaxed,
}

impl CashbackSolver {
    pub fn all() -> &'static [(Self, &'static str)] {
        &[(Self::Exact, "Exact"), (Self::Relaxed, "Relaxed")]
    }
}

/// What the anchor leg pins down for everyone else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Payout of the fixed leg if it wins (principal excluded for freebets).
    pub fixed_return: f64,
    /// Refund the fixed leg earns when it loses.
    pub fixed_cashback: f64,
}

impl Anchor {
    pub fn from_leg(leg: &BetLeg) -> Option<Self> {
        if leg.is_odd_empty() {
            return None;
        }
        let odd = effective_odd(leg);
        let value = leg.value().ok()?;
        if odd.is_nan() || odd <= 0.0 {
            return None;
        }
        Some(Self {
            fixed_return: payout_multiplier(odd, leg.is_freebet) * value,
            fixed_cashback: value * leg.cashback_rate(),
        })
    }

    fn target(&self) -> f64 {
        self.fixed_return - self.fixed_cashback
    }

    /// Stake value leg `leg` needs to match the anchor, if it can be computed.
    /// `baseline` is the stake `Relaxed` charges the leg's own cashback on.
    pub fn required_value(&self, leg: &BetLeg, solver: CashbackSolver, baseline: f64) -> Option<f64> {
        if leg.is_odd_empty() {
            return None;
        }
        let odd = effective_odd(leg);
        if odd.is_nan() || odd <= 1.0 {
            return None;
        }
        let multiplier = payout_multiplier(odd, leg.is_freebet);
        let rate = leg.cashback_rate();

        let value = match solver {
            CashbackSolver::Exact => {
                let denominator = multiplier - rate;
                if denominator <= 0.0 {
                    return None;
                }
                self.target() / denominator
            }
            CashbackSolver::Relaxed => {
                (self.target() + rate * baseline) / multiplier
            }
        };
        value.is_finite().then_some(value)
    }
}

/// Re-derives every sibling of `fixed` in `legs`. The fixed leg is never touched;
/// when the anchor is not computable the legs come back unchanged.
pub fn distribute(legs: &[BetLeg], fixed: usize, solver: CashbackSolver) -> Vec<BetLeg> {
    let baseline: Vec<f64> = legs.iter().map(BetLeg::value_or_zero).collect();
    distribute_from(legs, fixed, solver, &baseline)
}

/// Like [`distribute`], but `Relaxed` reads sibling stakes from `baseline`
/// instead of the legs, so repeated calls do not creep.
pub fn distribute_from(
    legs: &[BetLeg],
    fixed: usize,
    solver: CashbackSolver,
    baseline: &[f64],
) -> Vec<BetLeg> {
    let mut out = legs.to_vec();
    let Some(anchor) = legs.get(fixed).and_then(Anchor::from_leg) else {
        tracing::debug!(fixed, "anchor not computable, leaving stakes as typed");
        return out;
    };

    for (i, leg) in out.iter_mut().enumerate() {
        if i == fixed {
            continue;
        }
        let base = baseline.get(i).copied().unwrap_or_else(|| leg.value_or_zero());
        let Some(value) = anchor.required_value(leg, solver, base) else {
            tracing::debug!(leg = i, raw_odd = %leg.raw_odd, "skipping leg without usable odd");
            continue;
        };
        let value = round2(value);
        leg.stake_value = format!("{:.2}", value);
        leg.lay_liability = match leg.kind {
            LegKind::Lay => {
                let liability = leg
                    .odd()
                    .ok()
                    .and_then(|raw| lay_liability(value, raw))
                    .unwrap_or(0.0);
                format!("{:.2}", round2(liability))
            }
            LegKind::Back => format!("{:.2}", value),
        };
    }

    tracing::debug!(
        fixed,
        fixed_return = anchor.fixed_return,
        legs = legs.len(),
        "stakes redistributed"
    );
    out
}
