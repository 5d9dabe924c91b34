//! Splits a total investment across houses so that every outcome returns the
//! same amount: each house gets a share proportional to `1 / odd`.

use serde::Serialize;

use crate::leg::{parse_decimal, BetLeg, LegKind};
use crate::odds::{effective_odd, lay_liability};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRow {
    pub index: usize,
    pub name: String,
    pub kind: LegKind,
    /// Effective odd after cashback adjustment.
    pub odd: f64,
    pub share_pct: f64,
    pub value: f64,
    pub return_if_wins: f64,
    pub profit_if_wins: f64,
    pub lay_liability: Option<f64>,
    pub cashback_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentPlan {
    pub rows: Vec<PlanRow>,
    pub total_investment: f64,
    pub min_return: f64,
    pub max_return: f64,
    pub min_profit: f64,
    pub max_profit: f64,
    pub margin_pct: f64,
}

/// Effective odd lifted by the cashback a house refunds on a loss.
pub fn cashback_adjusted_odd(leg: &BetLeg) -> Option<f64> {
    let odd = effective_odd(leg);
    if odd.is_nan() || odd <= 0.0 {
        return None;
    }
    let rate = leg.cashback_rate();
    if rate >= 1.0 {
        return None;
    }
    Some(odd / (1.0 - rate))
}

pub fn plan_investment(legs: &[BetLeg], investment: &str) -> Option<InvestmentPlan> {
    let total = parse_decimal(investment).ok().filter(|v| *v > 0.0)?;

    let valid: Vec<(usize, &BetLeg, f64)> = legs
        .iter()
        .enumerate()
        .filter_map(|(i, leg)| cashback_adjusted_odd(leg).map(|odd| (i, leg, odd)))
        .collect();
    if valid.len() < 2 {
        tracing::debug!(valid = valid.len(), "not enough priced houses to split investment");
        return None;
    }

    let inverse_sum: f64 = valid.iter().map(|(_, _, odd)| 1.0 / odd).sum();
    let rows: Vec<PlanRow> = valid
        .into_iter()
        .map(|(index, leg, odd)| {
            let share = (1.0 / odd) / inverse_sum;
            let value = total * share;
            let return_if_wins = value * odd;
            PlanRow {
                index,
                name: leg.display_name(index),
                kind: leg.kind,
                odd,
                share_pct: share * 100.0,
                value,
                return_if_wins,
                profit_if_wins: return_if_wins - total,
                lay_liability: match leg.kind {
                    LegKind::Lay => leg.odd().ok().and_then(|raw| lay_liability(value, raw)),
                    LegKind::Back => None,
                },
                cashback_value: value * leg.cashback_rate(),
            }
        })
        .collect();

    let returns = rows.iter().map(|row| row.return_if_wins);
    let min_return = returns.clone().fold(f64::INFINITY, f64::min);
    let max_return = returns.fold(f64::NEG_INFINITY, f64::max);

    Some(InvestmentPlan {
        total_investment: total,
        min_return,
        max_return,
        min_profit: min_return - total,
        max_profit: max_return - total,
        margin_pct: (min_return / total - 1.0) * 100.0,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn even_odds_split_evenly() {
        let legs = vec![BetLeg::back("2.00", ""), BetLeg::back("2.00", "")];
        let plan = plan_investment(&legs, "100").unwrap();
        assert_relative_eq!(plan.rows[0].value, 50.0);
        assert_relative_eq!(plan.rows[1].share_pct, 50.0);
        assert_relative_eq!(plan.min_return, 100.0);
        assert_relative_eq!(plan.margin_pct, 0.0);
    }

    #[test]
    fn arbitrage_returns_the_same_everywhere() {
        let legs = vec![BetLeg::back("2.10", ""), BetLeg::back("2.05", "")];
        let plan = plan_investment(&legs, "1000").unwrap();
        assert_relative_eq!(plan.min_return, plan.max_return, epsilon = 1e-9);
        assert!(plan.min_profit > 0.0);
        // 1 / (1/2.10 + 1/2.05) = 1.03734...
        assert_relative_eq!(plan.margin_pct, 3.7349397590361, epsilon = 1e-9);
    }

    #[test]
    fn skips_unpriced_houses() {
        let legs = vec![
            BetLeg::back("3.00", ""),
            BetLeg::back("", ""),
            BetLeg::back("1.50", ""),
        ];
        let plan = plan_investment(&legs, "300").unwrap();
        let indexes: Vec<usize> = plan.rows.iter().map(|row| row.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_relative_eq!(plan.rows[0].value, 100.0, epsilon = 1e-9);
        assert_relative_eq!(plan.rows[1].value, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn needs_investment_and_two_houses() {
        let legs = vec![BetLeg::back("2.00", ""), BetLeg::back("2.00", "")];
        assert!(plan_investment(&legs, "").is_none());
        assert!(plan_investment(&legs, "0").is_none());
        assert!(plan_investment(&legs, "abc").is_none());

        let legs = vec![BetLeg::back("2.00", ""), BetLeg::back("", "")];
        assert!(plan_investment(&legs, "100").is_none());
    }

    #[test]
    fn cashback_lifts_the_odd() {
        let mut leg = BetLeg::back("2.00", "");
        leg.cashback_pct = "20".into();
        assert_relative_eq!(cashback_adjusted_odd(&leg).unwrap(), 2.5);
        leg.cashback_pct = "100".into();
        assert_eq!(cashback_adjusted_odd(&leg), None);
    }

    #[test]
    fn lay_rows_report_liability() {
        let legs = vec![BetLeg::lay("3.00", ""), BetLeg::back("3.00", "")];
        let plan = plan_investment(&legs, "100").unwrap();
        // lay 3.00 behaves like back 1.50: shares 2/3 and 1/3
        assert_relative_eq!(plan.rows[0].value, 66.66666666666667, epsilon = 1e-9);
        assert_relative_eq!(plan.rows[0].lay_liability.unwrap(), 33.333333333333336, epsilon = 1e-9);
        assert_eq!(plan.rows[1].lay_liability, None);
    }
}
