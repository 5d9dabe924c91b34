//! Per-house table rows and the guaranteed-profit summary, reduced from the
//! current leg values. Nothing here mutates state.

use serde::Serialize;

use crate::leg::{BetLeg, LegKind};
use crate::odds::{effective_odd, payout_multiplier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfitClass {
    Positive,
    Negative,
}

impl ProfitClass {
    pub fn of(profit: f64) -> Self {
        if profit >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::Positive => "success",
            Self::Negative => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegRow {
    pub index: usize,
    pub name: String,
    pub kind: LegKind,
    pub is_freebet: bool,
    pub value: f64,
    pub share_pct: f64,
    /// Payout plus the cashback refunded by every other (losing) house.
    pub return_if_wins: Option<f64>,
    pub profit_if_wins: Option<f64>,
    pub profit_class: Option<ProfitClass>,
    pub lay_liability: Option<f64>,
    pub cashback_if_loses: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_invested: f64,
    pub minimum_guaranteed_return: Option<f64>,
    pub guaranteed_profit: Option<f64>,
    pub roi_pct: Option<f64>,
}

impl Summary {
    pub fn profit_class(&self) -> Option<ProfitClass> {
        self.guaranteed_profit.map(ProfitClass::of)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<LegRow>,
    pub summary: Summary,
}

/// Money put at risk: stake values of every non-freebet leg.
pub fn total_invested(legs: &[BetLeg]) -> f64 {
    legs.iter()
        .filter(|leg| !leg.is_freebet)
        .map(BetLeg::value_or_zero)
        .sum()
}

pub fn build_report(legs: &[BetLeg]) -> Report {
    let invested = total_invested(legs);
    let total_cashback: f64 = legs.iter().map(BetLeg::cashback).sum();

    let rows: Vec<LegRow> = legs
        .iter()
        .enumerate()
        .map(|(index, leg)| {
            let value = leg.value_or_zero();
            let odd = effective_odd(leg);
            let cashback = leg.cashback();

            let return_if_wins = (!odd.is_nan())
                .then(|| payout_multiplier(odd, leg.is_freebet) * value + (total_cashback - cashback));
            let profit_if_wins = return_if_wins.map(|r| r - invested);

            LegRow {
                index,
                name: leg.display_name(index),
                kind: leg.kind,
                is_freebet: leg.is_freebet,
                value,
                share_pct: if invested > 0.0 { value / invested * 100.0 } else { 0.0 },
                return_if_wins,
                profit_if_wins,
                profit_class: profit_if_wins.map(ProfitClass::of),
                lay_liability: leg.liability(),
                cashback_if_loses: (leg.cashback_rate() > 0.0).then_some(cashback),
            }
        })
        .collect();

    let minimum_guaranteed_return = rows
        .iter()
        .filter_map(|row| row.return_if_wins)
        .reduce(f64::min);
    let guaranteed_profit = minimum_guaranteed_return.map(|r| r - invested);
    let roi_pct = guaranteed_profit.map(|p| if invested > 0.0 { p / invested * 100.0 } else { 0.0 });

    Report {
        rows,
        summary: Summary {
            total_invested: invested,
            minimum_guaranteed_return,
            guaranteed_profit,
            roi_pct,
        },
    }
}
