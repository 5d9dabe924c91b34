//! The calculator's owned state and its fix/unfix state machine.
//!
//! Legs live in a fixed pool; only the first `num_active` take part in any
//! calculation. While a leg is fixed every mutation re-runs distribution.

use crate::distribute::{distribute_from, CashbackSolver};
use crate::error::CalculatorError;
use crate::leg::{BetLeg, LegEdit, LegKind};
use crate::report::{build_report, Report};
use crate::settings::Settings;
use crate::surebet::{plan_investment, InvestmentPlan};

pub const LEG_POOL_SIZE: usize = 5;
pub const MIN_ACTIVE_LEGS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    legs: [BetLeg; LEG_POOL_SIZE],
    num_active: usize,
    fixed: Option<usize>,
    solver: CashbackSolver,
    /// Stakes as they stood when the anchor or solver was last chosen.
    baseline: [f64; LEG_POOL_SIZE],
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl CalculatorState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            legs: Default::default(),
            num_active: settings.houses.clamp(MIN_ACTIVE_LEGS, LEG_POOL_SIZE),
            fixed: None,
            solver: settings.solver,
            baseline: [0.0; LEG_POOL_SIZE],
        }
    }

    pub fn legs(&self) -> &[BetLeg; LEG_POOL_SIZE] {
        &self.legs
    }

    pub fn active_legs(&self) -> &[BetLeg] {
        &self.legs[..self.num_active]
    }

    pub fn num_active(&self) -> usize {
        self.num_active
    }

    pub fn fixed_leg(&self) -> Option<usize> {
        self.fixed
    }

    pub fn solver(&self) -> CashbackSolver {
        self.solver
    }

    pub fn set_solver(&mut self, solver: CashbackSolver) {
        self.solver = solver;
        self.capture_baseline();
        self.redistribute();
    }

    /// Grows or shrinks the active window. Legs outside it keep their values.
    /// Any anchor is dropped.
    pub fn set_num_active(&mut self, n: usize) -> Result<(), CalculatorError> {
        if !(MIN_ACTIVE_LEGS..=LEG_POOL_SIZE).contains(&n) {
            return Err(CalculatorError::LegCount(n));
        }
        if n != self.num_active {
            tracing::info!(from = self.num_active, to = n, "house count changed, releasing anchor");
            self.num_active = n;
            self.fixed = None;
        }
        Ok(())
    }

    pub fn can_fix(&self, index: usize) -> bool {
        index < self.num_active && self.legs[index].value().is_ok()
    }

    /// Fixes `index`, or releases it when it is already the anchor.
    /// Releasing never recomputes anything.
    pub fn toggle_fix(&mut self, index: usize) -> Result<(), CalculatorError> {
        if index >= self.num_active {
            return Err(CalculatorError::LegIndex(index));
        }
        if self.fixed == Some(index) {
            tracing::info!(leg = index, "stake released");
            self.fixed = None;
        } else {
            tracing::info!(leg = index, previous = ?self.fixed, "stake fixed");
            self.fixed = Some(index);
            self.capture_baseline();
            self.redistribute();
        }
        Ok(())
    }

    pub fn edit_leg(&mut self, index: usize, edit: LegEdit) -> Result<(), CalculatorError> {
        let mut leg = self
            .legs
            .get(index)
            .cloned()
            .ok_or(CalculatorError::LegIndex(index))?;
        leg.apply(edit);
        leg.sync_lay_fields();
        self.replace_leg(index, leg)
    }

    /// Replaces a whole leg, applies the auto-unfix rules, then re-equalizes.
    pub fn replace_leg(&mut self, index: usize, leg: BetLeg) -> Result<(), CalculatorError> {
        let slot = self
            .legs
            .get_mut(index)
            .ok_or(CalculatorError::LegIndex(index))?;
        let previous = std::mem::replace(slot, leg);

        if self.fixed == Some(index) {
            let current = &self.legs[index];
            if current.is_odd_empty() {
                tracing::info!(leg = index, "odd cleared on anchor");
                self.fixed = None;
            } else if current.kind == LegKind::Lay && lay_inputs_changed(&previous, current) {
                tracing::info!(leg = index, "lay anchor edited");
                self.fixed = None;
            }
        }

        self.redistribute();
        Ok(())
    }

    /// Re-equalizes the active legs against the anchor, if there is one.
    pub fn redistribute(&mut self) {
        let Some(fixed) = self.fixed else {
            return;
        };
        let updated = distribute_from(self.active_legs(), fixed, self.solver, &self.baseline);
        for (slot, leg) in self.legs.iter_mut().zip(updated) {
            *slot = leg;
        }
    }

    fn capture_baseline(&mut self) {
        self.baseline = std::array::from_fn(|i| self.legs[i].value_or_zero());
    }

    pub fn report(&self) -> Report {
        build_report(self.active_legs())
    }

    pub fn plan(&self, investment: &str) -> Option<InvestmentPlan> {
        plan_investment(self.active_legs(), investment)
    }
}

fn lay_inputs_changed(previous: &BetLeg, current: &BetLeg) -> bool {
    previous.raw_odd != current.raw_odd
        || previous.kind != current.kind
        || previous.stake_value != current.stake_value
        || previous.lay_liability != current.lay_liability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(legs: &[BetLeg]) -> CalculatorState {
        let mut state = CalculatorState::default();
        state.set_num_active(legs.len()).unwrap();
        for (i, leg) in legs.iter().enumerate() {
            state.replace_leg(i, leg.clone()).unwrap();
        }
        state
    }

    #[test]
    fn pool_starts_with_defaults() {
        let state = CalculatorState::default();
        assert_eq!(state.num_active(), 3);
        assert_eq!(state.fixed_leg(), None);
        assert!(state.legs().iter().all(|leg| leg.raw_odd == "2.00" && leg.stake_value.is_empty()));
    }

    #[test]
    fn leg_count_outside_range_is_rejected() {
        let mut state = CalculatorState::default();
        assert!(matches!(state.set_num_active(1), Err(CalculatorError::LegCount(1))));
        assert!(matches!(state.set_num_active(6), Err(CalculatorError::LegCount(6))));
        assert_eq!(state.num_active(), 3);
    }

    #[test]
    fn shrinking_keeps_hidden_legs_and_releases_anchor() {
        let mut state = state_with(&[
            BetLeg::back("2.00", "100"),
            BetLeg::back("2.00", ""),
            BetLeg::back("3.00", "42"),
        ]);
        state.toggle_fix(0).unwrap();
        assert_eq!(state.legs()[2].stake_value, "66.67");

        state.set_num_active(2).unwrap();
        assert_eq!(state.fixed_leg(), None);
        assert_eq!(state.legs()[2].stake_value, "66.67");

        state.edit_leg(2, LegEdit::Odd("5.00".into())).unwrap();
        assert_eq!(state.legs()[2].raw_odd, "5.00");
        assert_eq!(state.active_legs().len(), 2);
    }

    #[test]
    fn fixing_inactive_leg_is_rejected() {
        let mut state = CalculatorState::default();
        assert!(matches!(state.toggle_fix(3), Err(CalculatorError::LegIndex(3))));
        assert!(matches!(
            state.edit_leg(LEG_POOL_SIZE, LegEdit::Odd("2".into())),
            Err(CalculatorError::LegIndex(_))
        ));
    }

    #[test]
    fn any_edit_re_equalizes_while_fixed() {
        let mut state = state_with(&[BetLeg::back("2.00", "100"), BetLeg::back("2.00", "")]);
        state.toggle_fix(0).unwrap();
        assert_eq!(state.legs()[1].stake_value, "100.00");

        state.edit_leg(1, LegEdit::Odd("4.00".into())).unwrap();
        assert_eq!(state.legs()[1].stake_value, "50.00");

        state.edit_leg(0, LegEdit::Value("50".into())).unwrap();
        assert_eq!(state.fixed_leg(), Some(0));
        assert_eq!(state.legs()[1].stake_value, "25.00");
    }

    #[test]
    fn clearing_anchor_odd_releases_it() {
        let mut state = state_with(&[BetLeg::back("2.00", "100"), BetLeg::back("2.00", "")]);
        state.toggle_fix(0).unwrap();
        state.edit_leg(0, LegEdit::Odd(String::new())).unwrap();
        assert_eq!(state.fixed_leg(), None);
        assert_eq!(state.legs()[1].stake_value, "100.00");
    }

    #[test]
    fn editing_lay_anchor_releases_it() {
        let mut state = state_with(&[BetLeg::lay("2.00", "100"), BetLeg::back("1.80", "")]);
        state.toggle_fix(0).unwrap();
        assert_eq!(state.legs()[1].stake_value, "111.11");

        state.edit_leg(0, LegEdit::Value("120".into())).unwrap();
        assert_eq!(state.fixed_leg(), None);
        assert_eq!(state.legs()[1].stake_value, "111.11");
    }

    #[test]
    fn lay_anchor_survives_unrelated_edits() {
        let mut state = state_with(&[BetLeg::lay("2.00", "100"), BetLeg::back("1.80", "")]);
        state.toggle_fix(0).unwrap();
        state.edit_leg(0, LegEdit::Name("Exchange".into())).unwrap();
        assert_eq!(state.fixed_leg(), Some(0));
    }

    #[test]
    fn fixing_another_leg_moves_the_anchor() {
        let mut state = state_with(&[
            BetLeg::back("2.00", "100"),
            BetLeg::back("4.00", "10"),
            BetLeg::back("2.00", ""),
        ]);
        state.toggle_fix(0).unwrap();
        state.toggle_fix(1).unwrap();
        assert_eq!(state.fixed_leg(), Some(1));
        // anchor 1 was re-derived to 50 by the first fix: 4.00 * 50 = 200
        assert_eq!(state.legs()[1].stake_value, "50.00");
        assert_eq!(state.legs()[0].stake_value, "100.00");
        assert_eq!(state.legs()[2].stake_value, "100.00");
    }

    #[test]
    fn relaxed_stakes_hold_still_across_edits() {
        let mut anchor = BetLeg::back("2.00", "100");
        anchor.cashback_pct = "10".into();
        let mut sibling = BetLeg::back("2.50", "0");
        sibling.cashback_pct = "20".into();
        let mut state = state_with(&[anchor, sibling]);
        state.set_solver(CashbackSolver::Relaxed);
        state.toggle_fix(0).unwrap();
        assert_eq!(state.legs()[1].stake_value, "76.00");

        for name in ["E", "Ex", "Exc"] {
            state.edit_leg(0, LegEdit::Name(name.into())).unwrap();
            assert_eq!(state.legs()[1].stake_value, "76.00");
        }
        state.redistribute();
        assert_eq!(state.legs()[1].stake_value, "76.00");
    }

    #[test]
    fn same_house_count_keeps_anchor() {
        let mut state = state_with(&[BetLeg::back("2.00", "100"), BetLeg::back("2.00", "")]);
        state.toggle_fix(0).unwrap();
        state.set_num_active(2).unwrap();
        assert_eq!(state.fixed_leg(), Some(0));
    }

    #[test]
    fn can_fix_requires_positive_value() {
        let state = state_with(&[BetLeg::back("2.00", "100"), BetLeg::back("2.00", "0")]);
        assert!(state.can_fix(0));
        assert!(!state.can_fix(1));
        assert!(!state.can_fix(4));
    }

    #[test]
    fn lay_liability_edit_syncs_value_then_distributes() {
        let mut state = state_with(&[BetLeg::back("2.00", "100"), BetLeg::lay("4.00", "")]);
        state.edit_leg(1, LegEdit::Liability("30".into())).unwrap();
        assert_eq!(state.legs()[1].stake_value, "90.00");

        state.toggle_fix(0).unwrap();
        assert_eq!(state.legs()[1].stake_value, "150.00");
        assert_eq!(state.legs()[1].lay_liability, "50.00");
    }
}
