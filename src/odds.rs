//! Odd normalization: turns a leg's raw odd into a Back-equivalent decimal odd.
//!
//! Every adjustment only touches the profit part of the odd (`odd - 1`); the
//! principal unit is never scaled. The order is fixed: Lay inversion, then
//! commission, then boost.

use crate::error::InputError;
use crate::leg::{BetLeg, LegKind};

pub const AWAITING: &str = "Awaiting...";

/// Effective odd of a leg, or NaN when the leg is inactive or its odd is unusable.
pub fn effective_odd(leg: &BetLeg) -> f64 {
    try_effective_odd(leg).unwrap_or(f64::NAN)
}

pub fn try_effective_odd(leg: &BetLeg) -> Result<f64, InputError> {
    let raw = leg.odd()?;
    let mut odd = match leg.kind {
        LegKind::Lay => lay_to_back(raw),
        LegKind::Back => raw,
    };
    if let Some(pct) = leg.commission() {
        odd = shave_commission(odd, pct);
    }
    if let Some(pct) = leg.boost() {
        odd = apply_boost(odd, pct);
    }
    Ok(odd)
}

/// Back-equivalent of a Lay odd. Odds at or below 1 pass through untouched.
pub fn lay_to_back(odd: f64) -> f64 {
    if odd > 1.0 {
        odd / (odd - 1.0)
    } else {
        odd
    }
}

pub fn shave_commission(odd: f64, commission_pct: f64) -> f64 {
    1.0 + (odd - 1.0) * (1.0 - commission_pct / 100.0)
}

pub fn apply_boost(odd: f64, boost_pct: f64) -> f64 {
    (odd - 1.0) * (1.0 + boost_pct / 100.0) + 1.0
}

pub fn lay_liability(value: f64, raw_odd: f64) -> Option<f64> {
    if raw_odd > 1.0 {
        Some(value / (raw_odd - 1.0))
    } else {
        None
    }
}

pub fn lay_value(liability: f64, raw_odd: f64) -> Option<f64> {
    if raw_odd > 1.0 {
        Some(liability * (raw_odd - 1.0))
    } else {
        None
    }
}

/// What a winning leg pays per unit of stake value. Freebets never return principal.
pub fn payout_multiplier(odd: f64, is_freebet: bool) -> f64 {
    if is_freebet {
        odd - 1.0
    } else {
        odd
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn format_odd(odd: f64) -> String {
    if odd.is_finite() && odd > 0.0 {
        format!("{:.3}", odd)
    } else {
        AWAITING.to_string()
    }
}

pub fn format_money(x: f64) -> String {
    if x.is_finite() {
        format!("{:.2}", x)
    } else {
        "—".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leg(kind: LegKind, odd: &str) -> BetLeg {
        BetLeg {
            kind,
            raw_odd: odd.into(),
            ..BetLeg::default()
        }
    }

    #[test]
    fn back_without_adjustments_is_raw_odd() {
        assert_relative_eq!(effective_odd(&leg(LegKind::Back, "2.37")), 2.37);
    }

    #[test]
    fn lay_is_inverted() {
        assert_relative_eq!(effective_odd(&leg(LegKind::Lay, "3.00")), 1.5);
        assert_relative_eq!(effective_odd(&leg(LegKind::Lay, "2.00")), 2.0);
    }

    #[test]
    fn lay_at_one_passes_through() {
        assert_relative_eq!(effective_odd(&leg(LegKind::Lay, "1")), 1.0);
    }

    #[test]
    fn empty_or_invalid_odd_is_nan() {
        assert!(effective_odd(&leg(LegKind::Back, "")).is_nan());
        assert!(effective_odd(&leg(LegKind::Back, "abc")).is_nan());
        assert!(effective_odd(&leg(LegKind::Back, "0")).is_nan());
        assert!(effective_odd(&leg(LegKind::Lay, "-2")).is_nan());
    }

    #[test]
    fn commission_shaves_profit_only() {
        let mut l = leg(LegKind::Back, "3.00");
        l.commission_enabled = true;
        l.commission_pct = "5".into();
        assert_relative_eq!(effective_odd(&l), 2.9);
    }

    #[test]
    fn boost_amplifies_profit_only() {
        let mut l = leg(LegKind::Back, "2.00");
        l.boost_pct = "25".into();
        assert_relative_eq!(effective_odd(&l), 2.25);
    }

    #[test]
    fn unparsable_adjustments_are_skipped() {
        let mut l = leg(LegKind::Back, "2.50");
        l.commission_enabled = true;
        l.commission_pct = "abc".into();
        l.boost_pct = "-".into();
        assert_relative_eq!(effective_odd(&l), 2.5);
    }

    #[test]
    fn commission_applies_before_boost() {
        let mut l = leg(LegKind::Lay, "3.00");
        l.commission_enabled = true;
        l.commission_pct = "10".into();
        l.boost_pct = "50".into();
        // 3.00 lay -> 1.5, commission -> 1.45, boost -> 1.675
        assert_relative_eq!(effective_odd(&l), 1.675, epsilon = 1e-12);
    }

    #[test]
    fn formatting_uses_placeholder() {
        assert_eq!(format_odd(2.0), "2.000");
        assert_eq!(format_odd(f64::NAN), AWAITING);
        assert_eq!(format_money(12.346), "12.35");
        assert_eq!(round2(111.1111), 111.11);
    }
}
