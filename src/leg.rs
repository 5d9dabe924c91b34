//! One house (bookmaker) row of the calculator, kept exactly as typed.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::odds::{lay_liability, lay_value, round2};

pub const DEFAULT_RAW_ODD: &str = "2.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegKind {
    #[default]
    Back,
    Lay,
}

impl LegKind {
    pub fn all() -> &'static [(Self, &'static str)] {
        &[(Self::Back, "Back"), (Self::Lay, "Lay")]
    }
}

/// Which of the two Lay money fields the user touched last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditedField {
    Value,
    Liability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetLeg {
    pub name: String,
    pub raw_odd: String,
    pub kind: LegKind,
    /// Money risked on a Back leg; the backer's potential win on a Lay leg.
    pub stake_value: String,
    /// Money actually risked on a Lay leg.
    pub lay_liability: String,
    pub commission_enabled: bool,
    pub commission_pct: String,
    pub boost_pct: String,
    pub cashback_pct: String,
    pub is_freebet: bool,
    pub last_edited: Option<EditedField>,
}

impl Default for BetLeg {
    fn default() -> Self {
        Self {
            name: String::new(),
            raw_odd: DEFAULT_RAW_ODD.to_string(),
            kind: LegKind::Back,
            stake_value: String::new(),
            lay_liability: String::new(),
            commission_enabled: false,
            commission_pct: String::new(),
            boost_pct: String::new(),
            cashback_pct: String::new(),
            is_freebet: false,
            last_edited: None,
        }
    }
}

/// A single field-level change coming from the page.
#[derive(Debug, Clone, PartialEq)]
pub enum LegEdit {
    Name(String),
    Odd(String),
    Kind(LegKind),
    Value(String),
    Liability(String),
    CommissionEnabled(bool),
    Commission(String),
    Boost(String),
    Cashback(String),
    Freebet(bool),
}

/// Parses a user-typed decimal. Surrounding whitespace is ignored.
pub fn parse_decimal(input: &str) -> Result<f64, InputError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(InputError::Empty);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InputError::NotANumber(s.to_string())),
    }
}

fn parse_positive(input: &str) -> Result<f64, InputError> {
    let v = parse_decimal(input)?;
    if v <= 0.0 {
        return Err(InputError::OutOfRange { value: v, min: 0.0 });
    }
    Ok(v)
}

impl BetLeg {
    pub fn back(raw_odd: &str, stake_value: &str) -> Self {
        Self {
            raw_odd: raw_odd.to_string(),
            stake_value: stake_value.to_string(),
            ..Self::default()
        }
    }

    pub fn lay(raw_odd: &str, stake_value: &str) -> Self {
        Self {
            kind: LegKind::Lay,
            ..Self::back(raw_odd, stake_value)
        }
    }

    pub fn display_name(&self, index: usize) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            format!("House {}", index + 1)
        } else {
            name.to_string()
        }
    }

    pub fn is_odd_empty(&self) -> bool {
        self.raw_odd.is_empty()
    }

    /// Raw decimal odd, rejected when it is not strictly positive.
    pub fn odd(&self) -> Result<f64, InputError> {
        if self.raw_odd.is_empty() {
            return Err(InputError::Empty);
        }
        parse_positive(&self.raw_odd)
    }

    /// Nominal stake value as a number; used when it must be strictly positive.
    pub fn value(&self) -> Result<f64, InputError> {
        parse_positive(&self.stake_value)
    }

    /// Stake value for arithmetic reductions, where anything unusable counts as zero.
    pub fn value_or_zero(&self) -> f64 {
        parse_decimal(&self.stake_value).unwrap_or(0.0)
    }

    pub fn commission(&self) -> Option<f64> {
        if !self.commission_enabled {
            return None;
        }
        parse_decimal(&self.commission_pct).ok()
    }

    pub fn boost(&self) -> Option<f64> {
        parse_decimal(&self.boost_pct).ok()
    }

    /// Cashback as a fraction of the stake value (10% -> 0.10).
    pub fn cashback_rate(&self) -> f64 {
        parse_decimal(&self.cashback_pct)
            .map(|pct| pct / 100.0)
            .unwrap_or(0.0)
    }

    /// Refund earned if this leg loses.
    pub fn cashback(&self) -> f64 {
        self.value_or_zero() * self.cashback_rate()
    }

    /// Money at risk on a Lay leg: the stored liability when usable, else derived from value.
    pub fn liability(&self) -> Option<f64> {
        if self.kind != LegKind::Lay {
            return None;
        }
        match parse_positive(&self.lay_liability) {
            Ok(stored) => Some(stored),
            Err(_) => {
                let value = self.value().ok()?;
                lay_liability(value, self.odd().ok()?)
            }
        }
    }

    pub fn apply(&mut self, edit: LegEdit) {
        match edit {
            LegEdit::Name(name) => self.name = name,
            LegEdit::Odd(odd) => self.raw_odd = odd,
            LegEdit::Kind(kind) => self.kind = kind,
            LegEdit::Value(value) => {
                self.stake_value = value;
                self.last_edited = Some(EditedField::Value);
            }
            LegEdit::Liability(liability) => {
                self.lay_liability = liability;
                self.last_edited = Some(EditedField::Liability);
            }
            LegEdit::CommissionEnabled(enabled) => self.commission_enabled = enabled,
            LegEdit::Commission(pct) => self.commission_pct = pct,
            LegEdit::Boost(pct) => self.boost_pct = pct,
            LegEdit::Cashback(pct) => self.cashback_pct = pct,
            LegEdit::Freebet(freebet) => self.is_freebet = freebet,
        }
    }

    /// Derives whichever of value/liability was not edited last.
    pub fn sync_lay_fields(&mut self) {
        let Some(edited) = self.last_edited else {
            return;
        };
        let odd = match self.odd() {
            Ok(odd) if odd > 1.0 => odd,
            _ => return,
        };

        match (self.kind, edited) {
            (LegKind::Lay, EditedField::Value) => {
                let derived = self.value().ok().and_then(|v| lay_liability(v, odd));
                if let Some(liability) = derived {
                    self.lay_liability = format!("{:.2}", round2(liability));
                }
            }
            (LegKind::Lay, EditedField::Liability) => {
                if let Ok(liability) = parse_positive(&self.lay_liability) {
                    if let Some(value) = lay_value(liability, odd) {
                        self.stake_value = format!("{:.2}", round2(value));
                    }
                }
            }
            (LegKind::Back, EditedField::Value) => self.lay_liability = self.stake_value.clone(),
            (LegKind::Back, EditedField::Liability) => self.stake_value = self.lay_liability.clone(),
        }
    }
}
