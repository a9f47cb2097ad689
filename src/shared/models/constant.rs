//! Constant-propagation lattice (§3, used by L7 SCCP)

use serde::{Deserialize, Serialize};

use super::expression::LiteralValue;

/// A lattice value over a single SSA name. `Top` means "not yet proven
/// constant", `Bottom` means "proven not constant", `Const` is a frozen
/// concrete value. The lattice is hashable because `LiteralValue` derives
/// `Hash`-compatible equality (floats included, via bit pattern — see
/// [`ConstLiteral`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstantValue {
    Top,
    Const(ConstLiteral),
    Bottom,
}

/// `LiteralValue` wrapper with a total `Eq`/`Hash` so `ConstantValue` can be
/// used as a map key and compared in the SCCP worklist without running into
/// `f64: !Eq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstLiteral {
    Int(i64),
    Float(u64), // bit pattern of the f64, so equality is exact
    Str(String),
    Bool(bool),
    None,
}

impl ConstLiteral {
    pub fn from_literal(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Int(i) => Self::Int(*i),
            LiteralValue::Float(f) => Self::Float(f.to_bits()),
            LiteralValue::Str(s) => Self::Str(s.clone()),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::None => Self::None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(bits) => Some(f64::from_bits(*bits)),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl ConstantValue {
    pub fn constant(lit: ConstLiteral) -> Self {
        Self::Const(lit)
    }

    /// Lattice meet (∧). `Top ∧ x = x`, `Bottom ∧ x = Bottom`,
    /// `c ∧ c = c`, `c1 ∧ c2 = Bottom` when `c1 != c2`.
    pub fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Top, x) => x.clone(),
            (x, Self::Top) => x.clone(),
            (Self::Bottom, _) | (_, Self::Bottom) => Self::Bottom,
            (Self::Const(a), Self::Const(b)) => {
                if a == b {
                    Self::Const(a.clone())
                } else {
                    Self::Bottom
                }
            }
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Bottom)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Self::Top)
    }
}
