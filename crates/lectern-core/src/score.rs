//! Penalty - single-level minimisation score

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Total constraint penalty of a solution. Lower is better, zero is perfect.
///
/// # Examples
///
/// ```
/// use lectern_core::Penalty;
///
/// let a = Penalty::of(200);
/// let b = Penalty::of(1000);
///
/// assert!(a < b);
/// assert!(Penalty::ZERO.is_zero());
/// assert_eq!(a + b, Penalty::of(1200));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Penalty(i64);

impl Penalty {
    /// No penalty.
    pub const ZERO: Penalty = Penalty(0);

    /// Worst representable penalty.
    pub const MAX: Penalty = Penalty(i64::MAX);

    /// Creates a penalty with the given value.
    #[inline]
    pub const fn of(value: i64) -> Self {
        Penalty(value)
    }

    /// Returns the penalty value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns true if nothing is violated.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Penalty {
    type Output = Penalty;

    #[inline]
    fn add(self, other: Penalty) -> Penalty {
        Penalty(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Penalty {
    #[inline]
    fn add_assign(&mut self, other: Penalty) {
        *self = *self + other;
    }
}

impl Sum for Penalty {
    fn sum<I: Iterator<Item = Penalty>>(iter: I) -> Penalty {
        iter.fold(Penalty::ZERO, Add::add)
    }
}

impl From<i64> for Penalty {
    fn from(value: i64) -> Self {
        Penalty(value)
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
