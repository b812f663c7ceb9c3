use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use num_traits::{Bounded, CheckedAdd, CheckedMul, CheckedNeg, CheckedSub, NumCast, One, Zero};

/// A trait representing the integer type used for supplies, capacities, costs and flows.
///
/// Every quantity of one solve shares a single width. `max_value()` doubles as the
/// unbounded capacity sentinel.
pub trait Amount:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + One
    + Bounded
    + CheckedAdd
    + CheckedSub
    + CheckedMul
    + CheckedNeg
    + NumCast
    + Into<i128>
    + Debug
    + Display
    + Default
{
}

impl Amount for i32 {}

impl Amount for i64 {}
