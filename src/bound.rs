//! Saturating bound arithmetic.
//!
//! Repeat counts and graph distances in a pattern matcher must tolerate
//! unbounded repetition: `/a*/` repeats infinitely often, and a vertex that a
//! reachability pass never visits has no distance at all. [`Bound`] is the
//! scalar domain used for all such quantities. It is a tagged sum over finite
//! values, an infinity, and an unreachability sentinel, with saturating
//! addition and a total order.
//!
//! The same arithmetic is used at compile time (depth and repeat analysis) and
//! at scan time (stream offset bookkeeping), so the type lives at the crate
//! root rather than under [`crate::compiler`].

use std::cmp;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign};

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A repeat count or graph distance that may be infinite or unreachable.
///
/// Every finite value compares less than [`Bound::Infinite`], which in turn
/// compares less than [`Bound::Unreachable`]. The two sentinels are never
/// equal to each other: an infinite distance is still a distance, while an
/// unreachable vertex has none.
///
/// Finite values never exceed [`Bound::CEILING`]; use [`Bound::finite`] for
/// constructing values from untrusted integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    /// A finite count or distance.
    Finite(u32),
    /// The result of unbounded repetition.
    Infinite,
    /// No path exists; absorbing under addition.
    Unreachable,
}

impl Bound {
    /// Hard upper limit for finite bounds. Addition saturates here instead
    /// of wrapping. The two raw values above the ceiling are reserved for
    /// the [`Bound::Infinite`] and [`Bound::Unreachable`] sentinels.
    pub const CEILING: u32 = u32::MAX - 2;

    /// Zero, the identity of bound addition.
    pub const ZERO: Bound = Bound::Finite(0);

    const RAW_INFINITE: u32 = u32::MAX - 1;
    const RAW_UNREACHABLE: u32 = u32::MAX;

    /// Creates a finite bound, clamping `value` to [`Bound::CEILING`].
    #[inline]
    pub fn finite(value: u32) -> Bound {
        Bound::Finite(cmp::min(value, Self::CEILING))
    }

    /// True for finite values.
    #[inline]
    pub fn is_finite(self) -> bool {
        matches!(self, Bound::Finite(_))
    }

    /// True for [`Bound::Infinite`].
    #[inline]
    pub fn is_infinite(self) -> bool {
        matches!(self, Bound::Infinite)
    }

    /// True for [`Bound::Unreachable`].
    #[inline]
    pub fn is_unreachable(self) -> bool {
        matches!(self, Bound::Unreachable)
    }

    /// Returns the finite value, or `None` for the sentinels.
    #[inline]
    pub fn as_finite(self) -> Option<u32> {
        match self {
            Bound::Finite(value) => Some(value),
            _ => None,
        }
    }

    /// Encodes the bound as a single integer. Finite values map to
    /// themselves; the sentinels occupy the two values above
    /// [`Bound::CEILING`]. Automaton formats that embed bounds must keep
    /// these raw values reserved.
    #[inline]
    pub fn to_raw(self) -> u32 {
        match self {
            Bound::Finite(value) => {
                debug_assert!(value <= Self::CEILING);
                value
            }
            Bound::Infinite => Self::RAW_INFINITE,
            Bound::Unreachable => Self::RAW_UNREACHABLE,
        }
    }

    /// Decodes a bound produced by [`Bound::to_raw`]. Total over `u32`.
    #[inline]
    pub fn from_raw(raw: u32) -> Bound {
        match raw {
            Self::RAW_INFINITE => Bound::Infinite,
            Self::RAW_UNREACHABLE => Bound::Unreachable,
            value => Bound::Finite(value),
        }
    }
}

impl Add for Bound {
    type Output = Bound;

    fn add(self, rhs: Bound) -> Bound {
        match (self, rhs) {
            (Bound::Unreachable, _) | (_, Bound::Unreachable) => {
                Bound::Unreachable
            }
            (Bound::Infinite, _) | (_, Bound::Infinite) => Bound::Infinite,
            (Bound::Finite(a), Bound::Finite(b)) => {
                // Pre-check against the ceiling; `a + b` cannot overflow.
                if a > Self::CEILING - b {
                    Bound::Finite(Self::CEILING)
                } else {
                    Bound::Finite(a + b)
                }
            }
        }
    }
}

impl AddAssign for Bound {
    #[inline]
    fn add_assign(&mut self, rhs: Bound) {
        *self = *self + rhs;
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Finite(value) => write!(f, "{}", value),
            Bound::Infinite => write!(f, "inf"),
            Bound::Unreachable => write!(f, "unr"),
        }
    }
}

impl Serialize for Bound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Bound::from_raw(u32::deserialize(deserializer)?))
    }
}

/// A `[min, max]` pair of bounds, like the `{m,n}` of a repeat construct or
/// the spread of distances at which an event may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundRange {
    /// Smallest value in the range.
    pub min: Bound,
    /// Largest value in the range; may be [`Bound::Infinite`].
    pub max: Bound,
}

impl BoundRange {
    /// Creates the range `[min, max]`.
    #[inline]
    pub fn new(min: Bound, max: Bound) -> BoundRange {
        debug_assert!(min <= max);
        BoundRange { min, max }
    }

    /// Creates the single-value range `[n, n]`.
    #[inline]
    pub fn exact(n: u32) -> BoundRange {
        let b = Bound::finite(n);
        BoundRange { min: b, max: b }
    }

    /// Unions two ranges when the result is still one contiguous range,
    /// i.e. when they overlap or adjoin. Returns `None` when the union
    /// would have a hole.
    pub fn merge(self, other: BoundRange) -> Option<BoundRange> {
        let (lo, hi) =
            if self.min <= other.min { (self, other) } else { (other, self) };
        if hi.min > lo.max + Bound::Finite(1) {
            return None;
        }
        Some(BoundRange {
            min: lo.min,
            max: cmp::max(self.max, other.max),
        })
    }
}

impl Add for BoundRange {
    type Output = BoundRange;

    /// Composes the ranges of two adjoining regions: matching one after the
    /// other adds their bounds component-wise, with infinity absorbing.
    #[inline]
    fn add(self, rhs: BoundRange) -> BoundRange {
        BoundRange { min: self.min + rhs.min, max: self.max + rhs.max }
    }
}

impl Display for BoundRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.min, self.max)
    }
}
