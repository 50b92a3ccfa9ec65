/*!
    Rational time bases and timestamp arithmetic.
*/

use std::cmp::Ordering;

/**
    A rational number, used as a stream time base (units per second).

    One timestamp tick represents `num / den` seconds.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator.
    pub num: i32,
    /// Denominator.
    pub den: i32,
}

impl Rational {
    /// The microsecond reference time base used for derived durations.
    pub const MICROSECONDS: Rational = Rational::new(1, 1_000_000);

    /**
        Create a new rational.
    */
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns the value as a float.
    */
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/**
    A presentation or decode timestamp, in stream time-base ticks.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

/**
    A packet duration, in stream time-base ticks.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);

/**
    Rescale a value from one time base to another.

    Rounds to the nearest destination tick, ties away from zero, and
    saturates at `i64::MIN`/`i64::MAX` when the result is not representable.
    Exact conversions stay exact.
*/
pub fn rescale(value: i64, from: Rational, to: Rational) -> i64 {
    if from.num == to.num && from.den == to.den {
        return value;
    }

    // value * (from.num / from.den) / (to.num / to.den)
    // = value * from.num * to.den / (from.den * to.num)
    let num = value as i128 * from.num as i128 * to.den as i128;
    let den = from.den as i128 * to.num as i128;

    let half = den / 2;
    let rounded = if num >= 0 {
        (num + half) / den
    } else {
        -((-num + half) / den)
    };

    rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/**
    Rescale a timestamp from one time base to another.

    Same rounding as [`rescale`], except that `i64::MIN` and `i64::MAX` pass
    through unchanged: the container library uses the extreme values as
    unknown-timestamp sentinels, and a sentinel must survive rescaling.
*/
pub fn rescale_timestamp(value: i64, from: Rational, to: Rational) -> i64 {
    if value == i64::MIN || value == i64::MAX {
        return value;
    }

    rescale(value, from, to)
}

/**
    Compare two timestamps expressed in different time bases.

    Normalizes each side by its own time base, so the comparison is by real
    time rather than by raw tick count.
*/
pub fn compare_ts(a: i64, time_base_a: Rational, b: i64, time_base_b: Rational) -> Ordering {
    // a * na/da <=> b * nb/db  multiplied through by da * db (both positive)
    let lhs = a as i128 * time_base_a.num as i128 * time_base_b.den as i128;
    let rhs = b as i128 * time_base_b.num as i128 * time_base_a.den as i128;

    lhs.cmp(&rhs)
}
