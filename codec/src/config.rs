//! Limits applied while decoding untrusted input.

use core::ops::{Bound, RangeBounds};

/// Default upper bound on any declared length.
pub const DEFAULT_MAX_LENGTH: usize = 1 << 24;

/// Default upper bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default upper bound on the number of zero-sized elements in one decode.
pub const DEFAULT_MAX_ZERO_SIZED: usize = 1 << 16;

/// Configuration for limiting the range of a value.
///
/// Used to bound declared lengths (strings, sequences, maps, arrays and record field counts).
///
/// # Examples
///
/// ```
/// use commonware_bin::RangeCfg;
///
/// // Limit lengths to 0..=1024 (type inferred as usize)
/// let cfg = RangeCfg::new(0..=1024);
/// assert!(cfg.contains(&500));
/// assert!(!cfg.contains(&2000));
///
/// // Allow any length >= 1
/// let cfg_min = RangeCfg::from(1..);
/// assert!(cfg_min.contains(&1));
/// assert!(!cfg_min.contains(&0));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg<T: Copy + PartialOrd> {
    start: Bound<T>,
    end: Bound<T>,
}

impl<T: Copy + PartialOrd> RangeCfg<T> {
    /// Creates a new `RangeCfg` from any type implementing `RangeBounds<T>`.
    pub fn new(r: impl RangeBounds<T>) -> Self {
        RangeCfg {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `value`.
    pub fn exact(value: T) -> Self {
        Self {
            start: Bound::Included(value),
            end: Bound::Included(value),
        }
    }

    /// Returns true if the value is within this range.
    pub fn contains(&self, value: &T) -> bool {
        match &self.start {
            Bound::Included(s) if value < s => return false,
            Bound::Excluded(s) if value <= s => return false,
            _ => {}
        }
        match &self.end {
            Bound::Included(e) if value > e => return false,
            Bound::Excluded(e) if value >= e => return false,
            _ => {}
        }
        true
    }
}

// Implements `From` for each of the standard range types.
macro_rules! impl_from_range {
    ($($range:ty),+) => {
        $(
            impl<T: Copy + PartialOrd> From<$range> for RangeCfg<T> {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )+
    };
}
impl_from_range!(
    core::ops::Range<T>,
    core::ops::RangeInclusive<T>,
    core::ops::RangeFrom<T>,
    core::ops::RangeTo<T>,
    core::ops::RangeToInclusive<T>
);

impl<T: Copy + PartialOrd> From<core::ops::RangeFull> for RangeCfg<T> {
    fn from(_: core::ops::RangeFull) -> Self {
        Self::new(..)
    }
}

impl<T: Copy + PartialOrd> RangeBounds<T> for RangeCfg<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.end.as_ref()
    }
}

/// Decoder configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Accepted range for every declared length.
    pub length: RangeCfg<usize>,

    /// Maximum nesting depth of values and type descriptors.
    pub max_depth: usize,

    /// Maximum number of elements (in total) whose encoding may occupy no bytes.
    ///
    /// Such elements cannot be bounded by the remaining input.
    pub max_zero_sized: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            length: RangeCfg::new(..=DEFAULT_MAX_LENGTH),
            max_depth: DEFAULT_MAX_DEPTH,
            max_zero_sized: DEFAULT_MAX_ZERO_SIZED,
        }
    }
}
