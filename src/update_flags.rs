//! Change notifications produced by one ingestion cycle.
//!
//! The renderer reads the flags returned by
//! [`AggregationCascade::collect`](crate::storage::AggregationCascade::collect)
//! to pick the smallest region worth repainting.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, BitXor, Not};

use serde::Serialize;

/// Bitmask of what changed during a `collect` call.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub struct UpdateFlags(u16);

impl UpdateFlags {
    pub const NONE: Self = Self(0);
    /// Current-reading median moved
    pub const CURRENT_READING: Self = Self(1 << 0);
    pub const STATS_DAY: Self = Self(1 << 1);
    pub const STATS_WEEK: Self = Self(1 << 2);
    pub const STATS_MONTH: Self = Self(1 << 3);
    pub const HISTORY_HOUR: Self = Self(1 << 4);
    pub const HISTORY_DAY: Self = Self(1 << 5);
    pub const HISTORY_WEEK: Self = Self(1 << 6);
    pub const HISTORY_MONTH: Self = Self(1 << 7);
    pub const HISTORY_YEAR: Self = Self(1 << 8);

    /// All window statistics
    pub const STATS_ALL: Self =
        Self(Self::STATS_DAY.0 | Self::STATS_WEEK.0 | Self::STATS_MONTH.0);

    /// Every history tier
    pub const HISTORY_ALL: Self = Self(
        Self::HISTORY_HOUR.0
            | Self::HISTORY_DAY.0
            | Self::HISTORY_WEEK.0
            | Self::HISTORY_MONTH.0
            | Self::HISTORY_YEAR.0,
    );

    /// Every defined bit
    pub const ALL: Self = Self(Self::CURRENT_READING.0 | Self::STATS_ALL.0 | Self::HISTORY_ALL.0);

    const NAMES: [(Self, &'static str); 9] = [
        (Self::CURRENT_READING, "CURRENT_READING"),
        (Self::STATS_DAY, "STATS_DAY"),
        (Self::STATS_WEEK, "STATS_WEEK"),
        (Self::STATS_MONTH, "STATS_MONTH"),
        (Self::HISTORY_HOUR, "HISTORY_HOUR"),
        (Self::HISTORY_DAY, "HISTORY_DAY"),
        (Self::HISTORY_WEEK, "HISTORY_WEEK"),
        (Self::HISTORY_MONTH, "HISTORY_MONTH"),
        (Self::HISTORY_YEAR, "HISTORY_YEAR"),
    ];

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Whether the chart needs repainting.
    pub const fn touches_history(self) -> bool {
        self.intersects(Self::HISTORY_ALL)
    }
}

impl BitOr for UpdateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for UpdateFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for UpdateFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitXor for UpdateFlags {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

/// Complement within the defined bits, so `!flags` never sets unused ones.
impl Not for UpdateFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl fmt::Debug for UpdateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
