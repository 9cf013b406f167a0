pub mod accumulator;
pub mod fixed_point;
pub mod manager;
pub mod ring_buffer;
pub mod rollup;

pub use accumulator::AggregationTier;
pub use fixed_point::{CompactSample, decode, encode};
pub use manager::{AggregationCascade, CascadeState, QuantityHistory};
pub use ring_buffer::RingBuffer;
pub use rollup::Statistics;

use crate::update_flags::UpdateFlags;

/// Raw reads kept for the current-reading median filter
pub const CURRENT_LEN: usize = 10;
/// Hour tier: 30 px at 2 minutes each
pub const HOUR_LEN: usize = 30;
/// Day tier: 46 px at 30 minutes each (23 hours)
pub const DAY_LEN: usize = 46;
/// Week tier: 36 px at 4 hours each (6 days)
pub const WEEK_LEN: usize = 36;
/// Month tier: 69 px at 8 hours each (23 days)
pub const MONTH_LEN: usize = 69;
/// Year tier: 48 px at roughly a week each (11 months)
pub const YEAR_LEN: usize = 48;

/// Length of a flattened history chart: one slot per coarse-tier sample.
pub const CHART_LEN: usize = HOUR_LEN + DAY_LEN + WEEK_LEN + MONTH_LEN + YEAR_LEN;

/// Scratch capacity for window statistics: the largest stats window tier
/// plus the one in-progress sample folded in ahead of it.
pub const STATS_SCRATCH_LEN: usize = MONTH_LEN + 1;

/// Coarse history tiers, finest first.
///
/// Each one rolls up from the tier before it; the hour tier rolls up from
/// the raw current-reading buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTier {
    /// 2 minute pixels
    Hour,
    /// 30 minute pixels
    Day,
    /// 4 hour pixels
    Week,
    /// 8 hour pixels
    Month,
    /// Roughly weekly pixels
    Year,
}

impl HistoryTier {
    /// All tiers in rollup order.
    pub const ALL: [HistoryTier; 5] = [
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
    ];

    /// Get a short label for logs and errors
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Number of samples this tier retains
    pub const fn capacity(self) -> usize {
        match self {
            Self::Hour => HOUR_LEN,
            Self::Day => DAY_LEN,
            Self::Week => WEEK_LEN,
            Self::Month => MONTH_LEN,
            Self::Year => YEAR_LEN,
        }
    }

    /// Capacity of the buffer this tier rolls up from
    pub const fn source_capacity(self) -> usize {
        match self {
            Self::Hour => CURRENT_LEN,
            Self::Day => HOUR_LEN,
            Self::Week => DAY_LEN,
            Self::Month => WEEK_LEN,
            Self::Year => MONTH_LEN,
        }
    }

    /// Flag raised when this tier receives a new sample
    pub const fn flag(self) -> UpdateFlags {
        match self {
            Self::Hour => UpdateFlags::HISTORY_HOUR,
            Self::Day => UpdateFlags::HISTORY_DAY,
            Self::Week => UpdateFlags::HISTORY_WEEK,
            Self::Month => UpdateFlags::HISTORY_MONTH,
            Self::Year => UpdateFlags::HISTORY_YEAR,
        }
    }
}

/// Periods summarized next to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsWindow {
    /// Last 24 hours
    Day,
    /// Last 7 days
    Week,
    /// Last month
    Month,
}

impl StatsWindow {
    pub const ALL: [StatsWindow; 3] = [Self::Day, Self::Week, Self::Month];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::Week => "1w",
            Self::Month => "1m",
        }
    }

    /// Flag raised when this window's statistics are recomputed
    pub const fn flag(self) -> UpdateFlags {
        match self {
            Self::Day => UpdateFlags::STATS_DAY,
            Self::Week => UpdateFlags::STATS_WEEK,
            Self::Month => UpdateFlags::STATS_MONTH,
        }
    }
}
