//! Rollup schedule configuration.
//!
//! Tier capacities are fixed at compile time (see [`crate::storage`]) since
//! they size suspend-surviving memory. How often each tier pushes, and how
//! many samples of the tier below a rollup consumes, is configured here.
//!
//! ```text
//! T-0..T-1h  = 60m/30px    = 2m/px
//! T-1h..T-1d = 23h/46px    = 30m/px
//! T-1d..T-1w = 6*24h/36px  = 4h/px
//! T-1w..T-1m = 23*24h/69px = 8h/px
//! T-1m..T-1y = 330d/48px   = 6.875d/px
//! ```

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::storage::{CURRENT_LEN, DAY_LEN, HOUR_LEN, HistoryTier, MONTH_LEN, WEEK_LEN};

/// Nominal seconds between raw sensor reads (10 reads per hour-tier pixel).
pub const SAMPLE_INTERVAL_SECS: u32 = 12;

/// Errors raised when a [`CascadeConfig`] cannot drive the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A tier would be due on every cycle
    #[error("{tier} tier push interval must be non-zero")]
    ZeroInterval {
        /// Tier label
        tier: &'static str,
    },

    /// A rollup would summarize nothing
    #[error("{tier} tier rollup window must be non-zero")]
    EmptyWindow {
        /// Tier label
        tier: &'static str,
    },

    /// The window reaches past what the source tier can hold
    #[error("{tier} tier rollup window {window} exceeds source capacity {capacity}")]
    WindowExceedsSource {
        /// Tier label
        tier: &'static str,
        /// Configured window
        window: usize,
        /// Capacity of the tier below
        capacity: usize,
    },
}

/// When a tier pushes and how much of its source it summarizes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierSchedule {
    /// Seconds of real time (counted only while the source is full) per push
    pub interval_secs: u32,
    /// Number of oldest source samples the rollup median is taken over
    pub window: usize,
}

impl TierSchedule {
    pub const fn new(interval_secs: u32, window: usize) -> Self {
        Self {
            interval_secs,
            window,
        }
    }
}

/// Schedules for the five coarse tiers of one cascade.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeConfig {
    /// Expected seconds between `collect` calls; informational only, the
    /// cascade always uses the measured wall-clock delta.
    pub sample_interval_secs: u32,
    pub hour: TierSchedule,
    pub day: TierSchedule,
    pub week: TierSchedule,
    pub month: TierSchedule,
    pub year: TierSchedule,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: SAMPLE_INTERVAL_SECS,
            // 2m/px, full buf = 1h; median of all raw reads
            hour: TierSchedule::new(2 * 60, CURRENT_LEN),
            // 30m/px, full buf = 23h; 15 x 2m
            day: TierSchedule::new(30 * 60, 15),
            // 4h/px, full buf = 6d; 8 x 30m
            week: TierSchedule::new(4 * 60 * 60, 8),
            // 8h/px, full buf = 23d; 2 x 4h
            month: TierSchedule::new(8 * 60 * 60, 2),
            // 6.875d/px, full buf = 11 months; a week of 8h pixels
            year: TierSchedule::new(594_000, 7 * 24 / 8),
        }
    }
}

impl CascadeConfig {
    /// Schedule for a coarse tier.
    pub const fn schedule(&self, tier: HistoryTier) -> TierSchedule {
        match tier {
            HistoryTier::Hour => self.hour,
            HistoryTier::Day => self.day,
            HistoryTier::Week => self.week,
            HistoryTier::Month => self.month,
            HistoryTier::Year => self.year,
        }
    }

    /// Check every schedule against the tier it reads from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in HistoryTier::ALL {
            let schedule = self.schedule(tier);
            let capacity = tier.source_capacity();

            if schedule.interval_secs == 0 {
                return Err(ConfigError::ZeroInterval { tier: tier.label() });
            }
            if schedule.window == 0 {
                return Err(ConfigError::EmptyWindow { tier: tier.label() });
            }
            if schedule.window > capacity {
                return Err(ConfigError::WindowExceedsSource {
                    tier: tier.label(),
                    window: schedule.window,
                    capacity,
                });
            }
        }
        Ok(())
    }
}

// Window sizes must fit the compile-time capacities of their sources.
const _: () = assert!(CURRENT_LEN >= 10 && HOUR_LEN >= 15 && DAY_LEN >= 8);
const _: () = assert!(WEEK_LEN >= 2 && MONTH_LEN >= 21);
