//! Multi-resolution temperature/humidity history for hygro-rs
//!
//! A battery-powered monitor wakes every few seconds, takes one reading and
//! goes back to sleep. This crate keeps everything it needs to show the last
//! hour through roughly the last year: a cascade of fixed-size ring buffers,
//! each fed by the median of the finer tier below it, plus day/week/month
//! summaries and the flattened chart series.
//!
//! It is `#![no_std]` and never allocates, so the whole [`storage::CascadeState`]
//! can sit in memory that survives deep sleep. Sensor drivers, the display and
//! the wake-up schedule live in the firmware.

#![no_std]

pub mod chart;
pub mod config;
pub mod sensors;
pub mod storage;
pub mod update_flags;

/// Sample width used by the device: hundredths in an `i16` cover
/// -327.68..=327.67 °C / %RH.
pub type Compact = i16;

pub use config::{CascadeConfig, ConfigError, TierSchedule};
pub use sensors::{Quantity, Reading};
pub use storage::{AggregationCascade, CascadeState, Statistics, StatsWindow};
pub use update_flags::UpdateFlags;
