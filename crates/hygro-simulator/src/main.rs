//! Desktop simulator for the hygro-rs history cascade.
//!
//! Replays weeks of synthetic temperature/humidity readings through the
//! cascade on an accelerated clock, the way the firmware would across deep
//! sleep cycles: the [`CascadeState`] outlives each wake-up and every wake
//! attaches a fresh [`AggregationCascade`] to it.
//!
//! Run with `RUST_LOG=debug` to see every rollup, or `RUST_LOG=trace` for
//! each cycle.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};

use hygro_rs::chart;
use hygro_rs::config::{CascadeConfig, SAMPLE_INTERVAL_SECS};
use hygro_rs::sensors::{Quantity, Reading};
use hygro_rs::storage::{AggregationCascade, CascadeState, HistoryTier, StatsWindow};
use hygro_rs::{Compact, UpdateFlags};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Simulated run length.
const SIMULATED_DAYS: u32 = 45;

/// Every this many wake-ups the device "sleeps through" a long gap.
const SUSPEND_EVERY: u32 = 20_000;

/// Length of the occasional long gap.
const SUSPEND_SECS: u32 = 6 * 3_600;

/// How often a progress summary is logged, in simulated seconds.
const REPORT_EVERY_SECS: u32 = 86_400;

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates synthetic readings that follow a daily cycle.
struct MockSensorGenerator {
    /// Small deterministic noise source.
    seed: u32,
}

impl MockSensorGenerator {
    fn new(seed: u32) -> Self {
        Self { seed: seed | 1 }
    }

    /// xorshift32, mapped to -1.0..1.0
    fn noise(&mut self) -> f64 {
        self.seed ^= self.seed << 13;
        self.seed ^= self.seed >> 17;
        self.seed ^= self.seed << 5;
        (self.seed as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Reading at simulated second `t`.
    fn sample(&mut self, t: u32) -> Reading {
        let day = t as f64 / 86_400.0;
        let phase = day * core::f64::consts::TAU;

        // Temperature: 18–26 °C daily swing with a slow seasonal drift
        let temperature =
            22.0 + 4.0 * phase.sin() + 1.5 * (day / 30.0).sin() + 0.2 * self.noise();

        // Humidity: runs opposite to temperature, 35–65 %
        let humidity = 50.0 - 12.0 * phase.sin() + 3.0 * (day / 7.0).cos() + 0.5 * self.noise();

        // The odd sensor glitch, which the current-reading median filters out
        let temperature = if self.noise() > 0.995 {
            temperature + 40.0
        } else {
            temperature
        };

        Reading::new(temperature as f32, humidity as f32)
    }
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

fn report(cascade: &AggregationCascade<'_, Compact>, day: u32) {
    info!("=== day {} ===", day);
    for quantity in Quantity::ALL {
        let unit = quantity.unit();
        info!(
            "{}: now {:.2}{}",
            quantity.label(),
            cascade.current(quantity),
            unit
        );
        for window in StatsWindow::ALL {
            let stats = cascade.statistics(quantity, window);
            if stats.is_empty() {
                info!("  {}: no data", window.label());
                continue;
            }
            info!(
                "  {}: avg {:.2}{} median {:.2}{} range {:.2}..{:.2}{} (n={})",
                window.label(),
                stats.average,
                unit,
                stats.median,
                unit,
                stats.min,
                stats.max,
                unit,
                stats.count
            );
        }

        let history = cascade.state().history(quantity);
        let held: Vec<String> = HistoryTier::ALL
            .iter()
            .map(|&tier| {
                format!(
                    "{} {}/{}",
                    tier.label(),
                    history.tier_len(tier),
                    tier.capacity()
                )
            })
            .collect();
        let series = cascade.chart_series(quantity);
        info!(
            "  tiers: {} | chart {}/{} points",
            held.join(", "),
            chart::filled_len(&series),
            series.len()
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting hygro-rs simulator");

    let config = CascadeConfig::default();
    info!(
        "Simulating {} days at one read every {}s",
        SIMULATED_DAYS, SAMPLE_INTERVAL_SECS
    );

    let start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or_default();

    let mut sensor_gen = MockSensorGenerator::new(start);

    // Stand-in for the retained memory block.
    let mut state: CascadeState<Compact> = CascadeState::new();
    let mut cold_start = true;

    let end = SIMULATED_DAYS * 86_400;
    let mut t: u32 = 0;
    let mut wake: u32 = 0;
    let mut next_report = REPORT_EVERY_SECS;
    let mut history_redraws: u32 = 0;

    while t < end {
        let mut cascade = match AggregationCascade::new(&mut state, &config, cold_start) {
            Ok(cascade) => cascade,
            Err(e) => {
                log::error!("Rejected cascade config: {}", e);
                return;
            }
        };
        cold_start = false;

        let flags = cascade.collect(sensor_gen.sample(t), start.wrapping_add(t));
        if flags.touches_history() {
            history_redraws += 1;
        }
        if flags.contains(UpdateFlags::HISTORY_YEAR) {
            info!("Year tier pushed at day {}", t / 86_400);
        }

        if t >= next_report {
            report(&cascade, t / 86_400);
            next_report += REPORT_EVERY_SECS;
        }

        wake += 1;
        t += if wake % SUSPEND_EVERY == 0 {
            warn!("Simulating a {}h suspension", SUSPEND_SECS / 3_600);
            SUSPEND_SECS
        } else {
            SAMPLE_INTERVAL_SECS
        };
    }

    let cascade = match AggregationCascade::new(&mut state, &config, false) {
        Ok(cascade) => cascade,
        Err(e) => {
            log::error!("Rejected cascade config: {}", e);
            return;
        }
    };
    report(&cascade, SIMULATED_DAYS);
    cascade.log_state();

    info!(
        "Simulator exiting after {} wake-ups ({} with history changes)",
        wake, history_redraws
    );
}
