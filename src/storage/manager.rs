use core::fmt;
use core::iter;

use log::{debug, info, trace, warn};

use super::accumulator::AggregationTier;
use super::fixed_point::CompactSample;
use super::ring_buffer::RingBuffer;
use super::rollup::Statistics;
use super::{
    CURRENT_LEN, DAY_LEN, HOUR_LEN, HistoryTier, MONTH_LEN, STATS_SCRATCH_LEN, StatsWindow,
    WEEK_LEN, YEAR_LEN,
};
use crate::chart::{self, ChartSeries};
use crate::config::{CascadeConfig, ConfigError};
use crate::sensors::{Quantity, Reading};
use crate::update_flags::UpdateFlags;

/// Every tier and cached summary for one quantity.
///
/// ## Memory Usage (i16 samples)
///
/// - Current reads: 10 × 2 bytes
/// - Hour: 30 × 2 bytes (2 min each)
/// - Day: 46 × 2 bytes (30 min each)
/// - Week: 36 × 2 bytes (4 h each)
/// - Month: 69 × 2 bytes (8 h each)
/// - Year: 48 × 2 bytes (~1 week each)
/// - **Total: ~0.5 KB** plus accumulators and three cached statistics
#[derive(Clone, PartialEq, Eq)]
pub struct QuantityHistory<T> {
    /// Raw reads feeding the current-reading median
    pub(crate) current: RingBuffer<T, CURRENT_LEN>,
    pub(crate) hour: AggregationTier<T, HOUR_LEN>,
    pub(crate) day: AggregationTier<T, DAY_LEN>,
    pub(crate) week: AggregationTier<T, WEEK_LEN>,
    pub(crate) month: AggregationTier<T, MONTH_LEN>,
    pub(crate) year: AggregationTier<T, YEAR_LEN>,
    current_median: T,
    stats_day: Statistics<T>,
    stats_week: Statistics<T>,
    stats_month: Statistics<T>,
}

impl<T: CompactSample> QuantityHistory<T> {
    /// Zeroed history with unscheduled tiers.
    pub const fn new() -> Self {
        Self {
            current: RingBuffer::new(),
            hour: AggregationTier::new(),
            day: AggregationTier::new(),
            week: AggregationTier::new(),
            month: AggregationTier::new(),
            year: AggregationTier::new(),
            current_median: T::ZERO,
            stats_day: Statistics::empty(),
            stats_week: Statistics::empty(),
            stats_month: Statistics::empty(),
        }
    }

    /// Empty history with every tier seeded for its first push.
    pub fn seeded(config: &CascadeConfig) -> Self {
        Self {
            hour: AggregationTier::seeded(config.hour),
            day: AggregationTier::seeded(config.day),
            week: AggregationTier::seeded(config.week),
            month: AggregationTier::seeded(config.month),
            year: AggregationTier::seeded(config.year),
            ..Self::new()
        }
    }

    /// Run one ingestion cycle for this quantity.
    fn ingest(&mut self, quantity: Quantity, raw: T, elapsed_secs: u32) -> UpdateFlags {
        let mut flags = UpdateFlags::NONE;

        self.current.push_overwrite(raw);
        let median = Statistics::of_buffer(&self.current).median;
        if median != self.current_median {
            self.current_median = median;
            flags |= UpdateFlags::CURRENT_READING;
        }

        // Finest first, so a push here is visible to the next tier's tick.
        let pushed = self.hour.advance(elapsed_secs, &self.current);
        note_rollup(&mut flags, quantity, HistoryTier::Hour, pushed);
        let pushed = self.day.advance(elapsed_secs, self.hour.buffer());
        note_rollup(&mut flags, quantity, HistoryTier::Day, pushed);
        let pushed = self.week.advance(elapsed_secs, self.day.buffer());
        note_rollup(&mut flags, quantity, HistoryTier::Week, pushed);
        let pushed = self.month.advance(elapsed_secs, self.week.buffer());
        note_rollup(&mut flags, quantity, HistoryTier::Month, pushed);
        let pushed = self.year.advance(elapsed_secs, self.month.buffer());
        note_rollup(&mut flags, quantity, HistoryTier::Year, pushed);

        if flags.contains(UpdateFlags::HISTORY_HOUR) {
            self.refresh_window_stats();
            debug!(
                "{} stats: 1d {} / 1w {} / 1m {}",
                quantity.label(),
                self.stats_day,
                self.stats_week,
                self.stats_month
            );
            flags |= UpdateFlags::STATS_ALL;
        }

        flags
    }

    /// Recompute day/week/month summaries, each including the in-progress
    /// period as one extra sample: the hour tier's median for the day, the
    /// day median for the week, the week median for the month.
    fn refresh_window_stats(&mut self) {
        let hour_median = Statistics::of_buffer(self.hour.buffer()).median;

        self.stats_day = window_stats(hour_median, self.day.buffer());
        self.stats_week = window_stats(self.stats_day.median, self.week.buffer());
        self.stats_month = window_stats(self.stats_week.median, self.month.buffer());
    }

    /// Median of the most recent raw reads.
    pub fn current_median(&self) -> T {
        self.current_median
    }

    /// Cached summary for `window`, as of the last hour-tier push.
    pub fn statistics(&self, window: StatsWindow) -> Statistics<T> {
        match window {
            StatsWindow::Day => self.stats_day,
            StatsWindow::Week => self.stats_week,
            StatsWindow::Month => self.stats_month,
        }
    }

    pub fn current_buffer(&self) -> &RingBuffer<T, CURRENT_LEN> {
        &self.current
    }

    pub fn hour(&self) -> &AggregationTier<T, HOUR_LEN> {
        &self.hour
    }

    pub fn day(&self) -> &AggregationTier<T, DAY_LEN> {
        &self.day
    }

    pub fn week(&self) -> &AggregationTier<T, WEEK_LEN> {
        &self.week
    }

    pub fn month(&self) -> &AggregationTier<T, MONTH_LEN> {
        &self.month
    }

    pub fn year(&self) -> &AggregationTier<T, YEAR_LEN> {
        &self.year
    }

    /// Accumulated seconds of a coarse tier.
    pub fn elapsed_secs(&self, tier: HistoryTier) -> u32 {
        match tier {
            HistoryTier::Hour => self.hour.elapsed_secs(),
            HistoryTier::Day => self.day.elapsed_secs(),
            HistoryTier::Week => self.week.elapsed_secs(),
            HistoryTier::Month => self.month.elapsed_secs(),
            HistoryTier::Year => self.year.elapsed_secs(),
        }
    }

    /// Number of samples held by a coarse tier.
    pub fn tier_len(&self, tier: HistoryTier) -> usize {
        match tier {
            HistoryTier::Hour => self.hour.buffer().len(),
            HistoryTier::Day => self.day.buffer().len(),
            HistoryTier::Week => self.week.buffer().len(),
            HistoryTier::Month => self.month.buffer().len(),
            HistoryTier::Year => self.year.buffer().len(),
        }
    }
}

impl<T: CompactSample> Default for QuantityHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn window_stats<T: CompactSample, const N: usize>(
    in_progress: T,
    completed: &RingBuffer<T, N>,
) -> Statistics<T> {
    Statistics::from_samples::<STATS_SCRATCH_LEN, _>(
        iter::once(in_progress).chain(completed.iter().copied()),
    )
}

fn note_rollup<T: CompactSample>(
    flags: &mut UpdateFlags,
    quantity: Quantity,
    tier: HistoryTier,
    pushed: Option<T>,
) {
    if let Some(value) = pushed {
        debug!(
            "{} {} rollup: {}{}",
            quantity.label(),
            tier.label(),
            value.decode(),
            quantity.unit()
        );
        flags.insert(tier.flag());
    }
}

impl<T: fmt::Display> fmt::Display for QuantityHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "current: {}", self.current)?;
        writeln!(f, "hour: {}", self.hour)?;
        writeln!(f, "day: {}", self.day)?;
        writeln!(f, "week: {}", self.week)?;
        writeln!(f, "month: {}", self.month)?;
        writeln!(f, "year: {}", self.year)?;
        writeln!(f, "1d: {}", self.stats_day)?;
        writeln!(f, "1w: {}", self.stats_week)?;
        write!(f, "1m: {}", self.stats_month)
    }
}

impl<T: fmt::Debug> fmt::Debug for QuantityHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantityHistory")
            .field("current", &self.current)
            .field("hour", &self.hour)
            .field("day", &self.day)
            .field("week", &self.week)
            .field("month", &self.month)
            .field("year", &self.year)
            .field("current_median", &self.current_median)
            .finish_non_exhaustive()
    }
}

/// Everything the cascade keeps between wake-ups.
///
/// The firmware places one of these in memory that survives deep sleep
/// (RTC slow memory on the ESP32) and hands it to
/// [`AggregationCascade::new`] on every boot. `new()` is `const` so the
/// state can live in a `static`; a zeroed state must be seeded through a
/// cold start before it does anything useful.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CascadeState<T> {
    /// Wall-clock seconds of the previous `collect`
    last_collected_at: Option<u32>,
    temperature: QuantityHistory<T>,
    humidity: QuantityHistory<T>,
}

impl<T: CompactSample> CascadeState<T> {
    pub const fn new() -> Self {
        Self {
            last_collected_at: None,
            temperature: QuantityHistory::new(),
            humidity: QuantityHistory::new(),
        }
    }

    /// Discard all history and seed every tier from `config`.
    pub fn reset(&mut self, config: &CascadeConfig) {
        *self = Self {
            last_collected_at: None,
            temperature: QuantityHistory::seeded(config),
            humidity: QuantityHistory::seeded(config),
        };
    }

    pub fn history(&self, quantity: Quantity) -> &QuantityHistory<T> {
        match quantity {
            Quantity::Temperature => &self.temperature,
            Quantity::Humidity => &self.humidity,
        }
    }

    pub fn last_collected_at(&self) -> Option<u32> {
        self.last_collected_at
    }

    pub(crate) fn history_mut(&mut self, quantity: Quantity) -> &mut QuantityHistory<T> {
        match quantity {
            Quantity::Temperature => &mut self.temperature,
            Quantity::Humidity => &mut self.humidity,
        }
    }
}

impl<T: CompactSample> Default for CascadeState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrates one ingestion cycle over a borrowed [`CascadeState`].
///
/// ## Usage
///
/// ```rust
/// use hygro_rs::Compact;
/// use hygro_rs::config::CascadeConfig;
/// use hygro_rs::sensors::Reading;
/// use hygro_rs::storage::{AggregationCascade, CascadeState};
///
/// let mut state: CascadeState<Compact> = CascadeState::new();
/// let config = CascadeConfig::default();
///
/// // First boot: no retained state, seed the tiers.
/// let mut cascade = AggregationCascade::new(&mut state, &config, true).unwrap();
/// let flags = cascade.collect(Reading::new(21.5, 48.0), 1_700_000_000);
/// if flags.touches_history() {
///     // repaint the chart
/// }
/// ```
pub struct AggregationCascade<'s, T> {
    state: &'s mut CascadeState<T>,
}

impl<'s, T: CompactSample> AggregationCascade<'s, T> {
    /// Attach to `state`. A cold start wipes and seeds it; a warm resume
    /// carries it over untouched.
    pub fn new(
        state: &'s mut CascadeState<T>,
        config: &CascadeConfig,
        cold_start: bool,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if cold_start {
            info!("Cold start: seeding history tiers");
            state.reset(config);
        } else {
            info!(
                "Warm resume: last collect at {:?}, {} raw reads held",
                state.last_collected_at,
                state.temperature.current.len()
            );
        }

        Ok(Self { state })
    }

    /// Ingest one reading taken at wall-clock second `now_secs`.
    ///
    /// Gaps of any length between calls are fine. A clock that steps
    /// backwards counts as zero elapsed time.
    pub fn collect(&mut self, reading: Reading, now_secs: u32) -> UpdateFlags {
        let elapsed_secs = self.elapsed_since_last(now_secs);

        let mut flags = UpdateFlags::NONE;
        for quantity in Quantity::ALL {
            let raw = T::encode(reading.value(quantity));
            flags |= self
                .state
                .history_mut(quantity)
                .ingest(quantity, raw, elapsed_secs);
        }

        trace!("collect +{}s -> {:?}", elapsed_secs, flags);
        flags
    }

    fn elapsed_since_last(&mut self, now_secs: u32) -> u32 {
        let elapsed = match self.state.last_collected_at {
            None => 0,
            Some(last) if now_secs >= last => now_secs - last,
            Some(last) => {
                warn!("Clock stepped back {}s; counting no elapsed time", last - now_secs);
                0
            }
        };
        self.state.last_collected_at = Some(now_secs);
        elapsed
    }

    /// Current-reading median in physical units.
    pub fn current(&self, quantity: Quantity) -> f32 {
        self.state.history(quantity).current_median().decode()
    }

    /// Window statistics in physical units.
    pub fn statistics(&self, quantity: Quantity, window: StatsWindow) -> Statistics<f32> {
        self.state.history(quantity).statistics(window).decode()
    }

    /// Flattened chart series, newest first.
    pub fn chart_series(&self, quantity: Quantity) -> ChartSeries {
        chart::build_series(self.state.history(quantity))
    }

    pub fn state(&self) -> &CascadeState<T> {
        self.state
    }

    /// Dump every tier at debug level.
    pub fn log_state(&self) {
        debug!("====== Cascade state ======");
        debug!("last collected at: {:?}", self.state.last_collected_at);
        for quantity in Quantity::ALL {
            debug!("--- {} ---\n{}", quantity.label(), self.state.history(quantity));
        }
    }
}
