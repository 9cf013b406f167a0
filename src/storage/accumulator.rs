use core::fmt;

use log::trace;

use super::fixed_point::CompactSample;
use super::ring_buffer::RingBuffer;
use super::rollup::Statistics;
use crate::config::TierSchedule;

/// One resolution level of the history cascade.
///
/// A tier owns its samples and a real-time accumulator. Time only counts
/// toward the next push while the source tier is full, so a coarse tier
/// never summarizes a half-populated window. When the accumulator reaches
/// the push interval the interval is subtracted, keeping the remainder, and
/// the median of the oldest `window` source samples is pushed.
///
/// ## Usage
///
/// ```rust
/// use hygro_rs::config::TierSchedule;
/// use hygro_rs::storage::{AggregationTier, RingBuffer};
///
/// let mut source: RingBuffer<i16, 3> = RingBuffer::new();
/// let mut tier: AggregationTier<i16, 4> = AggregationTier::seeded(TierSchedule::new(60, 3));
///
/// for value in [2100, 2300, 2200] {
///     source.push_overwrite(value);
/// }
/// assert_eq!(tier.advance(1, &source), Some(2200));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AggregationTier<T, const N: usize> {
    buffer: RingBuffer<T, N>,
    /// Seconds counted toward the next push
    elapsed_secs: u32,
    schedule: TierSchedule,
}

impl<T: CompactSample, const N: usize> AggregationTier<T, N> {
    /// Zeroed tier with no schedule. This is what uninitialized retained
    /// memory looks like; it never rolls up until reset.
    pub const fn new() -> Self {
        Self {
            buffer: RingBuffer::new(),
            elapsed_secs: 0,
            schedule: TierSchedule::new(0, 0),
        }
    }

    /// Empty tier seeded one second short of its first push, so the first
    /// rollup happens as soon as the source fills.
    pub fn seeded(schedule: TierSchedule) -> Self {
        Self {
            buffer: RingBuffer::new(),
            elapsed_secs: schedule.interval_secs.saturating_sub(1),
            schedule,
        }
    }

    /// Count `elapsed_secs` toward the next push if `source` is full.
    pub fn tick<const M: usize>(&mut self, elapsed_secs: u32, source: &RingBuffer<T, M>) {
        if source.is_full() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(elapsed_secs);
        }
    }

    /// Whether enough time has accumulated for a push.
    pub fn is_due(&self) -> bool {
        self.schedule.interval_secs > 0 && self.elapsed_secs >= self.schedule.interval_secs
    }

    /// Push the median of the source window if due, returning it.
    ///
    /// At most one push happens per call. After a long suspension the
    /// backlog drains one interval per cycle, so the tier (and the tiers
    /// above it) fill with repeated medians of an unchanged source until it
    /// catches up.
    pub fn roll_up<const M: usize>(&mut self, source: &RingBuffer<T, M>) -> Option<T> {
        if !self.is_due() {
            return None;
        }
        self.elapsed_secs -= self.schedule.interval_secs;

        let median = Statistics::compute(source, self.schedule.window).median;
        self.buffer.push_overwrite(median);
        trace!(
            "rolled up {} (carry {}s, {} / {})",
            median,
            self.elapsed_secs,
            self.buffer.len(),
            N
        );
        Some(median)
    }

    /// [`tick`](Self::tick) then [`roll_up`](Self::roll_up).
    pub fn advance<const M: usize>(
        &mut self,
        elapsed_secs: u32,
        source: &RingBuffer<T, M>,
    ) -> Option<T> {
        self.tick(elapsed_secs, source);
        self.roll_up(source)
    }

    pub fn buffer(&self) -> &RingBuffer<T, N> {
        &self.buffer
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn schedule(&self) -> TierSchedule {
        self.schedule
    }

    #[cfg(test)]
    pub(crate) fn buffer_mut(&mut self) -> &mut RingBuffer<T, N> {
        &mut self.buffer
    }
}

impl<T: CompactSample, const N: usize> Default for AggregationTier<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for AggregationTier<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationTier")
            .field("buffer", &self.buffer)
            .field("elapsed_secs", &self.elapsed_secs)
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl<T: fmt::Display, const N: usize> fmt::Display for AggregationTier<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} +{}s/{}s",
            self.buffer, self.elapsed_secs, self.schedule.interval_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_source() -> RingBuffer<i16, 4> {
        let mut source = RingBuffer::new();
        for value in [40, 10, 30, 20] {
            source.push_overwrite(value);
        }
        source
    }

    #[test]
    fn test_seeded_one_second_short() {
        let tier: AggregationTier<i16, 8> = AggregationTier::seeded(TierSchedule::new(60, 4));

        assert_eq!(tier.elapsed_secs(), 59);
        assert!(!tier.is_due());
        assert!(tier.buffer().is_empty());
    }

    #[test]
    fn test_tick_gated_on_full_source() {
        let mut tier: AggregationTier<i16, 8> = AggregationTier::seeded(TierSchedule::new(60, 4));
        let mut source: RingBuffer<i16, 4> = RingBuffer::new();
        source.push_overwrite(1);

        tier.tick(1_000, &source);
        assert_eq!(tier.elapsed_secs(), 59);
        assert_eq!(tier.roll_up(&source), None);

        tier.tick(1, &full_source());
        assert_eq!(tier.elapsed_secs(), 60);
    }

    #[test]
    fn test_roll_up_keeps_remainder() {
        let mut tier: AggregationTier<i16, 8> = AggregationTier::seeded(TierSchedule::new(60, 4));
        let source = full_source();

        assert_eq!(tier.advance(25, &source), Some(25));
        assert_eq!(tier.elapsed_secs(), 24);
        assert_eq!(tier.buffer().len(), 1);
    }

    #[test]
    fn test_one_push_per_call_even_with_backlog() {
        let mut tier: AggregationTier<i16, 8> = AggregationTier::seeded(TierSchedule::new(60, 4));
        let source = full_source();

        assert!(tier.advance(600, &source).is_some());
        assert_eq!(tier.buffer().len(), 1);
        assert_eq!(tier.elapsed_secs(), 599);

        // The backlog drains one interval per call, repeating the median.
        assert_eq!(tier.advance(0, &source), Some(25));
        assert_eq!(tier.elapsed_secs(), 539);
        assert_eq!(tier.buffer().len(), 2);
        assert_eq!(tier.buffer().oldest(), tier.buffer().newest());
    }

    #[test]
    fn test_window_limits_source_prefix() {
        let mut tier: AggregationTier<i16, 8> = AggregationTier::seeded(TierSchedule::new(60, 2));

        // Oldest two of [40, 10, 30, 20] -> (10 + 40) / 2
        assert_eq!(tier.advance(1, &full_source()), Some(25));
    }

    #[test]
    fn test_unscheduled_tier_never_rolls() {
        let mut tier: AggregationTier<i16, 8> = AggregationTier::new();

        assert_eq!(tier.advance(u32::MAX, &full_source()), None);
        assert!(tier.buffer().is_empty());
    }

    #[test]
    fn test_accumulator_saturates() {
        let mut tier: AggregationTier<i16, 8> = AggregationTier::seeded(TierSchedule::new(60, 4));
        tier.tick(u32::MAX, &full_source());

        assert_eq!(tier.elapsed_secs(), u32::MAX);
    }
}
