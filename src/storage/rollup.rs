//! Summary statistics over sample windows.
//!
//! Every rollup in the cascade is the median of a window of the tier below,
//! and the day/week/month summaries shown next to the chart are full
//! [`Statistics`] records. Both come from [`Statistics::from_samples`].

use core::fmt;

use heapless::Vec;
use serde::Serialize;

use super::fixed_point::CompactSample;
use super::ring_buffer::RingBuffer;

/// Average, median and extrema of a window of samples.
///
/// An empty window yields all zeros with `count == 0`; check
/// [`is_empty`](Statistics::is_empty) before trusting the values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics<T> {
    /// Arithmetic mean, truncated toward zero
    pub average: T,
    /// Middle value; mean of the two middle values for even counts
    pub median: T,
    pub max: T,
    pub min: T,
    /// Number of samples summarized
    pub count: u16,
}

impl<T: CompactSample> Statistics<T> {
    /// Record for an empty window.
    pub const fn empty() -> Self {
        Self {
            average: T::ZERO,
            median: T::ZERO,
            max: T::ZERO,
            min: T::ZERO,
            count: 0,
        }
    }

    /// Summarize up to `S` samples taken from `samples`.
    ///
    /// `S` bounds the scratch copy used for the median sort; samples past
    /// it are ignored.
    pub fn from_samples<const S: usize, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut scratch: Vec<T, S> = samples.into_iter().take(S).collect();
        if scratch.is_empty() {
            return Self::empty();
        }

        let mut sum = 0i64;
        let mut min = scratch[0];
        let mut max = scratch[0];
        for &value in scratch.iter() {
            sum += value.widen();
            min = min.min(value);
            max = max.max(value);
        }

        let count = scratch.len();
        scratch.sort_unstable();
        let middle = count / 2;
        let median = if count % 2 != 0 {
            scratch[middle]
        } else {
            T::narrow((scratch[middle - 1].widen() + scratch[middle].widen()) / 2)
        };

        Self {
            average: T::narrow(sum / count as i64),
            median,
            max,
            min,
            count: count as u16,
        }
    }

    /// Summarize the oldest `limit` samples of `buffer` (all of them if it
    /// holds fewer). The buffer is left untouched.
    pub fn compute<const N: usize>(buffer: &RingBuffer<T, N>, limit: usize) -> Self {
        Self::from_samples::<N, _>(buffer.iter().take(limit).copied())
    }

    /// Summarize everything held in `buffer`.
    pub fn of_buffer<const N: usize>(buffer: &RingBuffer<T, N>) -> Self {
        Self::compute(buffer, N)
    }

    /// Convert every field to physical units.
    pub fn decode(&self) -> Statistics<f32> {
        Statistics {
            average: self.average.decode(),
            median: self.median.decode(),
            max: self.max.decode(),
            min: self.min.decode(),
            count: self.count,
        }
    }
}

impl<T> Statistics<T> {
    /// True when no samples backed this record.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<T: fmt::Display> fmt::Display for Statistics<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={} M={} ^={} v={} (n={})",
            self.average, self.median, self.max, self.min, self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of<const N: usize>(values: &[i16]) -> RingBuffer<i16, N> {
        let mut buffer = RingBuffer::new();
        for &value in values {
            buffer.push_overwrite(value);
        }
        buffer
    }

    #[test]
    fn test_odd_count_median() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[10, 30, 20]);
        let stats = Statistics::of_buffer(&buffer);

        assert_eq!(stats.median, 20);
        assert_eq!(stats.average, 20);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.max, 30);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_even_count_median_averages_middles() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[10, 30, 20, 40]);
        let stats = Statistics::of_buffer(&buffer);

        // sorted [10, 20, 30, 40] -> (20 + 30) / 2
        assert_eq!(stats.median, 25);
        assert_eq!(stats.average, 25);
    }

    #[test]
    fn test_even_median_truncates() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[1, 2]);
        assert_eq!(Statistics::of_buffer(&buffer).median, 1);

        let buffer: RingBuffer<i16, 8> = buffer_of(&[-1, -2]);
        assert_eq!(Statistics::of_buffer(&buffer).median, -1);
    }

    #[test]
    fn test_average_truncates() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[1, 2, 2]);
        assert_eq!(Statistics::of_buffer(&buffer).average, 1);
    }

    #[test]
    fn test_empty_buffer_is_zeroed() {
        let buffer: RingBuffer<i16, 8> = RingBuffer::new();
        let stats = Statistics::of_buffer(&buffer);

        assert_eq!(stats, Statistics::default());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_limit_uses_oldest_entries() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[5, 1, 3, 100, 200]);
        let stats = Statistics::compute(&buffer, 3);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.median, 3);
        assert_eq!(stats.max, 5);

        // A limit wider than the contents just takes everything.
        assert_eq!(Statistics::compute(&buffer, 50).count, 5);
    }

    #[test]
    fn test_source_not_mutated() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[40, 10, 30, 20]);
        let _ = Statistics::of_buffer(&buffer);

        assert_eq!(buffer, buffer_of::<8>(&[40, 10, 30, 20]));
    }

    #[test]
    fn test_no_overflow_near_width_limit() {
        let buffer: RingBuffer<i16, 8> = buffer_of(&[i16::MAX, i16::MAX, i16::MAX - 1]);
        let stats = Statistics::of_buffer(&buffer);

        assert_eq!(stats.max, i16::MAX);
        assert_eq!(stats.average, i16::MAX - 1);
    }

    #[test]
    fn test_from_samples_chains_extra_point() {
        let buffer: RingBuffer<i16, 4> = buffer_of(&[10, 20, 30, 40]);
        let stats = Statistics::from_samples::<5, _>(
            core::iter::once(50).chain(buffer.iter().copied()),
        );

        assert_eq!(stats.count, 5);
        assert_eq!(stats.median, 30);
        assert_eq!(stats.max, 50);
    }

    #[test]
    fn test_decode_to_units() {
        let buffer: RingBuffer<i16, 4> = buffer_of(&[2150, 2250]);
        let stats = Statistics::of_buffer(&buffer).decode();

        assert_eq!(stats.median, 22.0);
        assert_eq!(stats.min, 21.5);
        assert_eq!(stats.count, 2);
    }
}
