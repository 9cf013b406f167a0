//! Flattening of the history tiers into one chart series.
//!
//! The chart spends a fixed number of pixels on each tier (see
//! [`CHART_LEN`]), so the series is always the same length. Slot 0 is the
//! newest hour-tier sample and the series walks back in time: the rest of
//! the hour tier, then day, week, month and year, each newest first. Slots
//! with no history yet hold [`NO_DATA`].

use crate::storage::{CHART_LEN, CompactSample, QuantityHistory};

/// Display series for one quantity, in physical units.
pub type ChartSeries = [f32; CHART_LEN];

/// Marker for a slot with no history behind it.
pub const NO_DATA: f32 = f32::NAN;

/// Build the chart series for one quantity.
pub fn build_series<T: CompactSample>(history: &QuantityHistory<T>) -> ChartSeries {
    let mut series = [NO_DATA; CHART_LEN];

    let samples = history
        .hour()
        .buffer()
        .iter()
        .rev()
        .chain(history.day().buffer().iter().rev())
        .chain(history.week().buffer().iter().rev())
        .chain(history.month().buffer().iter().rev())
        .chain(history.year().buffer().iter().rev());

    for (slot, value) in series.iter_mut().zip(samples) {
        *slot = value.decode();
    }
    series
}

/// Number of leading slots that hold data.
pub fn filled_len(series: &ChartSeries) -> usize {
    series.iter().take_while(|value| !value.is_nan()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CascadeConfig;
    use crate::sensors::{Quantity, Reading};
    use crate::storage::{AggregationCascade, CascadeState, HOUR_LEN};

    #[test]
    fn test_empty_history_is_all_no_data() {
        let history: QuantityHistory<i16> = QuantityHistory::new();
        let series = build_series(&history);

        assert_eq!(series.len(), CHART_LEN);
        assert!(series.iter().all(|value| value.is_nan()));
        assert_eq!(filled_len(&series), 0);
    }

    #[test]
    fn test_newest_first_across_tiers() {
        let mut state: CascadeState<i16> = CascadeState::new();
        let config = CascadeConfig::default();
        state.reset(&config);

        {
            let history = state.history_mut(Quantity::Temperature);
            for value in [1000, 1001, 1002] {
                history.hour.buffer_mut().push_overwrite(value);
            }
            for value in [2000, 2001] {
                history.day.buffer_mut().push_overwrite(value);
            }
            history.year.buffer_mut().push_overwrite(5000);
        }

        let series = build_series(state.history(Quantity::Temperature));

        assert_eq!(filled_len(&series), 6);
        assert_eq!(series[0], 10.02);
        assert_eq!(series[1], 10.01);
        assert_eq!(series[2], 10.0);
        assert_eq!(series[3], 20.01);
        assert_eq!(series[4], 20.0);
        assert_eq!(series[5], 50.0);
        assert!(series[6].is_nan());
        assert!(series[CHART_LEN - 1].is_nan());
    }

    #[test]
    fn test_series_from_running_cascade() {
        let mut state: CascadeState<i16> = CascadeState::new();
        let mut cascade = match AggregationCascade::new(&mut state, &CascadeConfig::default(), true)
        {
            Ok(cascade) => cascade,
            Err(e) => panic!("{:?}", e),
        };

        // Ten reads fill the filter, then every further 120 s pushes once.
        for i in 0..200u32 {
            cascade.collect(Reading::new(21.0, 40.0), 1_000 + i * 12);
        }

        let series = cascade.chart_series(Quantity::Humidity);
        let hour_len = cascade
            .state()
            .history(Quantity::Humidity)
            .hour()
            .buffer()
            .len();
        assert_eq!(filled_len(&series), hour_len);
        assert!(hour_len > 0 && hour_len <= HOUR_LEN);
        assert_eq!(series[0], 40.0);
    }
}
