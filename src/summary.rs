// 💬 Trend Summary - direction of a metric across the tracked years

use crate::metrics::{Metric, Year};
use crate::render::format_currency;
use crate::table::DerivedRecord;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    /// Available (year, value) pairs in chronological order
    pub values: Vec<(Year, f64)>,
    pub direction: TrendDirection,
}

impl Trend {
    /// Compare the earliest and latest available values
    pub fn of(record: &DerivedRecord, metric: Metric) -> Self {
        let values: Vec<(Year, f64)> = Year::ALL
            .iter()
            .filter_map(|&year| record.value(metric, year).map(|v| (year, v)))
            .collect();

        let direction = match (values.first(), values.last()) {
            (Some((_, first)), Some((_, last))) if values.len() >= 2 => {
                if first < last {
                    TrendDirection::Increasing
                } else if first > last {
                    TrendDirection::Decreasing
                } else {
                    TrendDirection::Stable
                }
            }
            _ => TrendDirection::Stable,
        };

        Trend { values, direction }
    }

    /// One-sentence summary, e.g. "Tesla's Net Income has been decreasing over time (...)"
    pub fn sentence(&self, company: &str, metric: Metric) -> String {
        if self.values.is_empty() {
            return format!("No data available for {}", metric);
        }

        let value_str = self
            .values
            .iter()
            .map(|(year, value)| format!("{}: {}", year, format_currency(*value)))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}'s {} has been {} over time ({})",
            company, metric, self.direction, value_str
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MetricStats;

    fn record_with(values: [Option<f64>; 3]) -> DerivedRecord {
        let mut record = DerivedRecord::new("Tesla");
        record.metrics.insert(
            Metric::NetIncome,
            MetricStats {
                values,
                ..MetricStats::default()
            },
        );
        record
    }

    #[test]
    fn test_trend_decreasing() {
        let record = record_with([Some(12587.0), Some(14997.0), Some(7091.0)]);
        let trend = Trend::of(&record, Metric::NetIncome);

        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert_eq!(
            trend.sentence("Tesla", Metric::NetIncome),
            "Tesla's Net Income has been decreasing over time \
             (2022: $12,587.00, 2023: $14,997.00, 2024: $7,091.00)"
        );
    }

    #[test]
    fn test_trend_uses_available_endpoints() {
        let record = record_with([None, Some(10.0), Some(20.0)]);
        let trend = Trend::of(&record, Metric::NetIncome);

        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.values, vec![(Year::Y2023, 10.0), (Year::Y2024, 20.0)]);
    }

    #[test]
    fn test_trend_single_value_is_stable() {
        let record = record_with([Some(5.0), None, None]);
        assert_eq!(Trend::of(&record, Metric::NetIncome).direction, TrendDirection::Stable);
    }

    #[test]
    fn test_trend_equal_endpoints_is_stable() {
        let record = record_with([Some(5.0), Some(9.0), Some(5.0)]);
        assert_eq!(Trend::of(&record, Metric::NetIncome).direction, TrendDirection::Stable);
    }

    #[test]
    fn test_no_data_sentence() {
        let record = DerivedRecord::new("Tesla");
        let trend = Trend::of(&record, Metric::CashFlow);

        assert_eq!(trend.sentence("Tesla", Metric::CashFlow), "No data available for Cash Flow");
    }
}
