// 📈 Metrics Deriver - yearly values, growth percentages and means per company
// Runs once at startup; output is the enhanced table the chatbot answers from

use crate::metrics::{GrowthPeriod, Metric, Year};
use crate::table::{load_raw_csv, DerivedRecord, EnhancedTable, MetricStats, RawRecord};
use anyhow::Result;
use std::path::Path;

/// Number of yearly rows a company needs to be derived
pub const REQUIRED_YEARS: usize = 3;

// ============================================================================
// DERIVE SUMMARY
// ============================================================================

/// Company left out of the enhanced table
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCompany {
    pub company: String,
    pub row_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DeriveSummary {
    pub derived: usize,
    pub skipped: Vec<SkippedCompany>,
    /// Growth fields left unavailable because the earlier value was zero
    pub undefined_growth: usize,
}

impl DeriveSummary {
    pub fn summary(&self) -> String {
        format!(
            "Derived {} companies, skipped {}, {} growth fields unavailable (zero base)",
            self.derived,
            self.skipped.len(),
            self.undefined_growth
        )
    }
}

// ============================================================================
// ARITHMETIC
// ============================================================================

/// Round half away from zero to 2 decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change from `earlier` to `later`, None when `earlier` is zero
pub fn growth_pct(earlier: f64, later: f64) -> Option<f64> {
    if earlier == 0.0 {
        return None;
    }
    Some(round2((later - earlier) / earlier * 100.0))
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn derive_stats(values: [f64; 3]) -> MetricStats {
    let mut stats = MetricStats {
        values: values.map(Some),
        growth: [None; 3],
        mean: Some(round2(mean(&values))),
    };

    for (i, period) in GrowthPeriod::ALL.iter().enumerate() {
        let (from, to) = period.years();
        stats.growth[i] = growth_pct(values[from.index()], values[to.index()]);
    }

    stats
}

// ============================================================================
// DERIVER
// ============================================================================

/// Group raw rows by company (first-appearance order) and derive one row each
///
/// Companies without exactly three rows are skipped and reported in the
/// summary rather than silently dropped.
pub fn derive(raw: &[RawRecord]) -> (EnhancedTable, DeriveSummary) {
    let mut groups: Vec<(String, Vec<&RawRecord>)> = Vec::new();
    for record in raw {
        match groups.iter_mut().find(|(company, _)| company == &record.company) {
            Some((_, rows)) => rows.push(record),
            None => groups.push((record.company.clone(), vec![record])),
        }
    }

    let mut summary = DeriveSummary::default();
    let mut records = Vec::with_capacity(groups.len());

    for (company, mut rows) in groups {
        if rows.len() != REQUIRED_YEARS {
            tracing::warn!(
                company = %company,
                rows = rows.len(),
                "skipping company: expected {} yearly rows",
                REQUIRED_YEARS
            );
            summary.skipped.push(SkippedCompany {
                company,
                row_count: rows.len(),
            });
            continue;
        }

        // Stable sort keeps input order for equal years
        rows.sort_by_key(|r| r.year);

        for (row, expected) in rows.iter().zip(Year::ALL) {
            if Year::from_number(row.year) != Some(expected) {
                tracing::warn!(
                    company = %company,
                    year = row.year,
                    "row labelled as {} by position",
                    expected
                );
            }
        }

        let mut derived = DerivedRecord::new(company.clone());
        for metric in Metric::ALL {
            let values = [
                rows[0].value(metric),
                rows[1].value(metric),
                rows[2].value(metric),
            ];
            let stats = derive_stats(values);

            let undefined = stats.growth.iter().filter(|g| g.is_none()).count();
            if undefined > 0 {
                tracing::debug!(
                    company = %company,
                    metric = %metric,
                    undefined,
                    "growth unavailable: zero base value"
                );
                summary.undefined_growth += undefined;
            }

            derived.metrics.insert(metric, stats);
        }

        records.push(derived);
    }

    summary.derived = records.len();
    tracing::info!("{}", summary.summary());

    (EnhancedTable::new(records), summary)
}

/// Read the raw CSV, derive, and write the enhanced table
pub fn derive_file(input: &Path, output: &Path) -> Result<(EnhancedTable, DeriveSummary)> {
    let raw = load_raw_csv(input)?;
    let (table, summary) = derive(&raw);
    table.write_csv(output)?;
    tracing::info!(fingerprint = %table.fingerprint()?, "derived table fingerprint");
    Ok((table, summary))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_raw(company: &str, year: i32, base: f64) -> RawRecord {
        RawRecord {
            company: company.to_string(),
            year,
            total_revenue: base * 10.0,
            net_income: base,
            total_assets: base * 20.0,
            total_liabilities: base * 15.0,
            cash_flow: base * 2.0,
        }
    }

    fn sample_rows() -> Vec<RawRecord> {
        vec![
            create_raw("Apple", 2024, 93736.0),
            create_raw("Apple", 2022, 99803.0),
            create_raw("Tesla", 2022, 12587.0),
            create_raw("Apple", 2023, 96995.0),
            create_raw("Tesla", 2023, 14997.0),
            create_raw("Tesla", 2024, 7091.0),
        ]
    }

    #[test]
    fn test_growth_pct_rounding() {
        assert_eq!(growth_pct(100.0, 110.0), Some(10.0));
        assert_eq!(growth_pct(3.0, 4.0), Some(33.33));
        assert_eq!(growth_pct(200.0, 100.0), Some(-50.0));
    }

    #[test]
    fn test_growth_pct_zero_base() {
        assert_eq!(growth_pct(0.0, 100.0), None);
    }

    #[test]
    fn test_derive_sorts_years_and_keeps_company_order() {
        let (table, summary) = derive(&sample_rows());

        assert_eq!(table.companies(), vec!["Apple".to_string(), "Tesla".to_string()]);
        assert_eq!(summary.derived, 2);
        assert!(summary.skipped.is_empty());

        let apple = table.find("Apple").unwrap();
        assert_eq!(apple.value(Metric::NetIncome, Year::Y2022), Some(99803.0));
        assert_eq!(apple.value(Metric::NetIncome, Year::Y2024), Some(93736.0));
    }

    #[test]
    fn test_derive_growth_composes() {
        let (table, _) = derive(&sample_rows());

        for record in table.records() {
            for metric in Metric::ALL {
                let stats = record.stats(metric).unwrap();
                let g12 = stats.growth(GrowthPeriod::FirstYear).unwrap();
                let g23 = stats.growth(GrowthPeriod::SecondYear).unwrap();
                let g13 = stats.growth(GrowthPeriod::Overall).unwrap();

                let composed = (1.0 + g12 / 100.0) * (1.0 + g23 / 100.0);
                assert!(
                    (composed - (1.0 + g13 / 100.0)).abs() < 0.001,
                    "{} {}: {} vs {}",
                    record.company,
                    metric,
                    composed,
                    g13
                );
            }
        }
    }

    #[test]
    fn test_derive_mean() {
        let (table, _) = derive(&sample_rows());
        let tesla = table.find("Tesla").unwrap();
        let stats = tesla.stats(Metric::NetIncome).unwrap();

        let expected = round2((12587.0 + 14997.0 + 7091.0) / 3.0);
        assert_eq!(stats.mean, Some(expected));
        assert_eq!(expected, 11558.33);
    }

    #[test]
    fn test_derive_skips_incomplete_company() {
        let mut rows = sample_rows();
        rows.push(create_raw("Microsoft", 2023, 72361.0));

        let (table, summary) = derive(&rows);

        assert!(table.find("Microsoft").is_none());
        assert_eq!(
            summary.skipped,
            vec![SkippedCompany {
                company: "Microsoft".to_string(),
                row_count: 1
            }]
        );
    }

    #[test]
    fn test_derive_zero_base_growth_unavailable() {
        let rows = vec![
            create_raw("Rivian", 2022, 0.0),
            create_raw("Rivian", 2023, 50.0),
            create_raw("Rivian", 2024, 75.0),
        ];

        let (table, summary) = derive(&rows);
        let stats = table.find("Rivian").unwrap().stats(Metric::NetIncome).unwrap();

        assert_eq!(stats.growth(GrowthPeriod::FirstYear), None);
        assert_eq!(stats.growth(GrowthPeriod::SecondYear), Some(50.0));
        assert_eq!(stats.growth(GrowthPeriod::Overall), None);
        // two undefined periods for each of the five metrics
        assert_eq!(summary.undefined_growth, 10);
    }

    #[test]
    fn test_derive_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        let output = dir.path().join("derived.csv");
        std::fs::write(
            &input,
            "Company,Year,Total Revenue,Net Income,Total Assets,Total Liabilities,Cash Flow\n\
             Tesla,2022,81462,12587,82338,36440,14724\n\
             Tesla,2023,96773,14997,106618,43009,13256\n\
             Tesla,2024,97690,7091,122070,48390,14923\n",
        )
        .unwrap();

        let (table, summary) = derive_file(&input, &output).unwrap();
        let written = std::fs::read(&output).unwrap();

        assert_eq!(summary.derived, 1);
        assert_eq!(written, table.to_csv_bytes().unwrap());
        assert_eq!(EnhancedTable::load_csv(&output).unwrap(), table);

        // second run over the same input writes the same bytes
        derive_file(&input, &output).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), written);
    }

    #[test]
    fn test_derive_twice_is_byte_identical() {
        let rows = sample_rows();
        let (first, _) = derive(&rows);
        let (second, _) = derive(&rows);

        assert_eq!(first.to_csv_bytes().unwrap(), second.to_csv_bytes().unwrap());
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }
}
