// 🗄️ Tables - raw yearly rows in, enhanced per-company rows out
// Flat CSV files are the only storage

use crate::metrics::{
    derived_headers, growth_column, mean_column, value_column, GrowthPeriod, Metric, Year,
    COMPANY_COLUMN,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

// ============================================================================
// RAW RECORD (one company-year row of the input file)
// ============================================================================

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RawRecord {
    #[serde(rename = "Company")]
    pub company: String,

    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Total Revenue")]
    pub total_revenue: f64,

    #[serde(rename = "Net Income")]
    pub net_income: f64,

    #[serde(rename = "Total Assets")]
    pub total_assets: f64,

    #[serde(rename = "Total Liabilities")]
    pub total_liabilities: f64,

    #[serde(rename = "Cash Flow")]
    pub cash_flow: f64,
}

impl RawRecord {
    /// Value of a metric for this company-year
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalRevenue => self.total_revenue,
            Metric::NetIncome => self.net_income,
            Metric::TotalAssets => self.total_assets,
            Metric::TotalLiabilities => self.total_liabilities,
            Metric::CashFlow => self.cash_flow,
        }
    }
}

pub fn load_raw_csv(csv_path: &Path) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open input CSV: {}", csv_path.display()))?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: RawRecord = result.context("Failed to deserialize raw record")?;
        records.push(record);
    }

    tracing::info!(rows = records.len(), path = %csv_path.display(), "loaded raw financials");
    Ok(records)
}

// ============================================================================
// DERIVED RECORD (one enhanced row per company)
// ============================================================================

/// Derived fields for one metric of one company
///
/// Every field is optional: growth is unavailable when the earlier value is
/// zero, and a table loaded from disk may lack some columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricStats {
    /// Values for 2022, 2023, 2024
    pub values: [Option<f64>; 3],

    /// Growth % for 2022→2023, 2023→2024, 2022→2024
    pub growth: [Option<f64>; 3],

    /// Mean of the three yearly values
    pub mean: Option<f64>,
}

impl MetricStats {
    pub fn value(&self, year: Year) -> Option<f64> {
        self.values[year.index()]
    }

    pub fn growth(&self, period: GrowthPeriod) -> Option<f64> {
        let idx = match period {
            GrowthPeriod::FirstYear => 0,
            GrowthPeriod::SecondYear => 1,
            GrowthPeriod::Overall => 2,
        };
        self.growth[idx]
    }

    fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
            && self.growth.iter().all(Option::is_none)
            && self.mean.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub company: String,
    pub metrics: BTreeMap<Metric, MetricStats>,
}

impl DerivedRecord {
    pub fn new(company: impl Into<String>) -> Self {
        DerivedRecord {
            company: company.into(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn stats(&self, metric: Metric) -> Option<&MetricStats> {
        self.metrics.get(&metric)
    }

    /// Value of `metric` in `year`, None when the column is absent
    pub fn value(&self, metric: Metric, year: Year) -> Option<f64> {
        self.stats(metric).and_then(|s| s.value(year))
    }

    /// The row as (column, cell) pairs in header order; empty cell = unavailable
    pub fn cells(&self) -> Vec<(String, Option<f64>)> {
        let mut cells = Vec::with_capacity(35);
        for metric in Metric::ALL {
            let stats = self.metrics.get(&metric).cloned().unwrap_or_default();
            for year in Year::ALL {
                cells.push((value_column(metric, year), stats.value(year)));
            }
            for period in GrowthPeriod::ALL {
                cells.push((growth_column(metric, period), stats.growth(period)));
            }
            cells.push((mean_column(metric), stats.mean));
        }
        cells
    }
}

// ============================================================================
// ENHANCED TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnhancedTable {
    records: Vec<DerivedRecord>,
}

impl EnhancedTable {
    pub fn new(records: Vec<DerivedRecord>) -> Self {
        EnhancedTable { records }
    }

    pub fn records(&self) -> &[DerivedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Company names in table order
    pub fn companies(&self) -> Vec<String> {
        self.records.iter().map(|r| r.company.clone()).collect()
    }

    /// Exact company lookup
    pub fn find(&self, company: &str) -> Option<&DerivedRecord> {
        self.records.iter().find(|r| r.company == company)
    }

    /// Serialize to CSV bytes (header + one row per company)
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(derived_headers())
            .context("Failed to write derived header")?;

        for record in &self.records {
            let mut row = Vec::with_capacity(36);
            row.push(record.company.clone());
            for (_, cell) in record.cells() {
                row.push(cell.map(|v| v.to_string()).unwrap_or_default());
            }
            wtr.write_record(&row)
                .with_context(|| format!("Failed to write derived row for {}", record.company))?;
        }

        wtr.into_inner()
            .map_err(|e| e.into_error())
            .context("Failed to flush derived CSV")
    }

    pub fn write_csv(&self, csv_path: &Path) -> Result<()> {
        let bytes = self.to_csv_bytes()?;
        fs::write(csv_path, bytes)
            .with_context(|| format!("Failed to write derived CSV: {}", csv_path.display()))?;
        tracing::info!(companies = self.len(), path = %csv_path.display(), "wrote derived table");
        Ok(())
    }

    /// SHA-256 of the serialized table; equal inputs give equal fingerprints
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.to_csv_bytes()?);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Load a derived table previously written by `write_csv`
    ///
    /// Missing columns are tolerated (those fields read as unavailable);
    /// a missing Company column is an error.
    pub fn load_csv(csv_path: &Path) -> Result<Self> {
        let rdr = csv::Reader::from_path(csv_path)
            .with_context(|| format!("Failed to open derived CSV: {}", csv_path.display()))?;
        Self::from_reader(rdr)
    }

    fn from_reader<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let headers = rdr.headers().context("Failed to read derived header")?.clone();
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h, i))
            .collect();

        let company_idx = *index
            .get(COMPANY_COLUMN)
            .context("Derived CSV has no Company column")?;

        let mut records = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let row = result.with_context(|| format!("Failed to read derived row {}", line + 1))?;
            let company = row.get(company_idx).unwrap_or_default().to_string();

            let cell = |column: &str| -> Result<Option<f64>> {
                let raw = match index.get(column).and_then(|&i| row.get(i)) {
                    Some(raw) if !raw.trim().is_empty() => raw.trim(),
                    _ => return Ok(None),
                };
                let value = raw
                    .parse::<f64>()
                    .with_context(|| format!("Invalid number '{}' in column {}", raw, column))?;

                // inf/NaN cells (zero-base growth from other tools) read as unavailable
                if !value.is_finite() {
                    tracing::warn!(company = %company, column, raw, "non-finite cell treated as not available");
                    return Ok(None);
                }
                Ok(Some(value))
            };

            let mut record = DerivedRecord::new(company.as_str());
            for metric in Metric::ALL {
                let mut stats = MetricStats::default();
                for year in Year::ALL {
                    stats.values[year.index()] = cell(&value_column(metric, year))?;
                }
                for (i, period) in GrowthPeriod::ALL.iter().enumerate() {
                    stats.growth[i] = cell(&growth_column(metric, *period))?;
                }
                stats.mean = cell(&mean_column(metric))?;

                if !stats.is_empty() {
                    record.metrics.insert(metric, stats);
                }
            }
            records.push(record);
        }

        tracing::info!(companies = records.len(), "loaded derived table");
        Ok(EnhancedTable::new(records))
    }
}

// ============================================================================
// TESTS
// ============================================================================
