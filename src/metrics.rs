// 📐 Metric Vocabulary - the fixed metrics and years every table is keyed by
// Column names of the derived table are built here and nowhere else

use std::fmt;

// ============================================================================
// METRICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    TotalRevenue,
    NetIncome,
    TotalAssets,
    TotalLiabilities,
    CashFlow,
}

impl Metric {
    /// All metrics in table order
    pub const ALL: [Metric; 5] = [
        Metric::TotalRevenue,
        Metric::NetIncome,
        Metric::TotalAssets,
        Metric::TotalLiabilities,
        Metric::CashFlow,
    ];

    /// Human-readable name, identical to the input CSV header
    pub fn name(&self) -> &'static str {
        match self {
            Metric::TotalRevenue => "Total Revenue",
            Metric::NetIncome => "Net Income",
            Metric::TotalAssets => "Total Assets",
            Metric::TotalLiabilities => "Total Liabilities",
            Metric::CashFlow => "Cash Flow",
        }
    }

    /// Lookup by exact (case-insensitive) name
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Comma-separated list of every metric name
    pub fn available_names() -> String {
        Metric::ALL
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// YEARS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Year {
    Y2022,
    Y2023,
    Y2024,
}

impl Year {
    pub const ALL: [Year; 3] = [Year::Y2022, Year::Y2023, Year::Y2024];

    pub fn as_str(&self) -> &'static str {
        match self {
            Year::Y2022 => "2022",
            Year::Y2023 => "2023",
            Year::Y2024 => "2024",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Year::Y2022 => 0,
            Year::Y2023 => 1,
            Year::Y2024 => 2,
        }
    }

    pub fn from_number(year: i32) -> Option<Year> {
        match year {
            2022 => Some(Year::Y2022),
            2023 => Some(Year::Y2023),
            2024 => Some(Year::Y2024),
            _ => None,
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GROWTH PERIODS
// ============================================================================

/// Year pair a growth percentage is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthPeriod {
    FirstYear,  // 2022 → 2023
    SecondYear, // 2023 → 2024
    Overall,    // 2022 → 2024
}

impl GrowthPeriod {
    pub const ALL: [GrowthPeriod; 3] = [
        GrowthPeriod::FirstYear,
        GrowthPeriod::SecondYear,
        GrowthPeriod::Overall,
    ];

    pub fn years(&self) -> (Year, Year) {
        match self {
            GrowthPeriod::FirstYear => (Year::Y2022, Year::Y2023),
            GrowthPeriod::SecondYear => (Year::Y2023, Year::Y2024),
            GrowthPeriod::Overall => (Year::Y2022, Year::Y2024),
        }
    }

    /// Label used in column names, e.g. "2022-2023"
    pub fn label(&self) -> String {
        let (from, to) = self.years();
        format!("{}-{}", from, to)
    }
}

// ============================================================================
// COLUMN NAMES
// ============================================================================

pub const COMPANY_COLUMN: &str = "Company";

pub fn value_column(metric: Metric, year: Year) -> String {
    format!("{} {}", metric.name(), year)
}

pub fn growth_column(metric: Metric, period: GrowthPeriod) -> String {
    format!("{} Growth {} (%)", metric.name(), period.label())
}

pub fn mean_column(metric: Metric) -> String {
    format!("{} Mean", metric.name())
}

/// Header row of the derived table: Company + 7 columns per metric
pub fn derived_headers() -> Vec<String> {
    let mut headers = vec![COMPANY_COLUMN.to_string()];
    for metric in Metric::ALL {
        for year in Year::ALL {
            headers.push(value_column(metric, year));
        }
        for period in GrowthPeriod::ALL {
            headers.push(growth_column(metric, period));
        }
        headers.push(mean_column(metric));
    }
    headers
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_headers_shape() {
        let headers = derived_headers();

        assert_eq!(headers.len(), 36);
        assert_eq!(headers[0], "Company");
        assert_eq!(headers[1], "Total Revenue 2022");
        assert_eq!(headers[4], "Total Revenue Growth 2022-2023 (%)");
        assert_eq!(headers[6], "Total Revenue Growth 2022-2024 (%)");
        assert_eq!(headers[7], "Total Revenue Mean");
        assert_eq!(headers[35], "Cash Flow Mean");
    }

    #[test]
    fn test_metric_from_name() {
        assert_eq!(Metric::from_name("net income"), Some(Metric::NetIncome));
        assert_eq!(Metric::from_name("Cash Flow "), Some(Metric::CashFlow));
        assert_eq!(Metric::from_name("ebitda"), None);
    }

    #[test]
    fn test_year_from_number() {
        assert_eq!(Year::from_number(2023), Some(Year::Y2023));
        assert_eq!(Year::from_number(2021), None);
        assert_eq!(Year::Y2024.index(), 2);
    }
}
