// 🖨️ Rendering - currency text, full-row tables and report files

use crate::table::DerivedRecord;
use crate::metrics::COMPANY_COLUMN;
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fs;
use std::path::{Path, PathBuf};

pub const NOT_AVAILABLE: &str = "not available";

/// `$1,234,567.89`; negatives keep the sign after the dollar: `$-12.50`
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("${}{}.{}", sign, grouped, frac_part)
}

/// Signed percentage, `+12.34%`; None renders as the +inf flag
pub fn format_signed_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "+inf%".to_string(),
    }
}

/// Growth cell: `12.34%` or "not available"
pub fn format_growth(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Transposed row: (field, value) for every column, Company first
pub fn transposed_fields(record: &DerivedRecord) -> Vec<(String, String)> {
    let mut fields = vec![(COMPANY_COLUMN.to_string(), record.company.clone())];
    fields.extend(
        record
            .cells()
            .into_iter()
            .map(|(column, value)| (column, format_cell(value))),
    );
    fields
}

/// Two-column table for the "all data" view
pub fn render_full_row(record: &DerivedRecord) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    for (field, value) in transposed_fields(record) {
        table.add_row(vec![field, value]);
    }

    table.to_string()
}

/// Plain-text report: header line, separator, then one aligned line per field
pub fn report_text(record: &DerivedRecord) -> String {
    let fields = transposed_fields(record);
    let width = fields.iter().map(|(f, _)| f.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("Financial Report for {}\n", record.company));
    out.push_str(&"=".repeat(40));
    out.push('\n');
    for (field, value) in fields {
        out.push_str(&format!("{:<width$}  {}\n", field, value, width = width));
    }
    out
}

pub fn report_path(dir: &Path, company: &str) -> PathBuf {
    dir.join(format!("{}_report.txt", company))
}

/// Write `<Company>_report.txt` into `dir`
pub fn export_report(dir: &Path, record: &DerivedRecord) -> Result<PathBuf> {
    let path = report_path(dir, &record.company);
    fs::write(&path, report_text(record))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!(company = %record.company, path = %path.display(), "exported report");
    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;
    use crate::table::MetricStats;

    fn create_test_record() -> DerivedRecord {
        let mut record = DerivedRecord::new("Tesla");
        record.metrics.insert(
            Metric::NetIncome,
            MetricStats {
                values: [Some(12587.0), Some(14997.0), Some(7091.0)],
                growth: [Some(19.15), Some(-52.72), None],
                mean: Some(11558.33),
            },
        );
        record
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(14997.0), "$14,997.00");
        assert_eq!(format_currency(394328000000.0), "$394,328,000,000.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1234.5), "$-1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_percentages() {
        assert_eq!(format_signed_pct(Some(12.346)), "+12.35%");
        assert_eq!(format_signed_pct(Some(-3.0)), "-3.00%");
        assert_eq!(format_signed_pct(None), "+inf%");
        assert_eq!(format_growth(None), "not available");
        assert_eq!(format_growth(Some(19.15)), "19.15%");
    }

    #[test]
    fn test_transposed_fields() {
        let fields = transposed_fields(&create_test_record());

        assert_eq!(fields.len(), 36);
        assert_eq!(fields[0], ("Company".to_string(), "Tesla".to_string()));
        assert_eq!(fields[8], ("Net Income 2022".to_string(), "12587.00".to_string()));
        assert_eq!(
            fields[13],
            ("Net Income Growth 2022-2024 (%)".to_string(), "not available".to_string())
        );
    }

    #[test]
    fn test_render_full_row() {
        let rendered = render_full_row(&create_test_record());

        assert!(rendered.contains("Field"));
        assert!(rendered.contains("Net Income Mean"));
        assert!(rendered.contains("11558.33"));
    }

    #[test]
    fn test_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_report(dir.path(), &create_test_record()).unwrap();

        assert_eq!(path.file_name().unwrap(), "Tesla_report.txt");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Financial Report for Tesla");
        assert_eq!(lines[1], "=".repeat(40));
        assert!(lines[2].starts_with("Company"));
        assert!(lines[2].ends_with("Tesla"));
        assert_eq!(lines.len(), 2 + 36);
    }

    #[test]
    fn test_export_report_missing_dir() {
        let result = export_report(Path::new("/no/such/dir"), &create_test_record());
        assert!(result.is_err());
    }
}
