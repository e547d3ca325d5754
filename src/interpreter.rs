// 🤖 Query Interpreter - one question in, text lines out
// Stateless apart from the QueryContext passed in and handed back

use crate::config::AppConfig;
use crate::error::{QueryError, QueryResult};
use crate::metrics::{value_column, GrowthPeriod, Metric, Year};
use crate::parser::{ParsedQuery, QueryParser};
use crate::render::{
    export_report, format_currency, format_growth, format_signed_pct, render_full_row,
    NOT_AVAILABLE,
};
use crate::rules::{Action, RuleEngine};
use crate::session::QueryContext;
use crate::summary::Trend;
use crate::table::{DerivedRecord, EnhancedTable};
use anyhow::Result;
use std::path::PathBuf;

pub const HELP_EXAMPLES: [&str; 11] = [
    "What is the total revenue of Apple in 2024?",
    "How has net income changed over the last year for Tesla?",
    "Show Microsoft all data",
    "Export report for Apple",
    "Compare Apple and Tesla net income in 2024",
    "What is the cash flow for Microsoft?",
    "Show Tesla revenue (shows all years)",
    "Apple 2023 liabilities",
    "Tesla total assets growth",
    "help - show this message again",
    "exit - quit the chatbot",
];

// ============================================================================
// REPLY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub control: Control,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Reply {
            lines,
            control: Control::Continue,
        }
    }

    fn error(err: QueryError) -> Self {
        Reply::lines(vec![format!("❌ {}", err)])
    }

    pub fn is_exit(&self) -> bool {
        self.control == Control::Exit
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

// ============================================================================
// INTERPRETER
// ============================================================================

pub struct Interpreter {
    table: EnhancedTable,
    parser: QueryParser,
    report_dir: PathBuf,
}

impl Interpreter {
    pub fn new(
        table: EnhancedTable,
        actions: RuleEngine,
        report_dir: impl Into<PathBuf>,
        fuzzy_cutoff: f64,
    ) -> Self {
        let parser = QueryParser::new(table.companies(), actions, fuzzy_cutoff);
        Interpreter {
            table,
            parser,
            report_dir: report_dir.into(),
        }
    }

    pub fn from_config(table: EnhancedTable, config: &AppConfig) -> Result<Self> {
        let actions = config.action_rules()?;
        tracing::debug!(rules = actions.rule_count(), "action rules ready");
        Ok(Self::new(
            table,
            actions,
            config.report_dir.clone(),
            config.fuzzy_cutoff,
        ))
    }

    pub fn table(&self) -> &EnhancedTable {
        &self.table
    }

    pub fn parse(&self, question: &str) -> ParsedQuery {
        self.parser.parse(question)
    }

    /// Handle one input line
    pub fn step(&self, context: QueryContext, line: &str) -> (QueryContext, Reply) {
        let question = line.trim();
        if question.is_empty() {
            return (context, Reply::lines(Vec::new()));
        }

        match question.to_lowercase().as_str() {
            "help" => return (context, Reply::lines(help_lines())),
            "exit" => {
                return (
                    context,
                    Reply {
                        lines: vec!["👋 Goodbye!".to_string()],
                        control: Control::Exit,
                    },
                )
            }
            _ => {}
        }

        let (context, result) = self.answer(context, question);
        let reply = match result {
            Ok(lines) => Reply::lines(lines),
            Err(err) => {
                tracing::debug!(error = %err, "question not answered");
                Reply::error(err)
            }
        };
        (context, reply)
    }

    fn answer(
        &self,
        context: QueryContext,
        question: &str,
    ) -> (QueryContext, QueryResult<Vec<String>>) {
        let mut parsed = self.parser.parse(question);

        if parsed.companies.is_empty() {
            match context.company() {
                Some(company) => parsed.companies.push(company.to_string()),
                None => return (context, Err(QueryError::NoCompany)),
            }
        }

        let company = parsed.companies[0].clone();
        let context = context.remember(company.clone());

        let result = match self.table.find(&company) {
            Some(record) => self.dispatch(record, &parsed, question),
            None => Err(QueryError::UnknownCompany(company)),
        };
        (context, result)
    }

    fn dispatch(
        &self,
        record: &DerivedRecord,
        parsed: &ParsedQuery,
        question: &str,
    ) -> QueryResult<Vec<String>> {
        match parsed.action {
            Action::Export => self.export(record),
            Action::ShowAll => Ok(vec![
                format!("📊 Full data for {}:", record.company),
                render_full_row(record),
            ]),
            Action::Compare => self.compare(parsed),
            Action::Trend | Action::Lookup => self.lookup(record, parsed, question),
        }
    }

    fn export(&self, record: &DerivedRecord) -> QueryResult<Vec<String>> {
        let path = export_report(&self.report_dir, record).map_err(|e| QueryError::Export {
            company: record.company.clone(),
            reason: format!("{:#}", e),
        })?;
        Ok(vec![format!("✅ Report exported to {}", path.display())])
    }

    fn compare(&self, parsed: &ParsedQuery) -> QueryResult<Vec<String>> {
        let (first, second, metric, year) = match (
            parsed.companies.as_slice(),
            parsed.metrics.first(),
            parsed.years.first(),
        ) {
            ([first, second, ..], Some(&metric), Some(&year)) => (first, second, metric, year),
            _ => return Err(QueryError::IncompleteComparison),
        };

        let value_of = |company: &str| -> QueryResult<f64> {
            let record = self
                .table
                .find(company)
                .ok_or_else(|| QueryError::UnknownCompany(company.to_string()))?;
            record
                .value(metric, year)
                .ok_or_else(|| QueryError::MissingColumn {
                    column: value_column(metric, year),
                })
        };

        let val1 = value_of(first)?;
        let val2 = value_of(second)?;
        let diff = val1 - val2;
        let pct_diff = if val2 != 0.0 {
            Some(diff / val2 * 100.0)
        } else {
            None
        };

        Ok(vec![
            format!("📊 Comparison: {} vs {} - {} {}", first, second, metric, year),
            format!(" - {}: {}", first, format_currency(val1)),
            format!(" - {}: {}", second, format_currency(val2)),
            format!(
                " - Difference: {} ({})",
                format_currency(diff),
                format_signed_pct(pct_diff)
            ),
        ])
    }

    fn lookup(
        &self,
        record: &DerivedRecord,
        parsed: &ParsedQuery,
        question: &str,
    ) -> QueryResult<Vec<String>> {
        let metric = match parsed.metrics.first() {
            Some(&metric) => metric,
            None => self
                .parser
                .fuzzy_metric(question)
                .ok_or_else(|| QueryError::NoMetric {
                    available: Metric::available_names(),
                })?,
        };

        let mut lines = Vec::new();
        let years: &[Year] = if parsed.years.is_empty() {
            lines.push(format!("📊 {} - {} (all years):", record.company, metric));
            &Year::ALL
        } else {
            lines.push(format!("📌 {} - {}:", record.company, metric));
            &parsed.years
        };

        for year in years {
            let value = record
                .value(metric, *year)
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            lines.push(format!(" - {}: {}", year, value));
        }

        if parsed.action == Action::Trend {
            lines.extend(growth_lines(record, metric));
        }

        let trend = Trend::of(record, metric);
        lines.push(format!("💬 Summary: {}", trend.sentence(&record.company, metric)));
        Ok(lines)
    }
}

fn growth_lines(record: &DerivedRecord, metric: Metric) -> Vec<String> {
    let stats = record.stats(metric);
    let mut lines: Vec<String> = GrowthPeriod::ALL
        .iter()
        .map(|period| {
            let growth = stats.and_then(|s| s.growth(*period));
            format!(" - Growth {}: {}", period.label(), format_growth(growth))
        })
        .collect();

    let mean = stats
        .and_then(|s| s.mean)
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    lines.push(format!(" - 3-year mean: {}", mean));
    lines
}

pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["💡 Example questions you can ask:".to_string()];
    lines.extend(HELP_EXAMPLES.iter().map(|e| format!(" • {}", e)));
    lines
}

// ============================================================================
// TESTS
// ============================================================================
