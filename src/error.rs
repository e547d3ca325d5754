// ❌ Query Errors - what can go wrong answering one question
// None of these abort the chat loop; the Display text is what the user sees

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("No company specified. Try something like 'Apple revenue 2024'")]
    NoCompany,

    #[error("Company '{0}' is not in the data")]
    UnknownCompany(String),

    #[error("No metric specified. Available metrics:\n{available}")]
    NoMetric { available: String },

    #[error("Need two companies, a metric, and a year to compare")]
    IncompleteComparison,

    #[error("Metric {column} not found in data")]
    MissingColumn { column: String },

    #[error("Failed to export report for {company}: {reason}")]
    Export { company: String, reason: String },
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
