// Financial Growth Chatbot - Core Library
// Derives growth metrics from yearly financials and answers keyword questions about them

pub mod metrics;
pub mod table;
pub mod deriver;
pub mod similarity;
pub mod rules;
pub mod parser;
pub mod error;
pub mod session;
pub mod summary;
pub mod render;
pub mod interpreter;
pub mod shell;
pub mod config;

// Re-export commonly used types
pub use metrics::{Metric, Year, GrowthPeriod, derived_headers};
pub use table::{
    RawRecord, DerivedRecord, MetricStats, EnhancedTable,
    load_raw_csv,
};
pub use deriver::{
    derive, derive_file, growth_pct, round2,
    DeriveSummary, SkippedCompany,
};
pub use rules::{Action, ActionRule, RuleEngine};
pub use parser::{ParsedQuery, QueryParser, ComponentRule, DEFAULT_FUZZY_CUTOFF};
pub use error::{QueryError, QueryResult};
pub use session::QueryContext;
pub use summary::{Trend, TrendDirection};
pub use interpreter::{Interpreter, Reply, Control};
pub use shell::{run_shell, SessionStats};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
