// ⚙️ Configuration - paths, rule source and fuzzy cutoff for one run
// Built by the binary from command-line arguments; the defaults let the library run without a CLI

use crate::parser::DEFAULT_FUZZY_CUTOFF;
use crate::rules::RuleEngine;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_INPUT_CSV: &str = "Financials_Microsoft_Tesla_Apple.csv";
pub const DEFAULT_DERIVED_CSV: &str = "Enhanced_Company_Growth_Data.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Raw per-year financials
    pub input_csv: PathBuf,

    /// Where the enhanced table is written and read back from
    pub derived_csv: PathBuf,

    /// Directory for `<Company>_report.txt` exports
    pub report_dir: PathBuf,

    /// Optional JSON file replacing the built-in action rules
    pub rules_file: Option<PathBuf>,

    /// Similarity cutoff for the fuzzy metric fallback (0.0 - 1.0)
    pub fuzzy_cutoff: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from(DEFAULT_INPUT_CSV),
            derived_csv: PathBuf::from(DEFAULT_DERIVED_CSV),
            report_dir: PathBuf::from("."),
            rules_file: None,
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            bail!(
                "Fuzzy cutoff must be between 0.0 and 1.0 (got {})",
                self.fuzzy_cutoff
            );
        }
        if self.report_dir.as_os_str().is_empty() {
            bail!("Report directory must not be empty");
        }
        Ok(())
    }

    /// Action rules from `rules_file`, or the built-in set
    pub fn action_rules(&self) -> Result<RuleEngine> {
        match &self.rules_file {
            Some(path) => RuleEngine::from_file(path),
            None => Ok(RuleEngine::with_defaults()),
        }
    }
}
