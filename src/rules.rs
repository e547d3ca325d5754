// 🏷️ Action Rules - Rules as Data
// Keyword rules that classify the intent of a question

use serde::{Deserialize, Serialize};
use anyhow::{Context as AnyhowContext, Result};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// ACTION
// ============================================================================

/// High-level intent of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Compare,
    Export,
    ShowAll,
    Trend,
    /// No keyword matched: point lookup over the requested years
    #[serde(rename = "none")]
    Lookup,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Compare => "compare",
            Action::Export => "export",
            Action::ShowAll => "show_all",
            Action::Trend => "trend",
            Action::Lookup => "none",
        };
        f.write_str(label)
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRule {
    /// Rule ID for tracking
    pub id: String,

    /// Any of these substrings triggers the rule (case-insensitive)
    pub keywords: Vec<String>,

    /// Action to assign
    pub action: Action,

    /// Description/notes about this rule
    #[serde(default)]
    pub description: Option<String>,

    /// Priority (higher = checked first)
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    0
}

impl ActionRule {
    pub fn new(id: &str, keywords: &[&str], action: Action, priority: i32) -> Self {
        ActionRule {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            action,
            description: None,
            priority,
        }
    }

    /// Check if any keyword appears in the given text
    pub fn matches(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| text_lower.contains(&k.to_lowercase()))
    }
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<ActionRule>,
}

impl RuleEngine {
    /// Built-in precedence: compare > export/report > all data > growth/change
    pub fn with_defaults() -> Self {
        let mut compare = ActionRule::new("compare", &["compare"], Action::Compare, 40);
        compare.description = Some("Side-by-side value of two companies".to_string());

        let mut export = ActionRule::new("export", &["export", "report"], Action::Export, 30);
        export.description = Some("Write <Company>_report.txt".to_string());

        let mut show_all = ActionRule::new("show_all", &["all data"], Action::ShowAll, 20);
        show_all.description = Some("Dump every derived field".to_string());

        let mut trend = ActionRule::new("trend", &["growth", "change"], Action::Trend, 10);
        trend.description = Some("Values plus growth percentages".to_string());

        RuleEngine::from_rules(vec![compare, export, show_all, trend])
    }

    /// Load rules from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules: Vec<ActionRule> = serde_json::from_str(&content)
            .context("Failed to parse rules JSON")?;

        tracing::info!(rules = rules.len(), "loaded action rules from {:?}", path.as_ref());
        Ok(RuleEngine::from_rules(rules))
    }

    /// Create engine from a list of rules
    pub fn from_rules(mut rules: Vec<ActionRule>) -> Self {
        // Sort by priority (higher first)
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        RuleEngine { rules }
    }

    /// First matching rule wins; no match means a plain lookup
    pub fn classify(&self, text: &str) -> Action {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| rule.action)
            .unwrap_or(Action::Lookup)
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_keyword_match_case_insensitive() {
        let rule = ActionRule::new("export", &["export", "report"], Action::Export, 0);

        assert!(rule.matches("Export report for Apple"));
        assert!(rule.matches("apple REPORT"));
        assert!(!rule.matches("Apple revenue"));
    }

    #[test]
    fn test_default_precedence() {
        let engine = RuleEngine::with_defaults();

        assert_eq!(engine.classify("compare apple and tesla growth"), Action::Compare);
        assert_eq!(engine.classify("export all data report"), Action::Export);
        assert_eq!(engine.classify("show all data for tesla, growth too"), Action::ShowAll);
        assert_eq!(engine.classify("how has net income changed"), Action::Trend);
        assert_eq!(engine.classify("apple revenue growth 2022-2024"), Action::Trend);
        assert_eq!(engine.classify("tesla 2023 net income"), Action::Lookup);
    }

    #[test]
    fn test_rule_priority() {
        let engine = RuleEngine::from_rules(vec![
            ActionRule::new("low", &["growth"], Action::Trend, 1),
            ActionRule::new("high", &["growth"], Action::ShowAll, 100),
        ]);

        assert_eq!(engine.classify("revenue growth"), Action::ShowAll);
    }

    #[test]
    fn test_empty_engine_is_lookup() {
        let engine = RuleEngine::from_rules(Vec::new());
        assert_eq!(engine.classify("compare"), Action::Lookup);
        assert_eq!(engine.rule_count(), 0);
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let rule = ActionRule::new("blank", &[""], Action::Export, 0);
        assert!(!rule.matches("anything"));
    }

    #[test]
    fn test_rules_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "trend", "keywords": ["growth"], "action": "trend", "priority": 1}},
                {{"id": "dump", "keywords": ["everything"], "action": "show_all", "priority": 5}},
                {{"id": "plain", "keywords": ["lookup"], "action": "none"}}
            ]"#
        )
        .unwrap();

        let engine = RuleEngine::from_file(file.path()).unwrap();

        assert_eq!(engine.rule_count(), 3);
        assert_eq!(engine.classify("show everything, growth too"), Action::ShowAll);
        assert_eq!(engine.classify("lookup please"), Action::Lookup);
        // missing priority defaults to 0, below "trend"
        assert_eq!(engine.classify("lookup growth"), Action::Trend);
    }

    #[test]
    fn test_rules_from_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(RuleEngine::from_file(file.path()).is_err());
    }
}
