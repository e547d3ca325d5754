// 🏗️ Query Parser - free text → (companies, metrics, years, action)
// An ordered list of component rules; each rule contributes one part of the query

use crate::metrics::{Metric, Year};
use crate::rules::{Action, RuleEngine};
use crate::similarity::closest_match;

/// Default similarity cutoff for the fuzzy metric fallback
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.6;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A question in the three shapes the rules match against
#[derive(Debug, Clone)]
pub struct Question {
    pub raw: String,
    pub lower: String,
    /// Lower-cased with spaces and hyphens removed
    pub compact: String,
}

impl Question {
    pub fn new(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let compact = compact(&lower);
        Question {
            raw: raw.to_string(),
            lower,
            compact,
        }
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// ParsedQuery - output of QueryParser::parse()
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Matched companies, in table order
    pub companies: Vec<String>,
    /// Matched metrics, in metric order
    pub metrics: Vec<Metric>,
    /// Matched years, in chronological order
    pub years: Vec<Year>,
    pub action: Action,
}

impl Default for ParsedQuery {
    fn default() -> Self {
        ParsedQuery {
            companies: Vec::new(),
            metrics: Vec::new(),
            years: Vec::new(),
            action: Action::Lookup,
        }
    }
}

// ============================================================================
// COMPONENT RULES
// ============================================================================

/// ComponentRule - one step of the parse cascade
///
/// Rules run in the order the parser holds them and only ever add to the
/// query they are given.
pub trait ComponentRule: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, question: &Question, parsed: &mut ParsedQuery);
}

/// Every company whose lower-case name appears in the question
pub struct CompanyRule {
    companies: Vec<String>,
}

impl CompanyRule {
    pub fn new(companies: Vec<String>) -> Self {
        CompanyRule { companies }
    }
}

impl ComponentRule for CompanyRule {
    fn name(&self) -> &str {
        "company"
    }

    fn apply(&self, question: &Question, parsed: &mut ParsedQuery) {
        for company in &self.companies {
            let needle = company.to_lowercase();
            if needle.is_empty() || parsed.companies.contains(company) {
                continue;
            }
            if question.lower.contains(&needle) {
                parsed.companies.push(company.clone());
            }
        }
    }
}

/// Every metric named in the question, with or without spaces/hyphens
pub struct MetricRule;

impl ComponentRule for MetricRule {
    fn name(&self) -> &str {
        "metric"
    }

    fn apply(&self, question: &Question, parsed: &mut ParsedQuery) {
        for metric in Metric::ALL {
            let name = metric.name().to_lowercase();
            let hit = question.lower.contains(&name) || question.compact.contains(&compact(&name));
            if hit && !parsed.metrics.contains(&metric) {
                parsed.metrics.push(metric);
            }
        }
    }
}

/// Every tracked year that appears in the question
pub struct YearRule;

impl ComponentRule for YearRule {
    fn name(&self) -> &str {
        "year"
    }

    fn apply(&self, question: &Question, parsed: &mut ParsedQuery) {
        for year in Year::ALL {
            if question.raw.contains(year.as_str()) && !parsed.years.contains(&year) {
                parsed.years.push(year);
            }
        }
    }
}

/// Intent from the keyword rule engine
pub struct ActionRuleSet {
    engine: RuleEngine,
}

impl ActionRuleSet {
    pub fn new(engine: RuleEngine) -> Self {
        ActionRuleSet { engine }
    }
}

impl ComponentRule for ActionRuleSet {
    fn name(&self) -> &str {
        "action"
    }

    fn apply(&self, question: &Question, parsed: &mut ParsedQuery) {
        parsed.action = self.engine.classify(&question.lower);
    }
}

// ============================================================================
// QUERY PARSER
// ============================================================================

pub struct QueryParser {
    rules: Vec<Box<dyn ComponentRule>>,
    fuzzy_cutoff: f64,
}

impl QueryParser {
    /// Standard cascade: company, metric, year, then action
    pub fn new(companies: Vec<String>, actions: RuleEngine, fuzzy_cutoff: f64) -> Self {
        QueryParser {
            rules: vec![
                Box::new(CompanyRule::new(companies)),
                Box::new(MetricRule),
                Box::new(YearRule),
                Box::new(ActionRuleSet::new(actions)),
            ],
            fuzzy_cutoff,
        }
    }

    pub fn parse(&self, raw: &str) -> ParsedQuery {
        let question = Question::new(raw);
        let mut parsed = ParsedQuery::default();

        for rule in &self.rules {
            tracing::trace!(rule = rule.name(), "applying component rule");
            rule.apply(&question, &mut parsed);
        }

        tracing::debug!(
            companies = ?parsed.companies,
            metrics = ?parsed.metrics,
            years = ?parsed.years,
            action = %parsed.action,
            "parsed question"
        );
        parsed
    }

    /// Single best metric by similarity to the whole question
    pub fn fuzzy_metric(&self, raw: &str) -> Option<Metric> {
        closest_match(raw, &Metric::ALL, self.fuzzy_cutoff, |m| m.name()).copied()
    }
}

// ============================================================================
// TESTS
// ============================================================================
