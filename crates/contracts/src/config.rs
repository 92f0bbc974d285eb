//! Category configuration and per-month table appearance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Category configuration maintained by administrators: known class
/// codes, the instructor roster and organizational units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub class_codes: Vec<String>,
    #[serde(default)]
    pub instructors: Vec<String>,
    #[serde(default)]
    pub units: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternatingColor {
    pub header_bg: String,
    pub header_text: String,
    pub odd_row_bg: String,
    pub even_row_bg: String,
}

impl Default for AlternatingColor {
    fn default() -> Self {
        Self {
            header_bg: "#f3f4f6".to_string(),
            header_text: "#374151".to_string(),
            odd_row_bg: "#ffffff".to_string(),
            even_row_bg: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCondition {
    Equals,
    Contains,
    StartsWith,
    GreaterThan,
    LessThan,
}

/// One conditional-formatting rule. Rules are evaluated in order and
/// the first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub condition: RuleCondition,
    pub value: String,
    pub background_color: String,
    pub text_color: String,
    #[serde(default)]
    pub bold: bool,
}

impl ConditionalRule {
    /// Text comparisons are case-insensitive; numeric comparisons only
    /// match when the cell actually parses as a number.
    pub fn matches(&self, cell: &str) -> bool {
        let cell_lower = cell.trim().to_lowercase();
        let rule_lower = self.value.trim().to_lowercase();
        match self.condition {
            RuleCondition::Equals => cell_lower == rule_lower,
            RuleCondition::Contains => cell_lower.contains(&rule_lower),
            RuleCondition::StartsWith => cell_lower.starts_with(&rule_lower),
            RuleCondition::GreaterThan => match (parse_strict(cell), parse_strict(&self.value)) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            },
            RuleCondition::LessThan => match (parse_strict(cell), parse_strict(&self.value)) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            },
        }
    }
}

fn parse_strict(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

/// Per-month display configuration, stored behind the gateway under a
/// deterministic key and cached per month on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub is_enabled_alternating: bool,
    #[serde(default)]
    pub alternating_color: AlternatingColor,
    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
    #[serde(default)]
    pub instructor_colors: HashMap<String, String>,
    #[serde(default)]
    pub column_widths: HashMap<String, f64>,
}

impl TableConfig {
    /// First conditional rule matching the cell value, if any.
    pub fn matching_rule(&self, cell: &str) -> Option<&ConditionalRule> {
        self.conditional_rules.iter().find(|rule| rule.matches(cell))
    }
}

/// Key of the display configuration shared by every sheet of a month.
pub fn month_config_key(month: u32, year: i32) -> String {
    format!("CONF_T{:02}_{}", month, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(condition: RuleCondition, value: &str) -> ConditionalRule {
        ConditionalRule {
            condition,
            value: value.to_string(),
            background_color: "#fee".to_string(),
            text_color: "#900".to_string(),
            bold: false,
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let config = TableConfig {
            conditional_rules: vec![
                rule(RuleCondition::Contains, "p"),
                rule(RuleCondition::Equals, "p"),
            ],
            ..TableConfig::default()
        };
        let matched = config.matching_rule("P").unwrap();
        assert_eq!(matched.condition, RuleCondition::Contains);
    }

    #[test]
    fn numeric_rules_ignore_unparseable_cells() {
        let gt = rule(RuleCondition::GreaterThan, "3");
        assert!(gt.matches("5"));
        assert!(gt.matches("4,5"));
        assert!(!gt.matches("abc"));
        assert!(!gt.matches(""));
    }

    #[test]
    fn text_rules_are_case_insensitive() {
        assert!(rule(RuleCondition::Equals, "KP").matches("kp"));
        assert!(rule(RuleCondition::StartsWith, "họp").matches("HỌP OKR"));
    }

    #[test]
    fn config_key_is_month_padded() {
        assert_eq!(month_config_key(9, 2025), "CONF_T09_2025");
        assert_eq!(month_config_key(11, 2024), "CONF_T11_2024");
    }

    #[test]
    fn default_survives_missing_fields() {
        let config: TableConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.alternating_color.header_bg, "#f3f4f6");
    }
}
